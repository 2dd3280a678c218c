use std::env;
use anyhow::{Context, Result};

pub const DEFAULT_FORM_RELAY_URL: &str = "https://api.cloudmysite.com/form";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";
pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_REPO_ORG: &str = "arinatechnologies";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub repo_org: String,
    pub stripe_secret_key: Option<String>,
    pub firebase_web_api_key: Option<String>,
    pub form_relay_url: String,
    pub github_api_url: String,
    pub stripe_api_url: String,
    pub identity_toolkit_url: String,
    pub assets_dir: String,
    pub api_docs: bool,
    pub service_port: u16,
    pub service_host: String,
}

/// Reads an optional variable, treating an empty value the same as an unset one.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn with_default(name: &str, default: &str) -> String {
    optional(name).unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let api_docs = env::var("API_DOCS")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .context("API_DOCS must be 'true' or 'false'")?;

        Ok(Config {
            api_key: optional("API_KEY"),
            github_token: optional("GITHUB_TOKEN"),
            github_repo: optional("GITHUB_REPO"),
            repo_owner: optional("REPO_OWNER"),
            repo_name: optional("REPO_NAME"),
            repo_org: with_default("REPO_ORG", DEFAULT_REPO_ORG),
            stripe_secret_key: optional("STRIPE_SECRET_KEY"),
            firebase_web_api_key: optional("FIREBASE_WEB_API_KEY"),
            form_relay_url: with_default("FORM_RELAY_URL", DEFAULT_FORM_RELAY_URL),
            github_api_url: with_default("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            stripe_api_url: with_default("STRIPE_API_URL", DEFAULT_STRIPE_API_URL),
            identity_toolkit_url: with_default(
                "IDENTITY_TOOLKIT_URL",
                DEFAULT_IDENTITY_TOOLKIT_URL,
            ),
            assets_dir: with_default("ASSETS_DIR", "public"),
            api_docs,
            service_port,
            service_host: with_default("SERVICE_HOST", "0.0.0.0"),
        })
    }

    pub fn log_startup(&self) {
        fn secret(value: &Option<String>) -> &'static str {
            if value.is_some() { "set" } else { "unset" }
        }

        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  Form relay: {} (API key {})",
            self.form_relay_url,
            secret(&self.api_key)
        );
        tracing::info!(
            "  GitHub API: {} (token {})",
            self.github_api_url,
            secret(&self.github_token)
        );
        tracing::info!(
            "  GitHub repo: {}",
            self.github_repo.as_deref().unwrap_or("not set (resolved per request)")
        );
        tracing::info!(
            "  Stripe API: {} (secret key {})",
            self.stripe_api_url,
            secret(&self.stripe_secret_key)
        );
        tracing::info!(
            "  Identity Toolkit: {} (web API key {})",
            self.identity_toolkit_url,
            secret(&self.firebase_web_api_key)
        );
        tracing::info!("  Static assets: {}", self.assets_dir);
        tracing::info!("  API docs: {}", if self.api_docs { "enabled" } else { "disabled" });
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }

    /// Configuration pointing every upstream at `base_url`, used by handler tests
    /// together with a mock server.
    #[cfg(test)]
    pub fn for_upstream(base_url: &str) -> Self {
        Config {
            api_key: Some("relay-key".to_string()),
            github_token: Some("gh-token".to_string()),
            github_repo: Some("acme/site".to_string()),
            repo_owner: None,
            repo_name: None,
            repo_org: DEFAULT_REPO_ORG.to_string(),
            stripe_secret_key: Some("sk_test".to_string()),
            firebase_web_api_key: Some("fb-key".to_string()),
            form_relay_url: format!("{}/form", base_url),
            github_api_url: base_url.to_string(),
            stripe_api_url: base_url.to_string(),
            identity_toolkit_url: base_url.to_string(),
            assets_dir: "public".to_string(),
            api_docs: false,
            service_port: 3000,
            service_host: "127.0.0.1".to_string(),
        }
    }
}
