use anyhow::{anyhow, Context, Result};
use axum::http::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use crate::config::Config;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const GITHUB_USER_AGENT: &str = "cloudmysite-worker";

/// Status, content type and raw body of an upstream response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl UpstreamResponse {
    async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response.text().await?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// A file in one directory on one branch of a repository
///
/// `dir` and `name` each become a single percent-encoded URL segment.
#[derive(Debug, Clone)]
pub struct RepoFile<'a> {
    pub repo: &'a str,
    pub dir: &'a str,
    pub name: &'a str,
    pub branch: &'a str,
}

impl std::fmt::Display for RepoFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.repo, self.dir, self.name)
    }
}

/// Content write request body for the source-control API
#[derive(Debug, Serialize)]
struct ContentWrite<'a> {
    message: String,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayNameUpdate<'a> {
    id_token: &'a str,
    display_name: &'a str,
}

/// Shareable client for every third-party API the dispatcher calls
///
/// Holds one pooled `reqwest::Client` and the base URLs from configuration.
/// Methods return the upstream response as-is; interpreting status codes is
/// left to the handlers.
#[derive(Clone)]
pub struct UpstreamClient {
    http: Client,
    config: Arc<Config>,
}

impl UpstreamClient {
    /// Create a new upstream client from configuration
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, config })
    }

    fn bearer(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Forward a form submission to the relay endpoint
    pub async fn relay_form(
        &self,
        payload: &Map<String, JsonValue>,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let mut request = self.http.post(&self.config.form_relay_url).json(payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = UpstreamResponse::read(request.send().await?).await?;
        tracing::info!("Form relay responded with {}", response.status);
        Ok(response)
    }

    fn contents_url(&self, file: &RepoFile<'_>) -> Result<Url> {
        let mut url = Url::parse(&self.config.github_api_url)
            .with_context(|| format!("Invalid GITHUB_API_URL: {}", self.config.github_api_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("GITHUB_API_URL cannot be used as a base URL"))?
            .pop_if_empty()
            .push("repos")
            .extend(file.repo.split('/'))
            .push("contents")
            .push(file.dir)
            .push(file.name);
        Ok(url)
    }

    fn github(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        Self::bearer(builder, Some(token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, GITHUB_USER_AGENT)
    }

    /// Look up the content hash of an existing file
    ///
    /// # Returns
    /// * `Ok(Some(sha))` - file exists on `branch`
    /// * `Ok(None)` - any non-success status, or no `sha` in the body
    /// * `Err(_)` - the request failed or a success body was not JSON
    pub async fn github_file_sha(
        &self,
        file: &RepoFile<'_>,
        token: &str,
    ) -> Result<Option<String>> {
        let request = self
            .github(self.http.get(self.contents_url(file)?), token)
            .query(&[("ref", file.branch)]);

        let response = UpstreamResponse::read(request.send().await?).await?;
        if !response.is_success() {
            tracing::debug!("No existing file at {} ({})", file, response.status);
            return Ok(None);
        }

        let existing = response
            .json()
            .context("Failed to parse existing file metadata")?;
        Ok(existing
            .get("sha")
            .and_then(JsonValue::as_str)
            .map(ToString::to_string))
    }

    /// Create or update a file; `sha` must be the current hash when updating
    pub async fn github_put_file(
        &self,
        file: &RepoFile<'_>,
        token: &str,
        message: String,
        content: &str,
        sha: Option<&str>,
    ) -> Result<UpstreamResponse> {
        let body = ContentWrite {
            message,
            content,
            branch: file.branch,
            sha,
        };
        let request = self
            .github(self.http.put(self.contents_url(file)?), token)
            .json(&body);

        let response = UpstreamResponse::read(request.send().await?).await?;
        tracing::info!("GitHub write of {} responded with {}", file, response.status);
        Ok(response)
    }

    /// Create a hosted checkout session for a single price, quantity one
    pub async fn stripe_checkout_session(
        &self,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.config.stripe_api_url.trim_end_matches('/')
        );
        let form = [
            ("success_url", success_url),
            ("cancel_url", cancel_url),
            ("mode", "payment"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
        ];
        let request = Self::bearer(
            self.http.post(url),
            self.config.stripe_secret_key.as_deref(),
        )
        .form(&form);

        let response = UpstreamResponse::read(request.send().await?).await?;
        tracing::info!("Stripe checkout session responded with {}", response.status);
        Ok(response)
    }

    fn identity_url(&self, operation: &str) -> String {
        format!(
            "{}/v1/accounts:{}",
            self.config.identity_toolkit_url.trim_end_matches('/'),
            operation
        )
    }

    fn identity(&self, operation: &str) -> RequestBuilder {
        let request = self.http.post(self.identity_url(operation));
        match &self.config.firebase_web_api_key {
            Some(key) => request.query(&[("key", key)]),
            None => request,
        }
    }

    /// Register an email/password account, requesting a persistent session token
    pub async fn identity_sign_up(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let body = SignUpRequest {
            email,
            password,
            return_secure_token: true,
        };

        let request = self.identity("signUp").json(&body);
        let response = UpstreamResponse::read(request.send().await?).await?;
        tracing::info!("Identity sign-up responded with {}", response.status);
        Ok(response)
    }

    /// Set the display name of the account owning `id_token`
    pub async fn identity_update_display_name(
        &self,
        id_token: &str,
        display_name: &str,
    ) -> Result<UpstreamResponse, reqwest::Error> {
        let body = DisplayNameUpdate {
            id_token,
            display_name,
        };

        UpstreamResponse::read(self.identity("update").json(&body).send().await?).await
    }
}
