use crate::config::Config;
use crate::error::ApiError;

const PLATFORM_SUFFIX: &str = "workers.dev";

/// Resolve the `owner/name` repository that uploads are written to.
///
/// Priority:
/// 1. `GITHUB_REPO` when configured
/// 2. `<REPO_ORG>/<service>` when the request host is `<service>.….workers.dev`
/// 3. `REPO_OWNER/REPO_NAME` when both are configured
///
/// # Errors
/// Returns `ApiError::Config` when none of the above applies.
pub fn resolve_repo(config: &Config, host: Option<&str>) -> Result<String, ApiError> {
    if let Some(repo) = &config.github_repo {
        return Ok(repo.clone());
    }

    if let Some(service) = host.and_then(platform_service) {
        return Ok(format!("{}/{}", config.repo_org, service));
    }

    if let (Some(owner), Some(name)) = (&config.repo_owner, &config.repo_name) {
        return Ok(format!("{}/{}", owner, name));
    }

    Err(ApiError::Config(
        "Repo not configured. Set GITHUB_REPO, or REPO_OWNER+REPO_NAME, or run on *.workers.dev."
            .to_string(),
    ))
}

/// First label of a `*.workers.dev` host, ignoring any port.
fn platform_service(host: &str) -> Option<&str> {
    let hostname = host.split(':').next()?;
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() < 3 {
        return None;
    }

    let suffix = labels[labels.len() - 2..].join(".");
    if suffix.eq_ignore_ascii_case(PLATFORM_SUFFIX) {
        Some(labels[0]).filter(|label| !label.is_empty())
    } else {
        None
    }
}
