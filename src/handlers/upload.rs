use crate::error::{ApiError, ErrorResponse};
use crate::handlers::{parse_json, passthrough, request_host};
use crate::models::UploadRequest;
use crate::repo::resolve_repo;
use crate::routes;
use crate::state::AppState;
use crate::upstream::RepoFile;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Uri},
    response::Response,
};
use serde_json::Value as JsonValue;

const UPLOAD_DIR: &str = "uploads";
const BRANCH: &str = "main";

fn non_empty(value: Option<JsonValue>) -> Option<String> {
    match value {
        Some(JsonValue::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// A filename must name a single entry directly inside the uploads directory.
fn is_plain_filename(name: &str) -> bool {
    name != "." && !name.contains("..") && !name.contains(['/', '\\', '?', '#'])
}

/// POST /upload-to-github handler - Create or overwrite an uploaded file
///
/// Looks up the current hash of `uploads/<filename>` first and includes it in
/// the write when the file already exists. The write response is returned
/// unchanged.
#[utoipa::path(
    post,
    path = routes::UPLOAD_TO_GITHUB,
    request_body = UploadRequest,
    responses(
        (status = 200, description = "File updated, response passed through"),
        (status = 201, description = "File created, response passed through"),
        (status = 400, description = "Missing filename or file content, or invalid filename", body = ErrorResponse),
        (status = 500, description = "Repository not configured or upstream failure", body = ErrorResponse)
    ),
    tag = "content"
)]
pub async fn upload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Response, ApiError> {
    let upload: UploadRequest = parse_json(&body)?;
    let (filename, content) = match (
        non_empty(upload.filename),
        non_empty(upload.file_content_base64),
    ) {
        (Some(filename), Some(content)) => (filename, content),
        _ => return Err(ApiError::MissingFields),
    };
    if !is_plain_filename(&filename) {
        return Err(ApiError::InvalidFilename(filename));
    }

    let repo = resolve_repo(&state.config, request_host(&headers, &uri))?;
    let token = state
        .config
        .github_token
        .as_deref()
        .ok_or_else(|| ApiError::Config("GITHUB_TOKEN is not configured".to_string()))?;

    let file = RepoFile {
        repo: &repo,
        dir: UPLOAD_DIR,
        name: &filename,
        branch: BRANCH,
    };
    tracing::info!("Uploading {}", file);

    // The write needs the current hash to overwrite, so the lookup finishes first.
    let sha = state.upstream.github_file_sha(&file, token).await?;
    match &sha {
        Some(sha) => tracing::info!("Existing file found, sha {}", sha),
        None => tracing::info!("No existing file found, creating new"),
    }

    let upstream = state
        .upstream
        .github_put_file(
            &file,
            token,
            format!("Upload {}", filename),
            &content,
            sha.as_deref(),
        )
        .await?;

    Ok(passthrough(upstream, Some("application/json")))
}
