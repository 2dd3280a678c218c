use crate::config::Config;
use crate::upstream::UpstreamClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub config: Arc<Config>,
}
