//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    /// Base URL of the hosted platform API.
    pub platform_url: String,
    pub platform_api_key: String,
    /// Object storage bucket receiving remito PDFs.
    pub storage_bucket: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// How long the client list is reused between fetches.
    #[serde(default = "default_client_cache")]
    pub client_cache_secs: u64,
    /// Idle time after which a browser's workflow is dropped.
    #[serde(default = "default_workflow_idle")]
    pub workflow_idle_secs: u64,
    #[serde(default = "default_max_workflows")]
    pub max_workflows: usize,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_client_cache() -> u64 {
    300
}

fn default_workflow_idle() -> u64 {
    12 * 60 * 60
}

fn default_max_workflows() -> usize {
    10_000
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn client_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.client_cache_secs)
    }

    pub fn workflow_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.workflow_idle_secs)
    }
}
