//! Access to the hosted platform: report store, remito creation function,
//! object storage and the client directory.

use async_trait::async_trait;

use crate::{
    domain::{
        client::Client,
        remito::{CreateRemitoRequest, CreatedRemito},
        report::MaintenanceReport,
        types::RemoteId,
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod platform;

pub use platform::PlatformRepository;

#[async_trait]
pub trait ReportWriter {
    /// Persists the report snapshot, returning the platform id.
    async fn save_report(&self, report: &MaintenanceReport) -> RepositoryResult<RemoteId>;
}

#[async_trait]
pub trait RemitoWriter {
    async fn create_remito(&self, request: &CreateRemitoRequest) -> RepositoryResult<CreatedRemito>;
}

#[async_trait]
pub trait ArtifactStorage {
    /// Uploads a PDF under `path`, returning the stored object path.
    async fn upload_pdf(&self, path: &str, bytes: Vec<u8>) -> RepositoryResult<String>;
}

#[async_trait]
pub trait ClientReader {
    async fn list_clients(&self) -> RepositoryResult<Vec<Client>>;
    async fn get_client(&self, id: &RemoteId) -> RepositoryResult<Option<Client>>;
}

/// Everything the web handlers need from the platform.
pub trait Platform: ReportWriter + RemitoWriter + ArtifactStorage + ClientReader + Send + Sync {}

impl<T> Platform for T where T: ReportWriter + RemitoWriter + ArtifactStorage + ClientReader + Send + Sync
{}
