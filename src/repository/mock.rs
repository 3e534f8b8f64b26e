//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::client::Client;
use crate::domain::remito::{CreateRemitoRequest, CreatedRemito};
use crate::domain::report::MaintenanceReport;
use crate::domain::types::RemoteId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ArtifactStorage, ClientReader, RemitoWriter, ReportWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl ReportWriter for Repository {
        async fn save_report(&self, report: &MaintenanceReport) -> RepositoryResult<RemoteId>;
    }

    #[async_trait]
    impl RemitoWriter for Repository {
        async fn create_remito(&self, request: &CreateRemitoRequest) -> RepositoryResult<CreatedRemito>;
    }

    #[async_trait]
    impl ArtifactStorage for Repository {
        async fn upload_pdf(&self, path: &str, bytes: Vec<u8>) -> RepositoryResult<String>;
    }

    #[async_trait]
    impl ClientReader for Repository {
        async fn list_clients(&self) -> RepositoryResult<Vec<Client>>;
        async fn get_client(&self, id: &RemoteId) -> RepositoryResult<Option<Client>>;
    }
}
