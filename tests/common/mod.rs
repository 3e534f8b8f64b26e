#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use fieldservice_remitos::domain::client::Client;
use fieldservice_remitos::domain::remito::{CreateRemitoRequest, CreatedRemito};
use fieldservice_remitos::domain::report::MaintenanceReport;
use fieldservice_remitos::domain::types::{RemitoNumber, RemoteId};
use fieldservice_remitos::repository::errors::{RepositoryError, RepositoryResult};
use fieldservice_remitos::repository::{ArtifactStorage, ClientReader, RemitoWriter, ReportWriter};

/// In-memory platform that records every call.
#[derive(Default)]
pub struct FakePlatform {
    pub reports: Mutex<Vec<MaintenanceReport>>,
    pub remitos: Mutex<Vec<CreateRemitoRequest>>,
    pub uploads: Mutex<Vec<String>>,
    pub fail_remitos: Mutex<bool>,
}

#[async_trait]
impl ReportWriter for FakePlatform {
    async fn save_report(&self, report: &MaintenanceReport) -> RepositoryResult<RemoteId> {
        let mut reports = self.reports.lock().unwrap();
        reports.push(report.clone());
        Ok(RemoteId::new(reports.len().to_string())?)
    }
}

#[async_trait]
impl RemitoWriter for FakePlatform {
    async fn create_remito(&self, request: &CreateRemitoRequest) -> RepositoryResult<CreatedRemito> {
        if *self.fail_remitos.lock().unwrap() {
            return Err(RepositoryError::ConnectionError("función no disponible".to_string()));
        }
        let mut remitos = self.remitos.lock().unwrap();
        remitos.push(request.clone());
        Ok(CreatedRemito {
            numero: RemitoNumber::new(format!("REM-{:04}", 98 + remitos.len()))?,
            id: RemoteId::new("300")?,
            email_status: None,
        })
    }
}

#[async_trait]
impl ArtifactStorage for FakePlatform {
    async fn upload_pdf(&self, path: &str, bytes: Vec<u8>) -> RepositoryResult<String> {
        assert!(bytes.starts_with(b"%PDF"));
        self.uploads.lock().unwrap().push(path.to_string());
        Ok(path.to_string())
    }
}

#[async_trait]
impl ClientReader for FakePlatform {
    async fn list_clients(&self) -> RepositoryResult<Vec<Client>> {
        Ok(vec![])
    }

    async fn get_client(&self, id: &RemoteId) -> RepositoryResult<Option<Client>> {
        Ok((id.as_str() == "12").then(|| Client {
            id: id.clone(),
            nombre: "Aguas del Sur S.A.".to_string(),
            direccion: Some("Av. Siempre Viva 742".to_string()),
            telefono: None,
            email: Some("compras@aguasdelsur.example".to_string()),
            cuit: Some("30-12345678-9".to_string()),
        }))
    }
}
