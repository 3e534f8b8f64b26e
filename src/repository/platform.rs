//! HTTP client for the hosted platform.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::client::Client;
use crate::domain::remito::{CreateRemitoRequest, CreateRemitoResponse, CreatedRemito};
use crate::domain::report::MaintenanceReport;
use crate::domain::types::RemoteId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ArtifactStorage, ClientReader, RemitoWriter, ReportWriter};

const REPORTS_ENDPOINT: &str = "/reports";
const REMITOS_ENDPOINT: &str = "/remitos";
const CLIENTS_ENDPOINT: &str = "/clients";
const STORAGE_ENDPOINT: &str = "/storage";

/// Every platform response wraps its payload as `{ "data": ... }`.
#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct SavedReport {
    id: RemoteId,
}

#[derive(Deserialize)]
struct StoredObject {
    #[serde(default)]
    path: Option<String>,
}

/// Platform-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PlatformRepository {
    client: HttpClient,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl PlatformRepository {
    pub fn new(
        base_url: &str,
        api_key: &str,
        bucket: &str,
        timeout: Duration,
    ) -> RepositoryResult<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::ConnectionError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bucket: bucket.to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Client record URL with `id` percent-encoded as one path segment.
    fn client_url(&self, id: &RemoteId) -> RepositoryResult<String> {
        if matches!(id.as_str(), "." | "..") {
            return Err(RepositoryError::ValidationError(format!("invalid client id: {id}")));
        }

        let mut url = Url::parse(&self.url(CLIENTS_ENDPOINT))
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid platform URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Unexpected("Platform URL cannot hold a path".to_string()))?
            .push(id.as_str());
        Ok(url.into())
    }

    /// Sends the request and returns the raw body of a successful response.
    async fn send(&self, request: RequestBuilder, url: &str) -> RepositoryResult<String> {
        let response = request.bearer_auth(&self.api_key).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            debug!("Not found: {url}");
            return Err(RepositoryError::NotFound);
        }

        if !status.is_success() {
            warn!("Platform error response: {status} - {body}");
            return Err(RepositoryError::Status { status, body });
        }

        debug!(
            "Response body (first 500 chars): {}",
            body.chars().take(500).collect::<String>()
        );
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> RepositoryResult<T> {
        self.get_url(&self.url(endpoint)).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: &str) -> RepositoryResult<T> {
        debug!("GET request to: {url}");

        let body = self.send(self.client.get(url), url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> RepositoryResult<T> {
        let url = self.url(endpoint);
        debug!("POST request to: {url}");

        let body = self.send(self.client.post(&url).json(payload), &url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ReportWriter for PlatformRepository {
    async fn save_report(&self, report: &MaintenanceReport) -> RepositoryResult<RemoteId> {
        info!("Saving maintenance report");

        let saved: DataEnvelope<SavedReport> = self.post(REPORTS_ENDPOINT, report).await?;
        Ok(saved.data.id)
    }
}

#[async_trait]
impl RemitoWriter for PlatformRepository {
    async fn create_remito(&self, request: &CreateRemitoRequest) -> RepositoryResult<CreatedRemito> {
        info!(
            "Creating remito with {} parts and {} photos",
            request.reporte_data.repuestos.len(),
            request.fotos.len()
        );

        let response: CreateRemitoResponse = self.post(REMITOS_ENDPOINT, request).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl ArtifactStorage for PlatformRepository {
    async fn upload_pdf(&self, path: &str, bytes: Vec<u8>) -> RepositoryResult<String> {
        let url = self.url(&format!("{STORAGE_ENDPOINT}/{}/{path}", self.bucket));
        info!("Uploading {} bytes to {url}", bytes.len());

        let request = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes);
        let body = self.send(request, &url).await?;

        let stored: StoredObject = serde_json::from_str(&body).unwrap_or(StoredObject { path: None });
        Ok(stored
            .path
            .unwrap_or_else(|| format!("{}/{path}", self.bucket)))
    }
}

#[async_trait]
impl ClientReader for PlatformRepository {
    async fn list_clients(&self) -> RepositoryResult<Vec<Client>> {
        let clients: DataEnvelope<Vec<Client>> = self.get(CLIENTS_ENDPOINT).await?;
        Ok(clients.data)
    }

    async fn get_client(&self, id: &RemoteId) -> RepositoryResult<Option<Client>> {
        let url = self.client_url(id)?;
        match self.get_url::<DataEnvelope<Client>>(&url).await {
            Ok(client) => Ok(Some(client.data)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_joined_without_double_slash() {
        let repo =
            PlatformRepository::new("https://platform.example/api/", "key", "remitos", Duration::from_secs(5))
                .unwrap();

        assert_eq!(repo.url(REPORTS_ENDPOINT), "https://platform.example/api/reports");
    }

    #[test]
    fn client_id_is_a_single_encoded_segment() {
        let repo =
            PlatformRepository::new("https://platform.example/api", "key", "remitos", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            repo.client_url(&RemoteId::new("c-1").unwrap()).unwrap(),
            "https://platform.example/api/clients/c-1"
        );
        assert_eq!(
            repo.client_url(&RemoteId::new("../reports?x=").unwrap()).unwrap(),
            "https://platform.example/api/clients/..%2Freports%3Fx="
        );
        assert!(repo.client_url(&RemoteId::new("..").unwrap()).is_err());
    }

    #[test]
    fn saved_report_accepts_numeric_ids() {
        let saved: DataEnvelope<SavedReport> =
            serde_json::from_str(r#"{"data":{"id":42,"cliente":"ACME"}}"#).unwrap();

        assert_eq!(saved.data.id.as_str(), "42");
    }

    #[test]
    fn client_list_envelope_parses() {
        let clients: DataEnvelope<Vec<Client>> = serde_json::from_str(
            r#"{"data":[{"id":"c-1","nombre":"ACME","telefono":null}]}"#,
        )
        .unwrap();

        assert_eq!(clients.data.len(), 1);
        assert_eq!(clients.data[0].nombre, "ACME");
    }
}
