//! Remito (delivery note) records exchanged with the creation endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::report::MaintenanceReport;
use crate::domain::types::{RemitoNumber, RemoteId};

/// Number of photo slots offered on a remito.
pub const PHOTO_SLOT_COUNT: usize = 4;

/// Photo attached to a remito slot.
///
/// Either carries the image inline (`base64`) or points at an object that was
/// already uploaded (`storage_path`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemitoPhoto {
    pub slot: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

impl RemitoPhoto {
    /// Inline `data:` URI usable in the printable document.
    pub fn data_uri(&self) -> Option<String> {
        let data = self.base64.as_ref()?;
        let mime = self.mime_type.as_deref().unwrap_or("image/jpeg");
        Some(format!("data:{mime};base64,{data}"))
    }
}

/// Body of the remito creation call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRemitoRequest {
    pub reporte_data: MaintenanceReport,
    pub observaciones: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fotos: Vec<RemitoPhoto>,
}

/// Remito as acknowledged by the creation endpoint.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CreatedRemito {
    #[serde(rename = "NumeroRemito")]
    pub numero: RemitoNumber,
    pub id: RemoteId,
    /// Free-form note about the confirmation email, shown to the user as-is.
    #[serde(rename = "emailStatus", default)]
    pub email_status: Option<serde_json::Value>,
}

impl CreatedRemito {
    /// Human readable email status, if the endpoint reported one.
    pub fn email_status_text(&self) -> Option<String> {
        match self.email_status.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Envelope returned by the creation endpoint: `{ "data": { ... } }`.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateRemitoResponse {
    pub data: CreatedRemito,
}

/// Denormalized client display fields used when the report lacks them.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemitoContext {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cuit: String,
}
