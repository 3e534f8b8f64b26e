use serde::{Deserialize, Serialize};

use crate::domain::remito::RemitoContext;
use crate::domain::types::RemoteId;

/// Client as listed by the hosted platform.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: RemoteId,
    pub nombre: String,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cuit: Option<String>,
}

impl From<&Client> for RemitoContext {
    fn from(client: &Client) -> Self {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            nombre: client.nombre.trim().to_string(),
            direccion: text(&client.direccion),
            telefono: text(&client.telefono),
            email: text(&client.email),
            cuit: text(&client.cuit),
        }
    }
}
