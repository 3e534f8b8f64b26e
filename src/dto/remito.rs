//! View models for the remito screen and the printable document.

use serde::Serialize;

use crate::domain::remito::{RemitoContext, RemitoPhoto};
use crate::domain::report::{
    DISPLAY_SUFFIX, FIELD_CLIENTE, FIELD_CUIT, FIELD_DIRECCION, FIELD_EMAIL, FIELD_FECHA,
    FIELD_MODELO, FIELD_PROXIMO, FIELD_RESUMEN, FIELD_SERIE, FIELD_TECNICO, FIELD_TELEFONO,
    FIELD_UBICACION, MaintenanceReport, OPERATING_PARAMETERS,
};
use crate::domain::repuesto::RepuestoItem;
use crate::domain::stage::EquipmentKind;

/// Shown for contact fields that were checked but are empty.
pub const MISSING_VALUE: &str = "---";

/// Single-row message of an empty parts table.
pub const NO_PARTS_MESSAGE: &str = "No se registraron repuestos cambiados en este mantenimiento.";

/// Columns of the parts table: code, description, quantity.
pub const PARTS_COLUMNS: usize = 3;

fn or_missing(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        MISSING_VALUE.to_string()
    } else {
        value.to_string()
    }
}

/// Prefers the context value, falling back to the report field.
fn pick<'a>(context: Option<&'a str>, report_value: &'a str) -> &'a str {
    context
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(report_value)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClientDisplay {
    pub nombre: String,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub cuit: String,
}

impl ClientDisplay {
    pub fn build(report: &MaintenanceReport, context: Option<&RemitoContext>) -> Self {
        Self {
            nombre: pick(context.map(|c| c.nombre.as_str()), report.field(FIELD_CLIENTE))
                .trim()
                .to_string(),
            direccion: pick(context.map(|c| c.direccion.as_str()), report.field(FIELD_DIRECCION))
                .trim()
                .to_string(),
            telefono: or_missing(pick(
                context.map(|c| c.telefono.as_str()),
                report.field(FIELD_TELEFONO),
            )),
            email: or_missing(pick(
                context.map(|c| c.email.as_str()),
                report.field(FIELD_EMAIL),
            )),
            cuit: or_missing(pick(context.map(|c| c.cuit.as_str()), report.field(FIELD_CUIT))),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EquipmentDisplay {
    pub tipo: String,
    pub modelo: String,
    pub serie: String,
    pub ubicacion: String,
    pub tecnico: String,
    pub fecha: String,
    pub proximo_mantenimiento: String,
}

impl EquipmentDisplay {
    pub fn build(report: &MaintenanceReport) -> Self {
        let tipo = match report.equipment_kind() {
            EquipmentKind::Osmosis => "Ósmosis inversa",
            EquipmentKind::Softener => "Ablandador",
        };

        Self {
            tipo: tipo.to_string(),
            modelo: report.field(FIELD_MODELO).to_string(),
            serie: report.field(FIELD_SERIE).to_string(),
            ubicacion: report.field(FIELD_UBICACION).to_string(),
            tecnico: report.field(FIELD_TECNICO).to_string(),
            fecha: report
                .field(&format!("{FIELD_FECHA}{DISPLAY_SUFFIX}"))
                .to_string(),
            proximo_mantenimiento: report
                .field(&format!("{FIELD_PROXIMO}{DISPLAY_SUFFIX}"))
                .to_string(),
        }
    }
}

/// Parts table contents: either rows or the single "no parts" message row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PartsTable {
    pub rows: Vec<RepuestoItem>,
    pub empty_message: Option<&'static str>,
    pub columns: usize,
}

impl PartsTable {
    pub fn new(rows: Vec<RepuestoItem>) -> Self {
        let empty_message = rows.is_empty().then_some(NO_PARTS_MESSAGE);
        Self {
            rows,
            empty_message,
            columns: PARTS_COLUMNS,
        }
    }
}

/// Read-only projection of a saved report onto the remito screen.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemitoView {
    /// Server-assigned number; empty until finalized.
    pub numero: String,
    pub finalized: bool,
    pub cliente: ClientDisplay,
    pub equipo: EquipmentDisplay,
    pub parts: PartsTable,
    pub observaciones: String,
    pub resumen: String,
}

impl RemitoView {
    /// Populates the view from a report snapshot.
    pub fn populate(
        report: &MaintenanceReport,
        context: Option<&RemitoContext>,
        observaciones: &str,
    ) -> Self {
        let numero = report
            .numero_remito
            .as_ref()
            .map(|numero| numero.to_string())
            .unwrap_or_default();

        Self {
            finalized: report.numero_remito.is_some(),
            numero,
            cliente: ClientDisplay::build(report, context),
            equipo: EquipmentDisplay::build(report),
            parts: PartsTable::new(report.derive_repuestos()),
            observaciones: observaciones.to_string(),
            resumen: report.field(FIELD_RESUMEN).to_string(),
        }
    }
}

/// As-found / as-left comparison row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ParameterRow {
    pub label: String,
    pub unit: String,
    pub as_found: String,
    pub as_left: String,
}

/// Component-replacement register row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComponentRow {
    pub titulo: String,
    pub accion: String,
    pub detalle: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PhotoCell {
    pub slot: usize,
    pub src: String,
    pub caption: String,
}

impl PhotoCell {
    fn build(photo: &RemitoPhoto) -> Option<Self> {
        let src = photo.data_uri().or_else(|| photo.storage_path.clone())?;
        let caption = photo
            .file_name
            .clone()
            .unwrap_or_else(|| format!("Foto {}", photo.slot + 1));
        Some(Self {
            slot: photo.slot,
            src,
            caption,
        })
    }
}

/// Everything the printable remito shows.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PrintableRemito {
    pub view: RemitoView,
    pub parametros: Vec<ParameterRow>,
    pub componentes: Vec<ComponentRow>,
    pub fotos: Vec<PhotoCell>,
}

impl PrintableRemito {
    pub fn build(
        report: &MaintenanceReport,
        context: Option<&RemitoContext>,
        observaciones: &str,
        photos: &[RemitoPhoto],
    ) -> Self {
        let parametros = OPERATING_PARAMETERS
            .iter()
            .map(|param| ParameterRow {
                label: param.label.to_string(),
                unit: param.unit.to_string(),
                as_found: or_missing(report.field(&param.found_field())),
                as_left: or_missing(report.field(&param.left_field())),
            })
            .collect();

        let componentes = report
            .stages()
            .iter()
            .map(|stage| ComponentRow {
                titulo: stage.title.to_string(),
                accion: report.stage_action(stage).label().to_string(),
                detalle: report.stage_detail(stage).to_string(),
            })
            .collect();

        Self {
            view: RemitoView::populate(report, context, observaciones),
            parametros,
            componentes,
            fotos: photos.iter().filter_map(PhotoCell::build).collect(),
        }
    }
}
