//! Maintenance form submission and snapshot building.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::dates::{format_date_display, normalize_date};
use crate::domain::report::{
    DATE_FIELDS, DISPLAY_SUFFIX, FIELD_CLIENTE, FIELD_TIPO_EQUIPO, MaintenanceReport,
    RESERVED_FIELDS,
};
use crate::domain::stage::EquipmentKind;

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
/// Every named input of the maintenance form.
pub struct MaintenanceForm {
    /// Client display name; the only required field.
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub cliente: String,
    /// Set when the user confirmed saving an already saved report again.
    #[serde(default)]
    pub confirmar_duplicado: Option<String>,
    /// Remaining inputs keyed by field name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl MaintenanceForm {
    pub fn confirms_duplicate(&self) -> bool {
        matches!(
            self.confirmar_duplicado.as_deref().map(str::trim),
            Some("1" | "on" | "true" | "si" | "sí")
        )
    }

    /// Captures the form as a report snapshot.
    ///
    /// Values are trimmed, date fields are stored as ISO with a `DD/MM/YYYY`
    /// `<field>_display` twin, every stage of the selected equipment gets its
    /// action/detail pair, and the replacement register is derived.
    pub fn build_snapshot(&self) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();

        for (name, value) in &self.fields {
            if RESERVED_FIELDS.contains(&name.as_str()) {
                continue;
            }
            report.set_field(name.as_str(), value.trim());
        }
        report.set_field(FIELD_CLIENTE, self.cliente.trim());

        let kind = EquipmentKind::from(report.field(FIELD_TIPO_EQUIPO));
        report.set_field(FIELD_TIPO_EQUIPO, kind.as_str());

        for field in DATE_FIELDS {
            let raw = report.field(field).to_string();
            report.set_field(field, normalize_date(&raw));
            report.set_field(format!("{field}{DISPLAY_SUFFIX}"), format_date_display(&raw));
        }

        for stage in kind.stages() {
            report.fields.entry(stage.action_field()).or_default();
            report.fields.entry(stage.detail_field()).or_default();
        }

        report.componentes = report.derive_componentes();
        report
    }
}
