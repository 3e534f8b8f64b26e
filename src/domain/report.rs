//! Maintenance report snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::repuesto::{RepuestoItem, ReplacedComponent, repuesto_from_detail};
use crate::domain::stage::{ComponentStage, EquipmentKind, StageAction};
use crate::domain::types::RemitoNumber;

pub const FIELD_CLIENTE_ID: &str = "cliente_id";
pub const FIELD_CLIENTE: &str = "cliente";
pub const FIELD_DIRECCION: &str = "direccion";
pub const FIELD_TELEFONO: &str = "cliente_telefono";
pub const FIELD_EMAIL: &str = "cliente_email";
pub const FIELD_CUIT: &str = "cliente_cuit";
pub const FIELD_FECHA: &str = "fecha";
pub const FIELD_PROXIMO: &str = "proximo_mantenimiento";
pub const FIELD_TECNICO: &str = "tecnico";
pub const FIELD_TIPO_EQUIPO: &str = "tipo_equipo";
pub const FIELD_MODELO: &str = "equipo_modelo";
pub const FIELD_SERIE: &str = "equipo_serie";
pub const FIELD_UBICACION: &str = "equipo_ubicacion";
pub const FIELD_RESUMEN: &str = "resumen";

/// Report fields holding dates; each also gets a `<field>_display` twin.
pub const DATE_FIELDS: [&str; 2] = [FIELD_FECHA, FIELD_PROXIMO];

/// Suffix of the display twin of a date field.
pub const DISPLAY_SUFFIX: &str = "_display";

/// Keys owned by the typed members of [`MaintenanceReport`]; never plain fields.
pub const RESERVED_FIELDS: [&str; 3] = ["repuestos", "componentes", "NumeroRemito"];

/// Measured operating parameter, recorded before and after the visit.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct OperatingParameter {
    pub id: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
}

impl OperatingParameter {
    pub fn found_field(&self) -> String {
        format!("{}_found", self.id)
    }

    pub fn left_field(&self) -> String {
        format!("{}_left", self.id)
    }
}

pub const OPERATING_PARAMETERS: [OperatingParameter; 7] = [
    OperatingParameter {
        id: "presion_entrada",
        label: "Presión de entrada",
        unit: "psi",
    },
    OperatingParameter {
        id: "tds_entrada",
        label: "TDS agua de red",
        unit: "ppm",
    },
    OperatingParameter {
        id: "tds_permeado",
        label: "TDS agua producto",
        unit: "ppm",
    },
    OperatingParameter {
        id: "caudal_permeado",
        label: "Caudal de permeado",
        unit: "l/min",
    },
    OperatingParameter {
        id: "caudal_rechazo",
        label: "Caudal de rechazo",
        unit: "l/min",
    },
    OperatingParameter {
        id: "temperatura",
        label: "Temperatura del agua",
        unit: "°C",
    },
    OperatingParameter {
        id: "dureza",
        label: "Dureza",
        unit: "ppm CaCO3",
    },
];

/// Flat snapshot of the maintenance form taken at save time.
///
/// Plain form values live in `fields`; the parts list, the replacement
/// register and the remito number are typed. At most one of `repuestos` and
/// `componentes` describes the replaced parts once a remito is finalized.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceReport {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repuestos: Vec<RepuestoItem>,
    #[serde(default)]
    pub componentes: Vec<ReplacedComponent>,
    #[serde(
        rename = "NumeroRemito",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub numero_remito: Option<RemitoNumber>,
}

impl MaintenanceReport {
    /// Value of a plain field, `""` when absent.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn equipment_kind(&self) -> EquipmentKind {
        EquipmentKind::from(self.field(FIELD_TIPO_EQUIPO))
    }

    pub fn stages(&self) -> &'static [ComponentStage] {
        self.equipment_kind().stages()
    }

    pub fn stage_action(&self, stage: &ComponentStage) -> StageAction {
        StageAction::from(self.field(&stage.action_field()))
    }

    pub fn stage_detail(&self, stage: &ComponentStage) -> &str {
        self.field(&stage.detail_field())
    }

    /// Stages marked as replaced, in registry order.
    pub fn replaced_stages(&self) -> impl Iterator<Item = &'static ComponentStage> + '_ {
        self.stages()
            .iter()
            .filter(|stage| self.stage_action(stage) == StageAction::Replaced)
    }

    /// Replacement register derived from the stage fields.
    pub fn derive_componentes(&self) -> Vec<ReplacedComponent> {
        self.replaced_stages()
            .map(|stage| ReplacedComponent::new(stage, self.stage_detail(stage)))
            .collect()
    }

    /// Parts table rows for the remito.
    ///
    /// An explicit `repuestos` list wins; otherwise one row per replaced stage
    /// with its code guessed from the detail text.
    pub fn derive_repuestos(&self) -> Vec<RepuestoItem> {
        if !self.repuestos.is_empty() {
            return self.repuestos.clone();
        }

        self.replaced_stages()
            .map(|stage| repuesto_from_detail(self.stage_detail(stage)))
            .collect()
    }

    /// Replaces the parts list with user-edited rows.
    ///
    /// When any row survives, the replacement register is cleared so the
    /// replaced parts are described exactly once.
    pub fn apply_edited_repuestos(&mut self, repuestos: Vec<RepuestoItem>) {
        if !repuestos.is_empty() {
            self.componentes.clear();
        }
        self.repuestos = repuestos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pairs: &[(&str, &str)]) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();
        for (name, value) in pairs {
            report.set_field(*name, *value);
        }
        report
    }

    #[test]
    fn derives_row_from_replaced_stage() {
        let report = report(&[
            ("etapa1_accion", "Cambiado"),
            ("etapa1_detalles", "COD123 - Filtro X"),
        ]);

        assert_eq!(
            report.derive_repuestos(),
            vec![RepuestoItem::new("COD123", "Filtro X", "1")]
        );
    }

    #[test]
    fn inspected_stages_produce_no_rows() {
        let report = report(&[
            ("etapa1_accion", "Inspeccionado"),
            ("etapa1_detalles", "COD123 - Filtro X"),
            ("etapa2_accion", ""),
        ]);

        assert!(report.derive_repuestos().is_empty());
        assert!(report.derive_componentes().is_empty());
    }

    #[test]
    fn explicit_repuestos_are_used_verbatim() {
        let mut report = report(&[
            ("etapa1_accion", "Cambiado"),
            ("etapa1_detalles", "COD123 - Filtro X"),
        ]);
        report.repuestos = vec![RepuestoItem::new("K1", "Kit", "")];

        assert_eq!(
            report.derive_repuestos(),
            vec![RepuestoItem::new("K1", "Kit", "")]
        );
    }

    #[test]
    fn softener_reports_use_their_own_stages() {
        let report = report(&[
            ("tipo_equipo", "ablandador"),
            ("resina_accion", "Cambiado"),
            ("resina_detalles", "RES-25 - Resina catiónica"),
            ("etapa1_accion", "Cambiado"),
        ]);

        let componentes = report.derive_componentes();
        assert_eq!(componentes.len(), 1);
        assert_eq!(componentes[0].etapa, "resina");
    }

    #[test]
    fn edited_repuestos_clear_componentes() {
        let mut report = report(&[("etapa1_accion", "Cambiado")]);
        report.componentes = report.derive_componentes();

        report.apply_edited_repuestos(vec![]);
        assert_eq!(report.componentes.len(), 1);

        report.apply_edited_repuestos(vec![RepuestoItem::new("A", "B", "1")]);
        assert!(report.componentes.is_empty());
        assert_eq!(report.repuestos.len(), 1);
    }

    #[test]
    fn serializes_flat_with_remito_number() {
        let mut report = report(&[("cliente", "ACME")]);
        report.numero_remito = Some(RemitoNumber::new("REM-1").unwrap());

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["cliente"], "ACME");
        assert_eq!(json["NumeroRemito"], "REM-1");
        assert_eq!(json["componentes"], serde_json::json!([]));
        assert!(json.get("repuestos").is_none());
    }

    #[test]
    fn parameter_labels_fit_the_builtin_pdf_fonts() {
        // Built-in PDF fonts only cover Latin-1.
        for param in OPERATING_PARAMETERS {
            for text in [param.label, param.unit] {
                assert!(text.chars().all(|c| u32::from(c) <= 0xFF), "{text}");
            }
        }
    }
}
