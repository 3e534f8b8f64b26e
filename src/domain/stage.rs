//! Equipment sub-components (filtration/treatment stages) and their actions.

use serde::{Deserialize, Serialize};

/// Static descriptor of one equipment stage.
///
/// Report fields for a stage are named `<id>_accion` and `<id>_detalles`.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ComponentStage {
    pub id: &'static str,
    pub title: &'static str,
    pub placeholder: &'static str,
}

impl ComponentStage {
    pub fn action_field(&self) -> String {
        format!("{}_accion", self.id)
    }

    pub fn detail_field(&self) -> String {
        format!("{}_detalles", self.id)
    }
}

/// Stages of a reverse-osmosis unit, in flow order.
pub const OSMOSIS_STAGES: [ComponentStage; 6] = [
    ComponentStage {
        id: "etapa1",
        title: "1ª Etapa: Filtro de Sedimentos (PP)",
        placeholder: "Ej: PP-5 - Cartucho sedimentos 5 µm",
    },
    ComponentStage {
        id: "etapa2",
        title: "2ª Etapa: Carbón Activado Granular (GAC)",
        placeholder: "Ej: GAC-10 - Cartucho carbón granular",
    },
    ComponentStage {
        id: "etapa3",
        title: "3ª Etapa: Carbón Activado en Bloque (CTO)",
        placeholder: "Ej: CTO-10 - Carbón block",
    },
    ComponentStage {
        id: "etapa4",
        title: "4ª Etapa: Membrana de Ósmosis Inversa",
        placeholder: "Ej: TFC-75 - Membrana 75 GPD",
    },
    ComponentStage {
        id: "etapa5",
        title: "5ª Etapa: Post-Filtro de Carbón",
        placeholder: "Ej: T33 - Post carbón en línea",
    },
    ComponentStage {
        id: "etapa6",
        title: "6ª Etapa: Remineralizador / UV",
        placeholder: "Ej: MIN-2 - Cartucho remineralizador",
    },
];

/// Components of a water softener.
pub const SOFTENER_STAGES: [ComponentStage; 4] = [
    ComponentStage {
        id: "resina",
        title: "Resina de Intercambio Iónico",
        placeholder: "Ej: RES-25 - Resina catiónica 25 L",
    },
    ComponentStage {
        id: "valvula",
        title: "Válvula de Control",
        placeholder: "Ej: VC-5600 - Válvula volumétrica",
    },
    ComponentStage {
        id: "prefiltro",
        title: "Prefiltro de Sedimentos",
        placeholder: "Ej: PP-10 - Cartucho 10\"",
    },
    ComponentStage {
        id: "tanque_salmuera",
        title: "Tanque de Salmuera",
        placeholder: "Ej: TS-70 - Flotante y tubo de succión",
    },
];

/// Kind of equipment the report was written for.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    #[default]
    Osmosis,
    Softener,
}

impl EquipmentKind {
    /// Ordered stage registry for this kind of equipment.
    pub fn stages(self) -> &'static [ComponentStage] {
        match self {
            EquipmentKind::Osmosis => &OSMOSIS_STAGES,
            EquipmentKind::Softener => &SOFTENER_STAGES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EquipmentKind::Osmosis => "osmosis",
            EquipmentKind::Softener => "ablandador",
        }
    }
}

impl From<&str> for EquipmentKind {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "ablandador" | "softener" => EquipmentKind::Softener,
            _ => EquipmentKind::Osmosis,
        }
    }
}

/// Action values that mean the component was replaced.
const REPLACED_KEYWORDS: [&str; 6] = [
    "cambiado",
    "cambio",
    "reemplazado",
    "reemplazo",
    "replaced",
    "changed",
];

/// What was done to a stage during the visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageAction {
    Replaced,
    Inspected,
    Unset,
}

impl StageAction {
    pub fn label(self) -> &'static str {
        match self {
            StageAction::Replaced => "Cambiado",
            StageAction::Inspected => "Inspeccionado",
            StageAction::Unset => "---",
        }
    }
}

impl From<&str> for StageAction {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        if normalized.is_empty() {
            StageAction::Unset
        } else if REPLACED_KEYWORDS.contains(&normalized.as_str()) {
            StageAction::Replaced
        } else {
            StageAction::Inspected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_field_names_follow_convention() {
        let stage = OSMOSIS_STAGES[0];
        assert_eq!(stage.action_field(), "etapa1_accion");
        assert_eq!(stage.detail_field(), "etapa1_detalles");
    }

    #[test]
    fn replaced_keywords_are_case_insensitive() {
        assert_eq!(StageAction::from("Cambiado"), StageAction::Replaced);
        assert_eq!(StageAction::from("  REEMPLAZADO "), StageAction::Replaced);
        assert_eq!(StageAction::from("Inspeccionado"), StageAction::Inspected);
        assert_eq!(StageAction::from(""), StageAction::Unset);
    }

    #[test]
    fn equipment_kind_selects_registry() {
        assert_eq!(EquipmentKind::from("ablandador").stages().len(), 4);
        assert_eq!(EquipmentKind::from("").stages().len(), 6);
        assert_eq!(EquipmentKind::from("OSMOSIS"), EquipmentKind::Osmosis);
    }
}
