//! Data shaped for the maintenance form page.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::report::{OPERATING_PARAMETERS, OperatingParameter};
use crate::domain::stage::{ComponentStage, EquipmentKind};
use crate::domain::workflow::ReportState;

/// Aggregated data required to render the maintenance form.
#[derive(Debug, Serialize)]
pub struct ReportFormPage {
    pub tipo_equipo: &'static str,
    pub stages: &'static [ComponentStage],
    pub parameters: &'static [OperatingParameter],
    pub clients: Vec<Client>,
    /// Values to refill the inputs with.
    pub values: BTreeMap<String, String>,
    pub state: ReportState,
    /// True when saving again needs explicit confirmation.
    pub requires_confirmation: bool,
}

impl ReportFormPage {
    pub fn new(
        kind: EquipmentKind,
        clients: Vec<Client>,
        values: BTreeMap<String, String>,
        state: ReportState,
    ) -> Self {
        Self {
            tipo_equipo: kind.as_str(),
            stages: kind.stages(),
            parameters: &OPERATING_PARAMETERS,
            clients,
            values,
            state,
            requires_confirmation: state.has_been_saved(),
        }
    }
}
