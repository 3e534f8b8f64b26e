//! Request/response shapes of the schedule check API.

use serde::{Deserialize, Serialize};

use crate::domain::schedule::{BlockLayout, DayGrid, WorkOrder};

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleCheckRequest {
    /// Orders already on the day grid.
    pub orders: Vec<WorkOrder>,
    /// Order being dropped (new or moved).
    pub candidate: WorkOrder,
    #[serde(default)]
    pub grid: Option<DayGrid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleCheckResponse {
    pub conflicts: Vec<String>,
    pub layout: BlockLayout,
}
