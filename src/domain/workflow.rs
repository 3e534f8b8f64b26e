//! Lifecycle of a maintenance record inside one browser session.

use serde::Serialize;
use thiserror::Error;

use crate::domain::remito::{CreatedRemito, PHOTO_SLOT_COUNT, RemitoPhoto};
use crate::domain::report::MaintenanceReport;
use crate::domain::types::RemoteId;

/// Blank parts rows offered by a freshly opened remito view.
pub const DEFAULT_BLANK_ROWS: usize = 1;
/// Upper bound for blank rows added one at a time.
pub const MAX_BLANK_ROWS: usize = 20;

/// `Draft → Saved → RemitoRendered → RemitoFinalized`.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    #[default]
    Draft,
    Saved,
    RemitoRendered,
    RemitoFinalized,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("the report has not been saved yet")]
    NotSaved,
    #[error("the remito view has not been opened")]
    NotRendered,
    #[error("the remito was already finalized")]
    AlreadyFinalized,
}

impl ReportState {
    /// True once the report has been persisted at least once.
    pub fn has_been_saved(self) -> bool {
        self != ReportState::Draft
    }

    /// Saving is always possible and restarts the remito flow.
    pub fn save(self) -> ReportState {
        ReportState::Saved
    }

    pub fn render(self) -> Result<ReportState, TransitionError> {
        match self {
            ReportState::Draft => Err(TransitionError::NotSaved),
            ReportState::Saved | ReportState::RemitoRendered => Ok(ReportState::RemitoRendered),
            ReportState::RemitoFinalized => Err(TransitionError::AlreadyFinalized),
        }
    }

    pub fn finalize(self) -> Result<ReportState, TransitionError> {
        match self {
            ReportState::Draft => Err(TransitionError::NotSaved),
            ReportState::Saved => Err(TransitionError::NotRendered),
            ReportState::RemitoRendered => Ok(ReportState::RemitoFinalized),
            ReportState::RemitoFinalized => Err(TransitionError::AlreadyFinalized),
        }
    }
}

/// Mutable state of one maintenance form instance.
#[derive(Clone, Debug)]
pub struct WorkflowSession {
    pub state: ReportState,
    /// Snapshot captured at the last successful save, later edited by finalize.
    pub last_saved_report: Option<MaintenanceReport>,
    pub report_id: Option<RemoteId>,
    pub photo_slots: Vec<Option<RemitoPhoto>>,
    pub remito: Option<CreatedRemito>,
    pub observaciones: String,
    /// Empty parts rows shown under the existing ones.
    pub blank_rows: usize,
}

impl Default for WorkflowSession {
    fn default() -> Self {
        Self {
            state: ReportState::Draft,
            last_saved_report: None,
            report_id: None,
            photo_slots: vec![None; PHOTO_SLOT_COUNT],
            remito: None,
            observaciones: String::new(),
            blank_rows: DEFAULT_BLANK_ROWS,
        }
    }
}

impl WorkflowSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a freshly saved snapshot, discarding any previous remito.
    pub fn record_save(&mut self, report: MaintenanceReport, report_id: RemoteId) {
        self.state = self.state.save();
        self.last_saved_report = Some(report);
        self.report_id = Some(report_id);
        self.remito = None;
        self.observaciones.clear();
        self.photo_slots = vec![None; PHOTO_SLOT_COUNT];
        self.blank_rows = DEFAULT_BLANK_ROWS;
    }

    /// Offers one more empty parts row, up to [`MAX_BLANK_ROWS`].
    pub fn add_blank_row(&mut self) -> bool {
        if self.blank_rows >= MAX_BLANK_ROWS {
            return false;
        }
        self.blank_rows += 1;
        true
    }

    /// Photos in filled slots, in slot order.
    pub fn photos(&self) -> Vec<RemitoPhoto> {
        self.photo_slots.iter().flatten().cloned().collect()
    }

    /// Places a photo in its slot; out-of-range slots are ignored.
    pub fn set_photo(&mut self, photo: RemitoPhoto) -> bool {
        match self.photo_slots.get_mut(photo.slot) {
            Some(slot) => {
                *slot = Some(photo);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let state = ReportState::Draft.save();
        assert_eq!(state, ReportState::Saved);
        let state = state.render().unwrap();
        assert_eq!(state.render(), Ok(ReportState::RemitoRendered));
        assert_eq!(state.finalize(), Ok(ReportState::RemitoFinalized));
    }

    #[test]
    fn rejects_out_of_order_transitions() {
        assert_eq!(ReportState::Draft.render(), Err(TransitionError::NotSaved));
        assert_eq!(ReportState::Saved.finalize(), Err(TransitionError::NotRendered));
        assert_eq!(
            ReportState::RemitoFinalized.finalize(),
            Err(TransitionError::AlreadyFinalized)
        );
        assert_eq!(
            ReportState::RemitoFinalized.render(),
            Err(TransitionError::AlreadyFinalized)
        );
    }

    #[test]
    fn save_resets_remito_state() {
        let mut session = WorkflowSession::new();
        session.state = ReportState::RemitoFinalized;
        session.observaciones = "viejo".to_string();
        session.add_blank_row();
        session.set_photo(RemitoPhoto {
            slot: 1,
            mime_type: None,
            file_name: None,
            base64: None,
            storage_path: Some("fotos/1.jpg".to_string()),
        });

        session.record_save(MaintenanceReport::default(), RemoteId::new("9").unwrap());

        assert_eq!(session.state, ReportState::Saved);
        assert!(session.observaciones.is_empty());
        assert!(session.photos().is_empty());
        assert!(session.state.has_been_saved());
        assert_eq!(session.blank_rows, DEFAULT_BLANK_ROWS);
    }

    #[test]
    fn photos_outside_slots_are_rejected() {
        let mut session = WorkflowSession::new();
        let photo = RemitoPhoto {
            slot: PHOTO_SLOT_COUNT,
            mime_type: None,
            file_name: None,
            base64: Some("AA==".to_string()),
            storage_path: None,
        };

        assert!(!session.set_photo(photo));
    }

    #[test]
    fn blank_rows_are_capped() {
        let mut session = WorkflowSession::new();
        while session.add_blank_row() {}

        assert_eq!(session.blank_rows, MAX_BLANK_ROWS);
    }
}
