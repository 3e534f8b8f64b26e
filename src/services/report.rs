//! Saving the maintenance report.

use validator::Validate;

use crate::alerts::{Alert, Notifier};
use crate::domain::types::RemoteId;
use crate::domain::workflow::WorkflowSession;
use crate::forms::FormError;
use crate::forms::report::MaintenanceForm;
use crate::repository::ReportWriter;
use crate::services::{ServiceError, ServiceResult};

pub const SAVED_MESSAGE: &str = "Reporte guardado correctamente";
pub const MISSING_CLIENT_MESSAGE: &str = "Completá el nombre del cliente antes de guardar.";
pub const DUPLICATE_MESSAGE: &str =
    "Este reporte ya fue guardado. Confirmá para guardarlo nuevamente.";

/// Captures the form as a snapshot and persists it on the platform.
///
/// The session adopts the snapshot only after the platform accepted it, so a
/// failed save leaves any previous snapshot and remito state in place.
pub async fn save_report<R>(
    repo: &R,
    session: &mut WorkflowSession,
    form: MaintenanceForm,
    notifier: &dyn Notifier,
) -> ServiceResult<RemoteId>
where
    R: ReportWriter + ?Sized,
{
    if let Err(e) = form.validate() {
        notifier.notify(Alert::warning(MISSING_CLIENT_MESSAGE));
        return Err(FormError::from(e).into());
    }

    if session.state.has_been_saved() && !form.confirms_duplicate() {
        notifier.notify(Alert::warning(DUPLICATE_MESSAGE));
        return Err(ServiceError::DuplicateSave);
    }

    let report = form.build_snapshot();

    match repo.save_report(&report).await {
        Ok(report_id) => {
            log::info!("Saved maintenance report {report_id}");
            session.record_save(report, report_id.clone());
            notifier.notify(Alert::success(SAVED_MESSAGE));
            Ok(report_id)
        }
        Err(e) => {
            log::error!("Failed to save maintenance report: {e}");
            notifier.notify(Alert::error(format!("Error al guardar el reporte: {e}")));
            Err(e.into())
        }
    }
}
