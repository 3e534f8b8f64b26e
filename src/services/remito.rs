//! Remito view, finalization and PDF archival.

use crate::alerts::{Alert, Notifier};
use crate::domain::remito::{CreateRemitoRequest, CreatedRemito, RemitoContext};
use crate::domain::repuesto::collect_repuestos;
use crate::domain::workflow::{ReportState, TransitionError, WorkflowSession};
use crate::dto::remito::{PrintableRemito, RemitoView};
use crate::forms::remito::FinalizeRemitoForm;
use crate::repository::{ArtifactStorage, RemitoWriter};
use crate::services::pdf::render_pdf;
use crate::services::{ServiceError, ServiceResult};

pub const SAVE_FIRST_MESSAGE: &str =
    "Primero debés guardar el reporte antes de generar el remito.";
pub const OPEN_FIRST_MESSAGE: &str = "Abrí el remito antes de finalizarlo.";
pub const ALREADY_FINALIZED_MESSAGE: &str =
    "Este remito ya fue generado. Guardá el reporte nuevamente para generar otro.";
pub const TOO_MANY_ROWS_MESSAGE: &str = "No se pueden agregar más filas vacías.";

fn transition_message(err: &TransitionError) -> &'static str {
    match err {
        TransitionError::NotSaved => SAVE_FIRST_MESSAGE,
        TransitionError::NotRendered => OPEN_FIRST_MESSAGE,
        TransitionError::AlreadyFinalized => ALREADY_FINALIZED_MESSAGE,
    }
}

/// Object storage key of the archived remito PDF.
pub fn pdf_storage_path(remito: &CreatedRemito) -> String {
    format!("remitos/{}_{}.pdf", remito.id, remito.numero)
}

/// Projects the last saved report onto the remito view.
///
/// Returns `None` and warns when nothing was saved yet. A finalized remito
/// can still be viewed; it just stays finalized.
pub fn open_remito_view(
    session: &mut WorkflowSession,
    context: Option<&RemitoContext>,
    notifier: &dyn Notifier,
) -> Option<RemitoView> {
    let Some(report) = session.last_saved_report.as_ref() else {
        notifier.notify(Alert::warning(SAVE_FIRST_MESSAGE));
        return None;
    };

    if session.state != ReportState::RemitoFinalized {
        match session.state.render() {
            Ok(next) => session.state = next,
            Err(e) => {
                notifier.notify(Alert::warning(transition_message(&e)));
                return None;
            }
        }
    }

    Some(RemitoView::populate(report, context, &session.observaciones))
}

/// Writes the edited rows, observations and photos into the session.
fn store_edits(session: &mut WorkflowSession, form: FinalizeRemitoForm) -> ServiceResult<()> {
    let repuestos = collect_repuestos(form.rows());
    for foto in form.fotos {
        let slot = foto.slot;
        if !session.set_photo(foto) {
            log::warn!("Dropping photo for unknown slot {slot}");
        }
    }
    session.observaciones = form.observaciones.trim().to_string();

    let report = session
        .last_saved_report
        .as_mut()
        .ok_or(ServiceError::NoSavedReport)?;
    report.apply_edited_repuestos(repuestos);
    Ok(())
}

/// Keeps the current edits and offers one more empty parts row.
///
/// Only an open, not yet finalized remito can be edited.
pub fn add_parts_row(
    session: &mut WorkflowSession,
    form: FinalizeRemitoForm,
    notifier: &dyn Notifier,
) -> ServiceResult<()> {
    if session.state != ReportState::RemitoRendered {
        let err = match session.state {
            ReportState::Draft => TransitionError::NotSaved,
            ReportState::Saved => TransitionError::NotRendered,
            _ => TransitionError::AlreadyFinalized,
        };
        notifier.notify(Alert::warning(transition_message(&err)));
        return Err(err.into());
    }

    store_edits(session, form)?;
    if !session.add_blank_row() {
        notifier.notify(Alert::warning(TOO_MANY_ROWS_MESSAGE));
    }
    Ok(())
}

/// Finalizes the remito from the edited view.
///
/// The edited rows, observations and photos are written into the session
/// before the platform call, so a failed attempt can be retried as is.
pub async fn finalize_remito<R>(
    repo: &R,
    session: &mut WorkflowSession,
    form: FinalizeRemitoForm,
    context: Option<&RemitoContext>,
    notifier: &dyn Notifier,
) -> ServiceResult<RemitoView>
where
    R: RemitoWriter + ArtifactStorage + ?Sized,
{
    let next = match session.state.finalize() {
        Ok(next) => next,
        Err(e) => {
            notifier.notify(Alert::warning(transition_message(&e)));
            return Err(e.into());
        }
    };

    if let Err(e) = store_edits(session, form) {
        notifier.notify(Alert::warning(SAVE_FIRST_MESSAGE));
        return Err(e);
    }
    let photos = session.photos();

    let Some(report) = session.last_saved_report.as_mut() else {
        return Err(ServiceError::NoSavedReport);
    };

    let request = CreateRemitoRequest {
        reporte_data: report.clone(),
        observaciones: session.observaciones.clone(),
        fotos: photos.clone(),
    };

    let created = match repo.create_remito(&request).await {
        Ok(created) => created,
        Err(e) => {
            log::error!("Failed to create remito: {e}");
            notifier.notify(Alert::error(format!("Error al generar el remito: {e}")));
            return Err(e.into());
        }
    };

    report.numero_remito = Some(created.numero.clone());
    session.state = next;

    let mut message = format!("Remito {} generado correctamente.", created.numero);
    if let Some(status) = created.email_status_text() {
        message.push(' ');
        message.push_str(&status);
    }
    notifier.notify(Alert::success(message));
    log::info!("Created remito {} (id {})", created.numero, created.id);

    let printable = PrintableRemito::build(report, context, &session.observaciones, &photos);
    archive_pdf(repo, &printable, &created).await;

    let view = printable.view;
    session.remito = Some(created);
    Ok(view)
}

/// Renders and uploads the remito PDF. Failures never undo the finalize.
async fn archive_pdf<R>(repo: &R, printable: &PrintableRemito, remito: &CreatedRemito)
where
    R: ArtifactStorage + ?Sized,
{
    let bytes = match render_pdf(printable) {
        Ok((bytes, pages)) => {
            log::debug!("Rendered remito {} PDF with {pages} page(s)", remito.numero);
            bytes
        }
        Err(e) => {
            log::error!("Failed to render PDF for remito {}: {e}", remito.numero);
            return;
        }
    };

    match repo.upload_pdf(&pdf_storage_path(remito), bytes).await {
        Ok(path) => log::info!("Stored remito PDF at {path}"),
        Err(e) => log::error!("Failed to upload PDF for remito {}: {e}", remito.numero),
    }
}

/// Printable model of the finalized remito, if there is one.
pub fn printable_remito(
    session: &WorkflowSession,
    context: Option<&RemitoContext>,
) -> Option<PrintableRemito> {
    if session.state != ReportState::RemitoFinalized {
        return None;
    }
    let report = session.last_saved_report.as_ref()?;
    Some(PrintableRemito::build(
        report,
        context,
        &session.observaciones,
        &session.photos(),
    ))
}
