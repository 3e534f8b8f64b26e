use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::alerts::AlertLog;
use crate::domain::remito::{PHOTO_SLOT_COUNT, RemitoContext};
use crate::forms::remito::{FinalizeRemitoForm, FinalizeRemitoMultipart};
use crate::repository::Platform;
use crate::routes::{base_context, redirect, render_template, send_alerts, workflow_for};
use crate::services::clients::find_remito_context;
use crate::services::remito::{
    add_parts_row, finalize_remito as finalize, open_remito_view, printable_remito,
};
use crate::services::render::{render_parts_rows, render_printable_html};
use crate::sessions::{SharedWorkflow, WorkflowRegistry};

/// Client context of the saved report, looked up without holding the workflow.
async fn lookup_context(repo: &dyn Platform, workflow: &SharedWorkflow) -> Option<RemitoContext> {
    let report = workflow.lock().await.last_saved_report.clone()?;
    find_remito_context(repo, &report).await
}

fn read_form(form: FinalizeRemitoMultipart) -> Result<FinalizeRemitoForm, HttpResponse> {
    FinalizeRemitoForm::try_from(form).map_err(|e| {
        log::error!("Failed to read remito form: {e}");
        FlashMessage::error(format!("❌ No se pudieron leer las fotos: {e}")).send();
        redirect("/remito")
    })
}

#[get("/remito")]
pub async fn show_remito(
    session: Session,
    flash_messages: IncomingFlashMessages,
    registry: web::Data<WorkflowRegistry>,
    repo: web::Data<dyn Platform>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let workflow = match workflow_for(&session, &registry) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };
    let context = lookup_context(repo.get_ref(), &workflow).await;
    let mut workflow = workflow.lock().await;

    let alerts = AlertLog::new();
    let Some(view) = open_remito_view(&mut workflow, context.as_ref(), &alerts) else {
        send_alerts(alerts.take());
        return redirect("/");
    };

    let parts_rows = match render_parts_rows(&tera, &view.parts) {
        Ok(html) => html,
        Err(e) => {
            log::error!("Failed to render parts table: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let slots = (0..PHOTO_SLOT_COUNT)
        .map(|slot| {
            workflow
                .photo_slots
                .get(slot)
                .and_then(|photo| photo.as_ref())
                .and_then(|photo| photo.storage_path.clone())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let mut page = base_context(&flash_messages, &alerts.take(), &session, "remito");
    page.insert("remito", &view);
    page.insert("parts_rows", &parts_rows);
    page.insert("blank_rows", &workflow.blank_rows);
    page.insert("photo_refs", &slots);
    page.insert("state", &workflow.state);

    render_template(&tera, "remito/view.html", &page)
}

#[post("/remito/rows")]
pub async fn add_remito_row(
    session: Session,
    registry: web::Data<WorkflowRegistry>,
    MultipartForm(form): MultipartForm<FinalizeRemitoMultipart>,
) -> impl Responder {
    let workflow = match workflow_for(&session, &registry) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };
    let form = match read_form(form) {
        Ok(form) => form,
        Err(response) => return response,
    };

    let alerts = AlertLog::new();
    let mut workflow = workflow.lock().await;
    if let Err(e) = add_parts_row(&mut workflow, form, &alerts) {
        log::debug!("Parts row not added: {e}");
    }
    send_alerts(alerts.take());

    redirect("/remito")
}

#[post("/remito/finalize")]
pub async fn finalize_remito(
    session: Session,
    registry: web::Data<WorkflowRegistry>,
    repo: web::Data<dyn Platform>,
    MultipartForm(form): MultipartForm<FinalizeRemitoMultipart>,
) -> impl Responder {
    let workflow = match workflow_for(&session, &registry) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };

    let Ok(mut workflow) = workflow.try_lock() else {
        FlashMessage::warning("⚠️ El remito ya se está generando. Esperá a que termine.").send();
        return redirect("/remito");
    };

    let form = match read_form(form) {
        Ok(form) => form,
        Err(response) => return response,
    };

    let context = match workflow.last_saved_report.as_ref() {
        Some(report) => find_remito_context(repo.get_ref(), report).await,
        None => None,
    };

    let alerts = AlertLog::new();
    if let Err(e) = finalize(repo.get_ref(), &mut workflow, form, context.as_ref(), &alerts).await {
        log::warn!("Remito finalize failed: {e}");
    }
    send_alerts(alerts.take());

    redirect("/remito")
}

#[get("/remito/print")]
pub async fn print_remito(
    session: Session,
    registry: web::Data<WorkflowRegistry>,
    repo: web::Data<dyn Platform>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let workflow = match workflow_for(&session, &registry) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };
    let context = lookup_context(repo.get_ref(), &workflow).await;
    let workflow = workflow.lock().await;

    let Some(printable) = printable_remito(&workflow, context.as_ref()) else {
        FlashMessage::warning("⚠️ Todavía no hay un remito generado para imprimir.").send();
        return redirect("/remito");
    };

    match render_printable_html(&tera, &printable) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            log::error!("Failed to render printable remito: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
