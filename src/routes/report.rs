use std::collections::BTreeMap;

use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::alerts::{Alert, AlertLog};
use crate::domain::report::{FIELD_CLIENTE, FIELD_TIPO_EQUIPO};
use crate::domain::stage::EquipmentKind;
use crate::domain::workflow::ReportState;
use crate::dto::report::ReportFormPage;
use crate::forms::report::MaintenanceForm;
use crate::repository::Platform;
use crate::routes::{base_context, redirect, render_template, send_alerts, workflow_for};
use crate::services::ServiceError;
use crate::services::clients::{ClientCache, RetryPolicy, cached_clients};
use crate::services::report;
use crate::sessions::WorkflowRegistry;

#[derive(Deserialize)]
struct ReportFormQuery {
    tipo_equipo: Option<String>,
}

#[allow(clippy::too_many_arguments)]
async fn render_form(
    tera: &Tera,
    repo: &dyn Platform,
    clients: &ClientCache,
    flash_messages: &IncomingFlashMessages,
    inline: &[Alert],
    session: &Session,
    values: BTreeMap<String, String>,
    state: ReportState,
) -> HttpResponse {
    let kind = EquipmentKind::from(values.get(FIELD_TIPO_EQUIPO).map_or("", String::as_str));
    let clients = cached_clients(repo, clients, RetryPolicy::default()).await;

    let mut context = base_context(flash_messages, inline, session, "report");
    context.insert("page", &ReportFormPage::new(kind, clients, values, state));

    render_template(tera, "report/form.html", &context)
}

#[get("/")]
pub async fn show_report_form(
    params: web::Query<ReportFormQuery>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    registry: web::Data<WorkflowRegistry>,
    repo: web::Data<dyn Platform>,
    clients: web::Data<ClientCache>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let workflow = match workflow_for(&session, &registry) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };

    let (mut values, state) = {
        let workflow = workflow.lock().await;
        let values = workflow
            .last_saved_report
            .as_ref()
            .map(|report| report.fields.clone())
            .unwrap_or_default();
        (values, workflow.state)
    };

    if let Some(tipo) = params.into_inner().tipo_equipo {
        values.insert(
            FIELD_TIPO_EQUIPO.to_string(),
            EquipmentKind::from(tipo.as_str()).as_str().to_string(),
        );
    }

    render_form(
        &tera,
        repo.get_ref(),
        &clients,
        &flash_messages,
        &[],
        &session,
        values,
        state,
    )
    .await
}

#[post("/report/save")]
pub async fn save_report(
    session: Session,
    flash_messages: IncomingFlashMessages,
    registry: web::Data<WorkflowRegistry>,
    repo: web::Data<dyn Platform>,
    clients: web::Data<ClientCache>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<MaintenanceForm>,
) -> impl Responder {
    let workflow = match workflow_for(&session, &registry) {
        Ok(workflow) => workflow,
        Err(response) => return response,
    };

    let mut submitted = form.fields.clone();
    submitted.insert(FIELD_CLIENTE.to_string(), form.cliente.clone());

    let alerts = AlertLog::new();
    let mut workflow = workflow.lock().await;
    let result = report::save_report(repo.get_ref(), &mut workflow, form, &alerts).await;
    let state = workflow.state;
    drop(workflow);

    match result {
        Ok(_) => {
            send_alerts(alerts.take());
            redirect("/")
        }
        // Re-render with the submitted values so nothing typed is lost.
        Err(ServiceError::Form(_) | ServiceError::DuplicateSave | ServiceError::Repository(_)) => {
            let inline = alerts.take();
            render_form(
                &tera,
                repo.get_ref(),
                &clients,
                &flash_messages,
                &inline,
                &session,
                submitted,
                state,
            )
            .await
        }
        Err(e) => {
            log::error!("Unexpected failure saving report: {e}");
            send_alerts(alerts.take());
            redirect("/")
        }
    }
}
