use actix_session::Session;
use actix_web::{HttpResponse, http::header};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};
use uuid::Uuid;

use crate::alerts::{Alert, AlertLevel};
use crate::forms::settings::Theme;
use crate::sessions::{SharedWorkflow, WorkflowRegistry};

pub mod api;
pub mod remito;
pub mod report;
pub mod settings;

const WORKFLOW_KEY: &str = "workflow_id";
const THEME_KEY: &str = "theme";

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

fn alert_to_str(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Error => "danger",
        AlertLevel::Warning => "warning",
        AlertLevel::Success => "success",
        AlertLevel::Info => "info",
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Queues service alerts for the next rendered page.
pub fn send_alerts(alerts: Vec<Alert>) {
    for alert in alerts {
        let message = match alert.level {
            AlertLevel::Success => FlashMessage::success(alert.message),
            AlertLevel::Info => FlashMessage::info(alert.message),
            AlertLevel::Warning => FlashMessage::warning(alert.message),
            AlertLevel::Error => FlashMessage::error(alert.message),
        };
        message.send();
    }
}

pub fn theme(session: &Session) -> Theme {
    match session.get::<Theme>(THEME_KEY) {
        Ok(theme) => theme.unwrap_or_default(),
        Err(e) => {
            log::warn!("Ignoring unreadable theme preference: {e}");
            Theme::default()
        }
    }
}

pub fn set_theme(session: &Session, theme: Theme) -> bool {
    match session.insert(THEME_KEY, theme) {
        Ok(()) => true,
        Err(e) => {
            log::error!("Failed to store theme preference: {e}");
            false
        }
    }
}

/// Page context with flash messages, inline alerts and the theme.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    inline: &[Alert],
    session: &Session,
    current_page: &str,
) -> Context {
    let mut alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    alerts.extend(
        inline
            .iter()
            .map(|alert| (alert.message.clone(), alert_to_str(alert.level))),
    );

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("theme", &theme(session));
    context.insert("current_page", current_page);
    context
}

/// Workflow bound to the browser session, assigning a new id when missing.
pub fn workflow_for(
    session: &Session,
    registry: &WorkflowRegistry,
) -> Result<SharedWorkflow, HttpResponse> {
    let id = match session.get::<Uuid>(WORKFLOW_KEY) {
        Ok(Some(id)) => id,
        Ok(None) | Err(_) => {
            let id = Uuid::new_v4();
            if let Err(e) = session.insert(WORKFLOW_KEY, id) {
                log::error!("Failed to store workflow id in session: {e}");
                return Err(HttpResponse::InternalServerError().finish());
            }
            id
        }
    };
    Ok(registry.get_or_create(id))
}
