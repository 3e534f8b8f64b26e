use actix_session::Session;
use actix_web::{HttpRequest, Responder, http::header, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::forms::settings::ThemeForm;
use crate::routes::{redirect, set_theme};

#[post("/settings/theme")]
pub async fn save_theme(
    request: HttpRequest,
    session: Session,
    web::Form(form): web::Form<ThemeForm>,
) -> impl Responder {
    if !set_theme(&session, form.theme) {
        FlashMessage::error("❌ No se pudo guardar el tema.").send();
    }

    let back = request
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(referer_path)
        .unwrap_or("/");
    redirect(back)
}

/// Path part of a referer, so the redirect never leaves this host.
fn referer_path(referer: &str) -> Option<&str> {
    let path = if referer.starts_with('/') {
        referer
    } else {
        let (_, rest) = referer.split_once("://")?;
        &rest[rest.find('/')?..]
    };
    // `//host` and `/\host` are both read as another host by browsers.
    (!path.starts_with("//") && !path.starts_with("/\\")).then_some(path)
}

#[cfg(test)]
mod tests {
    use super::referer_path;

    #[test]
    fn referer_is_reduced_to_its_path() {
        assert_eq!(referer_path("https://remitos.local/remito"), Some("/remito"));
        assert_eq!(referer_path("/"), Some("/"));
        assert_eq!(referer_path("https://remitos.local"), None);
        assert_eq!(referer_path("//elsewhere.example/x"), None);
        assert_eq!(referer_path("/\\elsewhere.example/x"), None);
        assert_eq!(referer_path("https://remitos.local/\\elsewhere.example"), None);
    }
}
