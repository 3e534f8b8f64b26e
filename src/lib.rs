#[cfg(feature = "server")]
use std::sync::Arc;

#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::{Platform, PlatformRepository};
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_clients, api_v1_schedule_check};
#[cfg(feature = "server")]
use crate::routes::remito::{add_remito_row, finalize_remito, print_remito, show_remito};
#[cfg(feature = "server")]
use crate::routes::report::{save_report, show_report_form};
#[cfg(feature = "server")]
use crate::routes::settings::save_theme;
#[cfg(feature = "server")]
use crate::services::clients::ClientCache;
#[cfg(feature = "server")]
use crate::sessions::WorkflowRegistry;

pub mod alerts;
pub mod domain;
pub mod dto;
pub mod forms;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod services;
pub mod sessions;

/// Cookie signing needs at least this many bytes of secret.
pub const MIN_SECRET_LEN: usize = 64;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let repo = PlatformRepository::new(
        &server_config.platform_url,
        &server_config.platform_api_key,
        &server_config.storage_bucket,
        server_config.request_timeout(),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to create platform client: {e}")))?;
    let repo: web::Data<dyn Platform> = web::Data::from(Arc::new(repo) as Arc<dyn Platform>);

    if server_config.secret.len() < MIN_SECRET_LEN {
        return Err(std::io::Error::other(format!(
            "secret must be at least {MIN_SECRET_LEN} bytes"
        )));
    }

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let registry = web::Data::new(WorkflowRegistry::new(
        server_config.workflow_idle_timeout(),
        server_config.max_workflows,
    ));
    let clients = web::Data::new(ClientCache::new(server_config.client_cache_ttl()));

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Starting server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(server_config.domain.clone()))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api")
                    .service(api_v1_clients)
                    .service(api_v1_schedule_check),
            )
            .service(show_report_form)
            .service(save_report)
            .service(show_remito)
            .service(add_remito_row)
            .service(finalize_remito)
            .service(print_remito)
            .service(save_theme)
            .app_data(web::Data::new(tera.clone()))
            .app_data(repo.clone())
            .app_data(registry.clone())
            .app_data(clients.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
