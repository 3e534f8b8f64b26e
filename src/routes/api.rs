use actix_web::{HttpResponse, Responder, get, post, web};
use log::error;
use serde_json::json;

use crate::dto::schedule::ScheduleCheckRequest;
use crate::repository::{ClientReader, Platform};
use crate::services::schedule::check_schedule;

#[get("/v1/clients")]
pub async fn api_v1_clients(repo: web::Data<dyn Platform>) -> impl Responder {
    match repo.list_clients().await {
        Ok(clients) => HttpResponse::Ok().json(clients),
        Err(e) => {
            error!("Failed to list clients: {e}");
            HttpResponse::BadGateway().finish()
        }
    }
}

#[post("/v1/schedule/check")]
pub async fn api_v1_schedule_check(
    web::Json(request): web::Json<ScheduleCheckRequest>,
) -> impl Responder {
    match check_schedule(request) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
    }
}
