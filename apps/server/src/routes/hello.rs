//! Static benchmark endpoints: JSON and plaintext serialization.

use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Message {
    message: &'static str,
}

async fn json() -> HttpResponse {
    HttpResponse::Ok().json(Message {
        message: "Hello, World!",
    })
}

async fn plaintext() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body("Hello, World!")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/json", web::get().to(json))
        .route("/plaintext", web::get().to(plaintext));
}
