//! Helpers shared by integration tests.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};

use crate::middleware::server_header::ServerHeader;
use crate::state::app_state::AppState;

/// Builds the full application exactly as `main` wires it, against the given
/// state.
pub async fn create_test_app(
    data: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .wrap(ServerHeader)
            .app_data(data)
            .configure(crate::routes::configure),
    )
    .await
}

/// State whose database target is never reachable. Suitable for routes that
/// must not touch the database (static responses, pre-populated cache reads).
pub fn offline_state() -> AppState {
    AppState::new("postgresql://127.0.0.1:1/unreachable".to_string(), None)
}

/// Live-database URL for gated integration tests; `None` skips them.
pub fn live_db_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok()
}
