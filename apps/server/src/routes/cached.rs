//! Cached-queries endpoint, reading from the lazily-populated world cache.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::cache::world;
use crate::error::AppError;
use crate::models::{random_id, World};
use crate::routes::params::clamp_count;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CountParams {
    pub count: Option<String>,
}

async fn cached_queries(
    state: web::Data<AppState>,
    params: web::Query<CountParams>,
) -> Result<HttpResponse, AppError> {
    let url = state.db_url().to_string();
    let timeout = state.query_timeout();
    world::ensure_populated(state.cache(), move || world::load_from_db(url, timeout)).await?;

    let cache = world::snapshot(state.cache())?
        .ok_or_else(|| AppError::internal("world cache empty after population".to_string()))?;

    let count = clamp_count(params.count.as_deref());
    // Ids absent from the cache pass through as nulls; upstream data gaps are
    // not validated here.
    let results: Vec<Option<World>> = (0..count)
        .map(|_| cache.get(&random_id()).cloned())
        .collect();
    Ok(HttpResponse::Ok().json(results))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/cached-queries", web::get().to(cached_queries));
}
