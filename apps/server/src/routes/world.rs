//! Database read and read-modify-write endpoints.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::executor::{DbHandle, Param};
use crate::drift::drift;
use crate::error::AppError;
use crate::models::{random_id, World};
use crate::routes::params::clamp_count;
use crate::state::app_state::AppState;

const SELECT_WORLD: &str = "SELECT id, randomnumber FROM world WHERE id = $1";
const UPDATE_WORLD: &str = "UPDATE world SET randomnumber = $1 WHERE id = $2";

#[derive(Debug, Deserialize)]
pub struct QueriesParams {
    pub queries: Option<String>,
}

async fn fetch_world(conn: &DbHandle, id: i32) -> Result<World, AppError> {
    let rows = drift(conn.query(SELECT_WORLD, vec![Param::Int(id)])).await?;
    let row = rows
        .first()
        .ok_or_else(|| AppError::db(format!("no world row with id {id}")))?;
    World::from_row(row)
}

async fn single_query(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let conn = DbHandle::connect(state.db_url(), state.query_timeout()).await?;
    let world = fetch_world(&conn, random_id()).await?;
    Ok(HttpResponse::Ok().json(world))
}

async fn multiple_queries(
    state: web::Data<AppState>,
    params: web::Query<QueriesParams>,
) -> Result<HttpResponse, AppError> {
    let count = clamp_count(params.queries.as_deref());
    let conn = DbHandle::connect(state.db_url(), state.query_timeout()).await?;

    // One round trip per element; batching into an IN clause would change
    // what the endpoint measures.
    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        results.push(fetch_world(&conn, random_id()).await?);
    }
    Ok(HttpResponse::Ok().json(results))
}

async fn updates(
    state: web::Data<AppState>,
    params: web::Query<QueriesParams>,
) -> Result<HttpResponse, AppError> {
    let count = clamp_count(params.queries.as_deref());
    let conn = DbHandle::connect(state.db_url(), state.query_timeout()).await?;

    // Independent read-then-write per id, no transaction and no optimistic
    // check. Concurrent requests touching the same id can overwrite each
    // other's value; that lost-update hazard is an accepted property of the
    // endpoint.
    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        let id = random_id();
        let current = fetch_world(&conn, id).await?;
        let next = random_id();
        drift(conn.query(UPDATE_WORLD, vec![Param::Int(next), Param::Int(id)])).await?;
        results.push(World {
            id: current.id,
            random_number: next,
        });
    }
    Ok(HttpResponse::Ok().json(results))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/db", web::get().to(single_query))
        .route("/queries", web::get().to(multiple_queries))
        .route("/updates", web::get().to(updates));
}
