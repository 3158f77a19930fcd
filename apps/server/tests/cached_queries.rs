//! Cached-queries behavior against a pre-populated cache. A populated cache
//! key means the loader never runs, so none of these tests need a database;
//! the state's connection target is deliberately unreachable to prove it.

use std::collections::BTreeMap;

use actix_web::{test, web};
use driftbench::test_support::{create_test_app, offline_state};
use driftbench::world_cache::CACHE_KEY;
use driftbench::{AppState, World};

fn state_with_cache(worlds: &BTreeMap<i32, World>) -> web::Data<AppState> {
    let state = offline_state();
    state
        .cache()
        .set(CACHE_KEY, serde_json::to_string(worlds).unwrap());
    web::Data::new(state)
}

fn full_mapping() -> BTreeMap<i32, World> {
    (1..=10_000)
        .map(|id| {
            (
                id,
                World {
                    id,
                    random_number: id * 2 % 10_000 + 1,
                },
            )
        })
        .collect()
}

async fn fetch_array(data: web::Data<AppState>, uri: &str) -> serde_json::Value {
    let app = create_test_app(data).await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "GET {uri}");
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap()
}

#[actix_web::test]
async fn returns_entries_from_the_cached_mapping() {
    let worlds = full_mapping();
    let values = fetch_array(state_with_cache(&worlds), "/cached-queries?count=10").await;

    let entries = values.as_array().unwrap();
    assert_eq!(entries.len(), 10);
    for entry in entries {
        let id = entry["id"].as_i64().unwrap() as i32;
        let random_number = entry["randomNumber"].as_i64().unwrap() as i32;
        assert_eq!(random_number, worlds[&id].random_number);
    }
}

#[actix_web::test]
async fn ids_absent_from_the_cache_come_back_as_null() {
    let values = fetch_array(state_with_cache(&BTreeMap::new()), "/cached-queries?count=3").await;
    assert_eq!(values, serde_json::json!([null, null, null]));
}

#[actix_web::test]
async fn count_is_clamped_into_range() {
    let worlds = full_mapping();
    let cases = [
        ("/cached-queries", 1),
        ("/cached-queries?count=abc", 1),
        ("/cached-queries?count=0", 1),
        ("/cached-queries?count=-5", 1),
        ("/cached-queries?count=500", 500),
        ("/cached-queries?count=10000", 500),
        ("/cached-queries?count=7", 7),
    ];
    for (uri, expected_len) in cases {
        let values = fetch_array(state_with_cache(&worlds), uri).await;
        assert_eq!(values.as_array().unwrap().len(), expected_len, "GET {uri}");
    }
}

#[actix_web::test]
async fn populated_cache_never_touches_the_database() {
    // The offline state's connection target cannot be reached, so a 200 here
    // proves the hit path short-circuits the loader.
    let values = fetch_array(state_with_cache(&full_mapping()), "/cached-queries?count=1").await;
    assert_eq!(values.as_array().unwrap().len(), 1);
}
