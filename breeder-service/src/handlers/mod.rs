//! HTTP handlers and routing
//!
//! Breeder routes live under `/api/v1/breeders`. Task status is served both
//! there and at `/api/v1/task-status/`, which is where the `status` link of a
//! delayed submission points. Routes are registered with their trailing
//! slash, as the links spell them.

mod breeders;
mod extract;
mod tasks;

pub use breeders::{
    create_breeder, delete_all_breeders, delete_breeder, get_breeder, list_breeders,
    update_breeder,
};
pub use extract::{JsonBody, ListQuery, PathParam, QueryParams};
pub use tasks::{create_breeder_delayed, task_status};

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::{health, state::AppState};

/// Version prefix shared by every API route
pub const API_PREFIX: &str = "/api/v1";

/// Build the application router
pub fn router(state: AppState) -> Router {
    let api = |path: &str| format!("{API_PREFIX}{path}");

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .route(
            &api("/breeders/"),
            post(create_breeder).get(list_breeders),
        )
        .route(&api("/breeders/delay/"), post(create_breeder_delayed))
        .route(&api("/breeders/delete/all/"), delete(delete_all_breeders))
        .route(
            &api("/breeders/{id}/"),
            get(get_breeder).put(update_breeder).delete(delete_breeder),
        )
        .route(&api("/breeders/task-status/{task_id}"), get(task_status))
        .route(&api("/breeders/task-status/{task_id}/"), get(task_status))
        .route(&api("/task-status/{task_id}"), get(task_status))
        .route(&api("/task-status/{task_id}/"), get(task_status))
        .with_state(state)
}
