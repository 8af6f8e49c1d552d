//! Delayed creation and task status handlers

use axum::{extract::State, Json};

use super::extract::{JsonBody, PathParam};
use crate::error::{Error, Result};
use crate::ids::BreederId;
use crate::links::{link_header, BreederDelayResponse, Link, LinkRel};
use crate::models::NewBreeder;
use crate::responses::Accepted;
use crate::state::AppState;
use crate::tasks::TaskStatusResponse;

/// `POST /breeders/delay/`
///
/// Responds before the record exists; poll the `status` link for the outcome.
pub async fn create_breeder_delayed(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewBreeder>,
) -> Result<Accepted<BreederDelayResponse>> {
    payload.validate()?;

    let links = state.links();
    let task_id = state.worker().submit(payload.clone());
    let body = links.delay_response(&task_id, &payload);

    let status = Link::new(LinkRel::Status, links.task_status(&task_id));
    Ok(Accepted::new(body).with_link(link_header(&[status])))
}

/// `GET /task-status/{task_id}`
pub async fn task_status(
    State(state): State<AppState>,
    PathParam(task_id): PathParam<BreederId>,
) -> Result<Json<TaskStatusResponse>> {
    let entry = state
        .tasks()
        .get(&task_id)
        .ok_or_else(|| Error::NotFound("Task not found".to_string()))?;

    Ok(Json(TaskStatusResponse::new(task_id, entry)))
}
