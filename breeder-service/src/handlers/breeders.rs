//! Breeder CRUD handlers

use axum::extract::State;

use super::extract::{JsonBody, ListQuery, PathParam, QueryParams};
use crate::error::{Error, Result};
use crate::ids::BreederId;
use crate::links::{link_header, BreederListResponse, BreederOut};
use crate::models::{BreederUpdate, NewBreeder};
use crate::repository::BreederRepository;
use crate::responses::{Created, Message, WithLinks};
use crate::state::AppState;

/// `POST /breeders/`
pub async fn create_breeder(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewBreeder>,
) -> Result<Created<BreederOut>> {
    payload.validate()?;

    let id = BreederId::new();
    let breeder = state.store().create(&id, payload).await?;
    tracing::info!(breeder_id = %id, "Breeder created");

    let out = state.links().breeder_out(breeder);
    let link = link_header(&out.links);
    Ok(Created::new(out)
        .with_location(state.links().breeder(&id))
        .with_link(link))
}

/// `GET /breeders/?limit=&offset=&breeder_city=`
pub async fn list_breeders(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListQuery>,
) -> Result<WithLinks<BreederListResponse>> {
    let pagination = query.pagination();
    let filter = query.filter();

    let records = state.store().find_all(&filter, pagination).await?;
    tracing::debug!(
        count = records.len(),
        offset = pagination.offset,
        limit = ?pagination.limit,
        "Listed breeders"
    );

    let page = state.links().breeder_list(records, &pagination, &filter);
    let link = link_header(&page.links);
    Ok(WithLinks::new(page).with_link(link))
}

/// `GET /breeders/{id}/`
pub async fn get_breeder(
    State(state): State<AppState>,
    PathParam(id): PathParam<BreederId>,
) -> Result<WithLinks<BreederOut>> {
    let breeder = state
        .store()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| Error::NotFound("Breeder not found".to_string()))?;

    let out = state.links().breeder_out(breeder);
    let link = link_header(&out.links);
    Ok(WithLinks::new(out).with_link(link))
}

/// `PUT /breeders/{id}/`, merging only the supplied fields
pub async fn update_breeder(
    State(state): State<AppState>,
    PathParam(id): PathParam<BreederId>,
    JsonBody(changes): JsonBody<BreederUpdate>,
) -> Result<WithLinks<BreederOut>> {
    changes.validate()?;

    let breeder = state.store().update(&id, changes).await?;
    tracing::info!(breeder_id = %id, "Breeder updated");

    let out = state.links().breeder_out(breeder);
    let link = link_header(&out.links);
    Ok(WithLinks::new(out).with_link(link))
}

/// `DELETE /breeders/{id}/`
pub async fn delete_breeder(
    State(state): State<AppState>,
    PathParam(id): PathParam<BreederId>,
) -> Result<Message> {
    state.store().delete(&id).await?;
    tracing::info!(breeder_id = %id, "Breeder deleted");

    Ok(Message::new(format!("Breeder {} has been deleted.", id)))
}

/// `DELETE /breeders/delete/all/`
pub async fn delete_all_breeders(State(state): State<AppState>) -> Result<Message> {
    let removed = state
        .store()
        .delete_all()
        .await
        .map_err(|e| Error::Storage(format!("Failed to delete all breeders: {}", e)))?;
    tracing::info!(removed, "All breeders deleted");

    Ok(Message::new("All breeders have been deleted."))
}
