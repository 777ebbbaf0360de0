//! Admin tag CRUD endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use pressroom_core::TagId;

use crate::db::RepositoryError;
use crate::db::tags::{TagRepository, TagUpsert};
use crate::error::{AppError, Result};
use crate::models::Tag;
use crate::state::AppState;

/// Payload for creating or updating a tag.
#[derive(Debug, Deserialize)]
pub struct TagPayload {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl TagPayload {
    fn validate(&self) -> Result<TagUpsert> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
        if self.slug.trim().is_empty()
            || !self
                .slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AppError::BadRequest(
                "slug must be lowercase letters, digits, and hyphens".to_string(),
            ));
        }

        Ok(TagUpsert {
            name: self.name.trim().to_string(),
            slug: self.slug.clone(),
            color: self.color.clone(),
        })
    }
}

/// List tags, most used first.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    let tags = TagRepository::new(state.pool())
        .list()
        .await
        .map_err(AppError::Database)?;

    Ok(Json(tags))
}

/// Create a tag.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TagPayload>,
) -> Result<(StatusCode, Json<Tag>)> {
    let fields = payload.validate()?;
    let tag = TagRepository::new(state.pool())
        .create(&fields)
        .await
        .map_err(conflict_to_bad_request)?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Update a tag.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<Tag>> {
    let fields = payload.validate()?;
    let tag = TagRepository::new(state.pool())
        .update(TagId::new(id), &fields)
        .await
        .map_err(conflict_to_bad_request)?;

    Ok(Json(tag))
}

/// Delete a tag and its product associations.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    TagRepository::new(state.pool())
        .delete(TagId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("tag {id}")),
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

fn conflict_to_bad_request(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
        RepositoryError::NotFound => AppError::NotFound("tag".to_string()),
        other => AppError::Database(other),
    }
}
