//! Admin category CRUD endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::instrument;

use pressroom_core::CategoryId;

use crate::db::RepositoryError;
use crate::db::categories::{CategoryRepository, CategoryUpsert};
use crate::error::{AppError, Result};
use crate::models::Category;
use crate::state::AppState;

/// Query parameters for the category listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    /// Only active categories (storefront reads pass this).
    pub active: bool,
}

/// Payload for creating or updating a category.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

const fn default_active() -> bool {
    true
}

impl CategoryPayload {
    fn validate(&self) -> Result<CategoryUpsert> {
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

        Ok(CategoryUpsert {
            name: self.name.trim().to_string(),
            slug: self.slug.clone(),
            color: self.color.clone(),
            active: self.active,
            sort_order: self.sort_order,
        })
    }
}

/// List categories.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Category>>> {
    let categories = CategoryRepository::new(state.pool())
        .list(query.active)
        .await
        .map_err(AppError::Database)?;

    Ok(Json(categories))
}

/// Create a category.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<Category>)> {
    let fields = payload.validate()?;
    let category = CategoryRepository::new(state.pool())
        .create(&fields)
        .await
        .map_err(conflict_to_bad_request)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<Category>> {
    let fields = payload.validate()?;
    let category = CategoryRepository::new(state.pool())
        .update(CategoryId::new(id), &fields)
        .await
        .map_err(conflict_to_bad_request)?;

    Ok(Json(category))
}

/// Delete a category. Products in it keep existing, uncategorized.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("category {id}")),
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Slug conflicts and missing rows are client errors, not server errors.
fn conflict_to_bad_request(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::Conflict(msg) => AppError::BadRequest(msg),
        RepositoryError::NotFound => AppError::NotFound("category".to_string()),
        other => AppError::Database(other),
    }
}
