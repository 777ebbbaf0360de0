//! Storefront catalog read endpoints.

use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pressroom_core::{CategoryId, ProductId, TagId};

use crate::db::{CategoryRepository, ProductRepository, RepositoryError, TagRepository, VariantRepository};
use crate::error::{AppError, Result};
use crate::models::{Product, Tag, Variant};
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Restrict to one category.
    pub category: Option<i32>,
}

/// Product detail response: the product row plus its variants and tags.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<Variant>,
    pub tags: Vec<Tag>,
}

/// Payload for assigning a product to a category.
#[derive(Debug, Deserialize)]
pub struct CategoryAssignment {
    /// `null` clears the assignment.
    pub category_id: Option<i32>,
}

/// Payload for replacing a product's tag set.
#[derive(Debug, Deserialize)]
pub struct TagAssignment {
    pub tag_ids: Vec<i32>,
}

/// List products, optionally filtered by category.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category.map(CategoryId::new))
        .await
        .map_err(AppError::Database)?;

    Ok(Json(products))
}

/// Product detail with variants.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetail>> {
    let id = ProductId::new(id);
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let variants = VariantRepository::new(state.pool())
        .list_for_product(id)
        .await
        .map_err(AppError::Database)?;
    let tags = TagRepository::new(state.pool())
        .list_for_product(id)
        .await
        .map_err(AppError::Database)?;

    Ok(Json(ProductDetail {
        product,
        variants,
        tags,
    }))
}

/// Assign a product to a category (or clear the assignment).
///
/// Manual assignments survive sync runs; the engine never overwrites an
/// existing category.
#[instrument(skip(state, payload))]
pub async fn set_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryAssignment>,
) -> Result<StatusCode> {
    let category_id = match payload.category_id {
        Some(raw) => {
            let category_id = CategoryId::new(raw);
            CategoryRepository::new(state.pool())
                .get(category_id)
                .await
                .map_err(AppError::Database)?
                .ok_or_else(|| AppError::BadRequest(format!("category {raw} does not exist")))?;
            Some(category_id)
        }
        None => None,
    };

    ProductRepository::new(state.pool())
        .set_category(ProductId::new(id), category_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("product {id}")),
            other => AppError::Database(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Replace a product's tag set.
#[instrument(skip(state, payload))]
pub async fn set_tags(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TagAssignment>,
) -> Result<Json<Vec<Tag>>> {
    let product_id = ProductId::new(id);
    let tags = TagRepository::new(state.pool());

    let product = ProductRepository::new(state.pool())
        .get(product_id)
        .await
        .map_err(AppError::Database)?;
    if product.is_none() {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    for raw in &payload.tag_ids {
        if tags
            .get(TagId::new(*raw))
            .await
            .map_err(AppError::Database)?
            .is_none()
        {
            return Err(AppError::BadRequest(format!("tag {raw} does not exist")));
        }
    }

    let wanted: HashSet<TagId> = payload.tag_ids.iter().copied().map(TagId::new).collect();
    let current: HashSet<TagId> = tags
        .list_for_product(product_id)
        .await
        .map_err(AppError::Database)?
        .into_iter()
        .map(|t| t.id)
        .collect();

    for tag_id in current.difference(&wanted) {
        tags.detach(product_id, *tag_id)
            .await
            .map_err(AppError::Database)?;
    }
    for tag_id in wanted.difference(&current) {
        tags.attach(product_id, *tag_id)
            .await
            .map_err(AppError::Database)?;
    }

    let updated = tags
        .list_for_product(product_id)
        .await
        .map_err(AppError::Database)?;
    Ok(Json(updated))
}
