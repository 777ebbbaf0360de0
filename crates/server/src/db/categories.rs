//! Category repository for database operations.

use sqlx::PgPool;

use pressroom_core::CategoryId;

use super::{RepositoryError, map_constraint};
use crate::models::Category;

/// Fields for creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryUpsert {
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub active: bool,
    pub sort_order: i32,
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories in sort order. `active_only` hides inactive ones
    /// (storefront reads); the admin API lists everything.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Category>, RepositoryError> {
        let categories = if active_only {
            sqlx::query_as::<_, Category>(
                r"
                SELECT id, name, slug, color, active, sort_order, created_at, updated_at
                FROM categories
                WHERE active
                ORDER BY sort_order, name
                ",
            )
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Category>(
                r"
                SELECT id, name, slug, color, active, sort_order, created_at, updated_at
                FROM categories
                ORDER BY sort_order, name
                ",
            )
            .fetch_all(self.pool)
            .await?
        };

        Ok(categories)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, color, active, sort_order, created_at, updated_at
            FROM categories
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Get a category by its unique slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, color, active, sort_order, created_at, updated_at
            FROM categories
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Create a new category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    pub async fn create(&self, fields: &CategoryUpsert) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (name, slug, color, active, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, slug, color, active, sort_order, created_at, updated_at
            ",
        )
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(fields.color.as_deref())
        .bind(fields.active)
        .bind(fields.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "category slug already exists"))?;

        Ok(category)
    }

    /// Update an existing category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist,
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(
        &self,
        id: CategoryId,
        fields: &CategoryUpsert,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            UPDATE categories
            SET name = $2, slug = $3, color = $4, active = $5, sort_order = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, slug, color, active, sort_order, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(fields.color.as_deref())
        .bind(fields.active)
        .bind(fields.sort_order)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint(e, "category slug already exists"))?;

        category.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Products keep existing with `category_id` nulled.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category does not exist.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Insert the default category set if it is not already present.
    ///
    /// Used by `pressroom-cli categories seed` on fresh databases.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn seed_defaults(&self) -> Result<u64, RepositoryError> {
        let mut inserted = 0;
        for (i, (name, slug)) in DEFAULT_CATEGORIES.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let sort_order = i as i32;
            let result = sqlx::query(
                r"
                INSERT INTO categories (name, slug, sort_order)
                VALUES ($1, $2, $3)
                ON CONFLICT (slug) DO NOTHING
                ",
            )
            .bind(name)
            .bind(slug)
            .bind(sort_order)
            .execute(self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }
}

/// Default categories seeded on a fresh install, matched by the sync
/// engine's auto-categorization rules.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("T-Shirts", "t-shirts"),
    ("Hoodies & Sweatshirts", "hoodies"),
    ("Hats", "hats"),
    ("Mugs", "mugs"),
    ("Posters & Prints", "posters"),
    ("Stickers", "stickers"),
    ("Tote Bags", "totes"),
];
