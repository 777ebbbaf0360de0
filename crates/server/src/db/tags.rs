//! Tag repository for database operations.

use sqlx::PgPool;

use pressroom_core::{ProductId, TagId};

use super::{RepositoryError, map_constraint};
use crate::models::Tag;

/// Fields for creating or updating a tag.
#[derive(Debug, Clone)]
pub struct TagUpsert {
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
}

/// Repository for tag database operations.
pub struct TagRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepository<'a> {
    /// Create a new tag repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all tags, most used first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            r"
            SELECT id, name, slug, color, usage_count, created_at, updated_at
            FROM tags
            ORDER BY usage_count DESC, name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Get a tag by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: TagId) -> Result<Option<Tag>, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            r"
            SELECT id, name, slug, color, usage_count, created_at, updated_at
            FROM tags
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(tag)
    }

    /// Create a new tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug already exists.
    pub async fn create(&self, fields: &TagUpsert) -> Result<Tag, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            r"
            INSERT INTO tags (name, slug, color)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, color, usage_count, created_at, updated_at
            ",
        )
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(fields.color.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "tag slug already exists"))?;

        Ok(tag)
    }

    /// Update an existing tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the tag does not exist,
    /// `RepositoryError::Conflict` if the new slug is taken.
    pub async fn update(&self, id: TagId, fields: &TagUpsert) -> Result<Tag, RepositoryError> {
        let tag = sqlx::query_as::<_, Tag>(
            r"
            UPDATE tags
            SET name = $2, slug = $3, color = $4, updated_at = now()
            WHERE id = $1
            RETURNING id, name, slug, color, usage_count, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(fields.color.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_constraint(e, "tag slug already exists"))?;

        tag.ok_or(RepositoryError::NotFound)
    }

    /// Delete a tag and its product associations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the tag does not exist.
    pub async fn delete(&self, id: TagId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List the tags attached to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            r"
            SELECT t.id, t.name, t.slug, t.color, t.usage_count, t.created_at, t.updated_at
            FROM tags t
            JOIN product_tags pt ON pt.tag_id = t.id
            WHERE pt.product_id = $1
            ORDER BY t.name
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Attach a tag to a product (idempotent) and refresh its usage count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn attach(&self, product_id: ProductId, tag_id: TagId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_tags (product_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(product_id)
        .bind(tag_id)
        .execute(self.pool)
        .await?;

        self.refresh_usage_count(tag_id).await
    }

    /// Detach a tag from a product and refresh its usage count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn detach(&self, product_id: ProductId, tag_id: TagId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM product_tags WHERE product_id = $1 AND tag_id = $2")
            .bind(product_id)
            .bind(tag_id)
            .execute(self.pool)
            .await?;

        self.refresh_usage_count(tag_id).await
    }

    /// Recompute `usage_count` from the join table.
    async fn refresh_usage_count(&self, tag_id: TagId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE tags
            SET usage_count = (SELECT COUNT(*) FROM product_tags WHERE tag_id = $1),
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(tag_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
