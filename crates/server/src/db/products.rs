//! Product repository for database operations.

use sqlx::PgPool;

use pressroom_core::{CategoryId, PrintfulId, ProductId};

use super::RepositoryError;
use crate::models::{Product, ProductSummary};

/// Fields for inserting or updating a product from the remote catalog.
#[derive(Debug, Clone)]
pub struct ProductUpsert {
    pub printful_id: PrintfulId,
    pub external_id: Option<String>,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List storefront-visible products, newest first, optionally filtered
    /// by category.
    ///
    /// Products in inactive categories are hidden; uncategorized products
    /// are always listed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = match category {
            Some(category_id) => {
                sqlx::query_as::<_, Product>(
                    r"
                    SELECT p.id, p.printful_id, p.external_id, p.name, p.thumbnail_url,
                           p.description, p.category_id, p.created_at, p.updated_at
                    FROM products p
                    JOIN categories c ON c.id = p.category_id
                    WHERE p.category_id = $1 AND c.active
                    ORDER BY p.created_at DESC
                    ",
                )
                .bind(category_id)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Product>(
                    r"
                    SELECT p.id, p.printful_id, p.external_id, p.name, p.thumbnail_url,
                           p.description, p.category_id, p.created_at, p.updated_at
                    FROM products p
                    LEFT JOIN categories c ON c.id = p.category_id
                    WHERE p.category_id IS NULL OR c.active
                    ORDER BY p.created_at DESC
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(products)
    }

    /// List lightweight summaries of every local product, for diffing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_summaries(&self) -> Result<Vec<ProductSummary>, RepositoryError> {
        let summaries = sqlx::query_as::<_, ProductSummary>(
            "SELECT id, printful_id, name FROM products ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(summaries)
    }

    /// Get a product by its local ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, printful_id, external_id, name, thumbnail_url,
                   description, category_id, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by its Printful sync product ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_printful_id(
        &self,
        printful_id: PrintfulId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, printful_id, external_id, name, thumbnail_url,
                   description, category_id, created_at, updated_at
            FROM products
            WHERE printful_id = $1
            ",
        )
        .bind(printful_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert or update a product keyed on its Printful ID.
    ///
    /// The category assignment is left untouched on update so that manual
    /// admin categorization survives subsequent sync runs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(&self, fields: &ProductUpsert) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products (printful_id, external_id, name, thumbnail_url, description)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (printful_id) DO UPDATE SET
                external_id = EXCLUDED.external_id,
                name = EXCLUDED.name,
                thumbnail_url = EXCLUDED.thumbnail_url,
                description = EXCLUDED.description,
                updated_at = now()
            RETURNING id, printful_id, external_id, name, thumbnail_url,
                      description, category_id, created_at, updated_at
            ",
        )
        .bind(fields.printful_id)
        .bind(fields.external_id.as_deref())
        .bind(&fields.name)
        .bind(fields.thumbnail_url.as_deref())
        .bind(fields.description.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Assign a product to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn set_category(
        &self,
        id: ProductId,
        category_id: Option<CategoryId>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET category_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(category_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product. Variants cascade via the foreign key.
    ///
    /// Returns the number of variants that were cascade-deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<u64, RepositoryError> {
        let variant_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM variants WHERE product_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        #[allow(clippy::cast_sign_loss)] // COUNT(*) is never negative
        Ok(variant_count as u64)
    }

    /// Count all local products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
