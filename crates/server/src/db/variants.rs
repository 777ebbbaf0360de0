//! Variant repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use pressroom_core::{PrintfulId, ProductId};

use super::RepositoryError;
use crate::models::Variant;

/// Fields for inserting or updating a variant from the remote catalog.
#[derive(Debug, Clone)]
pub struct VariantUpsert {
    pub printful_id: PrintfulId,
    pub external_id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub retail_price: Option<Decimal>,
    pub currency: Option<String>,
    pub files: serde_json::Value,
    pub options: serde_json::Value,
}

/// Repository for variant database operations.
pub struct VariantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VariantRepository<'a> {
    /// Create a new variant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all variants of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Variant>, RepositoryError> {
        let variants = sqlx::query_as::<_, Variant>(
            r"
            SELECT id, product_id, printful_id, external_id, name, color, size,
                   retail_price, currency, files, options, created_at, updated_at
            FROM variants
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// List the Printful IDs of a product's variants, for diffing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_printful_ids(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<PrintfulId>, RepositoryError> {
        let ids: Vec<PrintfulId> =
            sqlx::query_scalar("SELECT printful_id FROM variants WHERE product_id = $1")
                .bind(product_id)
                .fetch_all(self.pool)
                .await?;

        Ok(ids)
    }

    /// Insert or update a variant keyed on `(product_id, printful_id)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert(
        &self,
        product_id: ProductId,
        fields: &VariantUpsert,
    ) -> Result<Variant, RepositoryError> {
        let variant = sqlx::query_as::<_, Variant>(
            r"
            INSERT INTO variants (product_id, printful_id, external_id, name, color,
                                  size, retail_price, currency, files, options)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (product_id, printful_id) DO UPDATE SET
                external_id = EXCLUDED.external_id,
                name = EXCLUDED.name,
                color = EXCLUDED.color,
                size = EXCLUDED.size,
                retail_price = EXCLUDED.retail_price,
                currency = EXCLUDED.currency,
                files = EXCLUDED.files,
                options = EXCLUDED.options,
                updated_at = now()
            RETURNING id, product_id, printful_id, external_id, name, color, size,
                      retail_price, currency, files, options, created_at, updated_at
            ",
        )
        .bind(product_id)
        .bind(fields.printful_id)
        .bind(fields.external_id.as_deref())
        .bind(&fields.name)
        .bind(fields.color.as_deref())
        .bind(fields.size.as_deref())
        .bind(fields.retail_price)
        .bind(fields.currency.as_deref())
        .bind(Json(&fields.files))
        .bind(Json(&fields.options))
        .fetch_one(self.pool)
        .await?;

        Ok(variant)
    }

    /// Delete variants of a product whose Printful ID is not in `keep`.
    ///
    /// The remote product detail is authoritative for the variant set, so
    /// variants dropped remotely are removed on the next sync.
    ///
    /// Returns the number of variants deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_missing(
        &self,
        product_id: ProductId,
        keep: &[PrintfulId],
    ) -> Result<u64, RepositoryError> {
        let keep_raw: Vec<i64> = keep.iter().map(|id| id.as_i64()).collect();

        let result = sqlx::query(
            "DELETE FROM variants WHERE product_id = $1 AND printful_id <> ALL($2)",
        )
        .bind(product_id)
        .bind(&keep_raw)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
