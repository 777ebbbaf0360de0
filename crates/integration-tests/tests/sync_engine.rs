//! Reconciliation engine runs against a scripted catalog source.
//!
//! These drive the real engine (sync log, lease, repositories) with an
//! in-memory remote catalog instead of Printful, so dry-run semantics, the
//! delete race-guard, partial finalization, and lease exclusion are covered
//! without API credentials. They still require:
//! - A running `PostgreSQL` database with migrations applied (pressroom migrate)
//! - `PRESSROOM_DATABASE_URL` (or `DATABASE_URL`) in the environment
//!
//! Run with: cargo test -p pressroom-integration-tests -- --ignored
//!
//! The scripted source answers "still exists" for every product it was not
//! told is gone, so orphan deletion never touches rows other tests created
//! in a shared development database.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rust_decimal::Decimal;

use pressroom_core::{PrintfulId, SyncStatus};
use pressroom_server::config;
use pressroom_server::db::{self, ProductRepository, SyncLease};
use pressroom_server::printful::{
    PrintfulError, SyncProduct, SyncProductDetail, SyncProductSummary, SyncVariant,
};
use pressroom_server::sync::{CatalogSource, OPERATION, SyncEngine, SyncError, SyncOptions};

/// A remote catalog with pre-scripted listings, details, and failures.
#[derive(Default, Clone)]
struct ScriptedCatalog {
    listing: Vec<SyncProductSummary>,
    details: HashMap<i64, SyncProductDetail>,
    /// Products the existence re-check reports as deleted remotely.
    gone: HashSet<i64>,
    /// Products whose detail fetch fails with a server error.
    broken_details: HashSet<i64>,
}

impl CatalogSource for ScriptedCatalog {
    async fn list_sync_products(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SyncProductSummary>, PrintfulError> {
        let start = usize::try_from(offset).unwrap_or(0).min(self.listing.len());
        let end = usize::try_from(offset + limit)
            .unwrap_or(0)
            .min(self.listing.len());
        Ok(self.listing[start..end].to_vec())
    }

    async fn get_sync_product(&self, id: PrintfulId) -> Result<SyncProductDetail, PrintfulError> {
        if self.broken_details.contains(&id.as_i64()) {
            return Err(PrintfulError::Api {
                status: 500,
                reason: "Internal Server Error".to_string(),
                message: "scripted detail failure".to_string(),
            });
        }
        self.details
            .get(&id.as_i64())
            .cloned()
            .ok_or_else(|| PrintfulError::NotFound(format!("sync product {id}")))
    }

    async fn sync_product_exists(&self, id: PrintfulId) -> Result<bool, PrintfulError> {
        Ok(!self.gone.contains(&id.as_i64()))
    }
}

fn summary(id: i64, name: &str) -> SyncProductSummary {
    SyncProductSummary {
        id: PrintfulId::new(id),
        external_id: None,
        name: name.to_string(),
        variants: 1,
        thumbnail_url: None,
    }
}

fn detail(id: i64, name: &str, variant_id: i64) -> SyncProductDetail {
    SyncProductDetail {
        sync_product: SyncProduct {
            id: PrintfulId::new(id),
            external_id: None,
            name: name.to_string(),
            thumbnail_url: None,
            description: None,
        },
        sync_variants: vec![SyncVariant {
            id: PrintfulId::new(variant_id),
            external_id: Some(format!("scenario-sku-{variant_id}")),
            sync_product_id: Some(PrintfulId::new(id)),
            name: format!("{name} - Black / M"),
            retail_price: Some(Decimal::new(2400, 2)),
            currency: Some("USD".to_string()),
            size: None,
            color: None,
            files: serde_json::json!([]),
            options: serde_json::json!([]),
        }],
    }
}

fn engine(
    pool: &sqlx::PgPool,
    catalog: ScriptedCatalog,
    options: SyncOptions,
) -> SyncEngine<ScriptedCatalog> {
    SyncEngine::new(pool.clone(), catalog, options).with_delays(Duration::ZERO, Duration::ZERO)
}

/// One sequential scenario: the phases share the advisory lease and the
/// scripted product rows, so they cannot run as separate parallel tests.
#[tokio::test]
#[ignore = "Requires migrated database"]
async fn test_engine_full_cycle_with_scripted_catalog() {
    let database_url = config::database_url_from_env().expect("database URL in environment");
    let pool = db::create_pool(&database_url).await.expect("connect");
    let products = ProductRepository::new(&pool);

    #[allow(clippy::cast_possible_truncation)]
    let base = (SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos()
        % i128::from(i64::MAX) as u128) as i64;
    let (tee, mug) = (base, base + 1);

    let mut catalog = ScriptedCatalog {
        listing: vec![summary(tee, "Scenario Logo Tee"), summary(mug, "Scenario Camp Mug")],
        ..ScriptedCatalog::default()
    };
    catalog
        .details
        .insert(tee, detail(tee, "Scenario Logo Tee", base + 10));
    catalog
        .details
        .insert(mug, detail(mug, "Scenario Camp Mug", base + 11));

    // Dry run: counters are populated, nothing lands in the database.
    let dry = engine(
        &pool,
        catalog.clone(),
        SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        },
    )
    .run()
    .await
    .expect("dry run");
    assert_eq!(dry.status, SyncStatus::Success);
    assert_eq!(dry.counters.products_created, 2);
    assert_eq!(dry.counters.variants_created, 2);
    assert!(
        products
            .get_by_printful_id(PrintfulId::new(tee))
            .await
            .expect("lookup")
            .is_none(),
        "dry run must not write products"
    );

    // First real run creates both products.
    let first = engine(&pool, catalog.clone(), SyncOptions::default())
        .run()
        .await
        .expect("first run");
    assert_eq!(first.status, SyncStatus::Success);
    assert_eq!(first.counters.products_created, 2);
    assert_eq!(first.counters.products_updated, 0);
    let tee_row = products
        .get_by_printful_id(PrintfulId::new(tee))
        .await
        .expect("lookup")
        .expect("tee exists after run");

    // Second run over the same catalog only updates.
    let second = engine(&pool, catalog.clone(), SyncOptions::default())
        .run()
        .await
        .expect("second run");
    assert_eq!(second.status, SyncStatus::Success);
    assert_eq!(second.counters.products_created, 0);
    assert_eq!(second.counters.products_updated, 2);
    assert_eq!(
        products
            .get_by_printful_id(PrintfulId::new(tee))
            .await
            .expect("lookup")
            .expect("still present")
            .id,
        tee_row.id,
        "re-running must not create a second row"
    );

    // The tee drops out of the listing but the re-check says it is back:
    // the race-guard keeps it and records a warning.
    let mut reappeared = catalog.clone();
    reappeared.listing.retain(|p| p.id.as_i64() != tee);
    let guarded = engine(&pool, reappeared, SyncOptions::default())
        .run()
        .await
        .expect("guarded run");
    assert_eq!(guarded.status, SyncStatus::Success);
    assert!(guarded.warnings.iter().any(|w| w.contains("reappeared")));
    assert!(
        products
            .get_by_printful_id(PrintfulId::new(tee))
            .await
            .expect("lookup")
            .is_some(),
        "race-guard must keep the product"
    );

    // Now the tee is confirmed gone and the mug's detail fetch breaks:
    // the orphan is deleted, the failure is recorded, and the run
    // finalizes as partial instead of aborting.
    let mut degraded = catalog.clone();
    degraded.listing.retain(|p| p.id.as_i64() != tee);
    degraded.gone.insert(tee);
    degraded.broken_details.insert(mug);
    let partial = engine(&pool, degraded, SyncOptions::default())
        .run()
        .await
        .expect("degraded run completes");
    assert_eq!(partial.status, SyncStatus::Partial);
    assert_eq!(partial.counters.products_deleted, 1);
    assert_eq!(partial.errors.len(), 1);
    assert!(
        products
            .get_by_printful_id(PrintfulId::new(tee))
            .await
            .expect("lookup")
            .is_none(),
        "confirmed orphan must be deleted"
    );

    // While a lease is held, a competing run is rejected up front; the run
    // that receives the lease completes and releases it.
    let lease = SyncLease::try_acquire(&pool, OPERATION)
        .await
        .expect("acquire")
        .expect("lease free");
    let contender = engine(&pool, catalog.clone(), SyncOptions::default());
    assert!(matches!(
        contender.run().await,
        Err(SyncError::AlreadyRunning)
    ));
    let handed = contender
        .run_with_lease(lease)
        .await
        .expect("run with handed lease");
    assert_eq!(handed.status, SyncStatus::Success);
    let reacquired = SyncLease::try_acquire(&pool, OPERATION)
        .await
        .expect("acquire")
        .expect("lease released after run");
    reacquired.release().await.expect("release");

    // Cleanup: the last run recreated the tee, so look both rows up fresh.
    for printful_id in [tee, mug] {
        if let Some(row) = products
            .get_by_printful_id(PrintfulId::new(printful_id))
            .await
            .expect("lookup")
        {
            products.delete(row.id).await.expect("cleanup delete");
        }
    }
}
