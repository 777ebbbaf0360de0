//! Catalog reconciliation engine.
//!
//! One run mirrors the Printful sync catalog into the local database:
//! page through the remote listing, delete local orphans (with a race-guard
//! re-check), upsert every remote product and its variants, verify the final
//! counts, and record everything in a sync log the admin UI can poll.
//!
//! # Failure semantics
//!
//! Per-item failures (one product or variant failing to upsert, a failed
//! auto-categorization) are recorded and the run continues. Only lease
//! acquisition, sync-log creation, and the top-level listing fetch are fatal.
//!
//! # Concurrency
//!
//! Runs are serialized by a `PostgreSQL` advisory lease keyed by the
//! operation name. Remote calls are intentionally sequential with small
//! fixed delays to respect Printful's rate limits; there is no parallel
//! fan-out and no mid-run cancellation.

pub mod categorize;
pub mod plan;

use std::collections::HashSet;
use std::future::Future;
use std::time::{Duration, Instant};

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument, warn};

use pressroom_core::{PrintfulId, ProductId, SyncLogId, SyncStatus};

use crate::db::products::ProductUpsert;
use crate::db::variants::VariantUpsert;
use crate::db::{
    CategoryRepository, ProductRepository, RepositoryError, SyncCounters, SyncLease,
    SyncLogRepository, VariantRepository,
};
use crate::models::ProductSummary;
use crate::printful::{PrintfulClient, PrintfulError, SyncProductDetail, SyncProductSummary};

/// Operation name recorded in sync logs and used as the advisory-lease key.
pub const OPERATION: &str = "catalog-sync";

/// Remote listing page size.
const PAGE_SIZE: i64 = 20;

/// Options controlling a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute and count every change without writing any of them.
    pub dry_run: bool,
    /// Delete orphans without re-checking the remote API first.
    pub force_delete: bool,
    /// Skip the final local-vs-remote count verification.
    pub skip_verification: bool,
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Another run already holds the advisory lease.
    #[error("a reconciliation run is already in progress")]
    AlreadyRunning,

    /// Database failure during initialization or bookkeeping.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Top-level remote listing fetch failed.
    #[error("remote catalog fetch failed: {0}")]
    Printful(#[from] PrintfulError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct SyncStats {
    pub status: SyncStatus,
    pub counters: SyncCounters,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration: Duration,
}

/// Mutable bookkeeping threaded through the run's phases.
struct RunState {
    log_id: SyncLogId,
    counters: SyncCounters,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// The remote catalog operations a reconciliation run needs.
///
/// [`PrintfulClient`] is the production implementation; tests drive the
/// engine with a scripted in-memory source instead.
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of the remote listing; empty means exhausted.
    fn list_sync_products(
        &self,
        offset: i64,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<SyncProductSummary>, PrintfulError>> + Send;

    /// Fetch full detail for one product.
    fn get_sync_product(
        &self,
        id: PrintfulId,
    ) -> impl Future<Output = Result<SyncProductDetail, PrintfulError>> + Send;

    /// Check whether a product still exists remotely.
    fn sync_product_exists(
        &self,
        id: PrintfulId,
    ) -> impl Future<Output = Result<bool, PrintfulError>> + Send;
}

impl CatalogSource for PrintfulClient {
    async fn list_sync_products(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SyncProductSummary>, PrintfulError> {
        Self::list_sync_products(self, offset, limit).await
    }

    async fn get_sync_product(&self, id: PrintfulId) -> Result<SyncProductDetail, PrintfulError> {
        Self::get_sync_product(self, id).await
    }

    async fn sync_product_exists(&self, id: PrintfulId) -> Result<bool, PrintfulError> {
        Self::sync_product_exists(self, id).await
    }
}

/// The reconciliation engine, generic over where the remote catalog comes
/// from.
pub struct SyncEngine<C> {
    pool: PgPool,
    catalog: C,
    options: SyncOptions,
    page_delay: Duration,
    product_delay: Duration,
}

impl<C: CatalogSource> SyncEngine<C> {
    /// Create an engine with the standard inter-call delays.
    #[must_use]
    pub fn new(pool: PgPool, catalog: C, options: SyncOptions) -> Self {
        Self {
            pool,
            catalog,
            options,
            page_delay: Duration::from_millis(500),
            product_delay: Duration::from_millis(150),
        }
    }

    /// Override the inter-call delays (tests zero them out).
    #[must_use]
    pub const fn with_delays(mut self, page_delay: Duration, product_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self.product_delay = product_delay;
        self
    }

    /// Run one full reconciliation pass, acquiring the lease first.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::AlreadyRunning` if the lease is held, or a fatal
    /// initialization/fetch error. Per-item failures do not surface here;
    /// they are recorded in the returned stats and the sync log.
    pub async fn run(&self) -> Result<SyncStats, SyncError> {
        let lease = SyncLease::try_acquire(&self.pool, OPERATION)
            .await?
            .ok_or(SyncError::AlreadyRunning)?;
        self.run_with_lease(lease).await
    }

    /// Run one pass under a lease the caller already holds.
    ///
    /// The HTTP trigger acquires the lease before answering 202 and hands it
    /// to the spawned run, so a racing second trigger is rejected up front
    /// rather than dying silently in the background. The lease is released
    /// when the run finishes, on the fatal path included.
    ///
    /// # Errors
    ///
    /// Returns a fatal initialization or listing-fetch error; per-item
    /// failures are recorded in the stats and the sync log instead.
    #[instrument(skip(self, lease), fields(dry_run = self.options.dry_run))]
    pub async fn run_with_lease(&self, lease: SyncLease) -> Result<SyncStats, SyncError> {
        let started = Instant::now();

        let logs = SyncLogRepository::new(&self.pool);
        let log = logs.create(OPERATION).await?;
        logs.set_running(log.id).await?;

        let mut state = RunState {
            log_id: log.id,
            counters: SyncCounters::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        let result = self.run_phases(&mut state).await;
        let stats = match result {
            Ok(()) => {
                let status = if state.errors.is_empty() {
                    SyncStatus::Success
                } else {
                    SyncStatus::Partial
                };
                self.finalize(&state, status).await?;
                SyncStats {
                    status,
                    counters: state.counters,
                    errors: state.errors,
                    warnings: state.warnings,
                    duration: started.elapsed(),
                }
            }
            Err(e) => {
                // Fatal: record the abort, release the lease, propagate.
                state.errors.push(format!("fatal: {e}"));
                self.finalize(&state, SyncStatus::Failed).await?;
                lease.release().await?;
                return Err(e);
            }
        };

        lease.release().await?;
        info!(
            status = %stats.status,
            products_created = stats.counters.products_created,
            products_updated = stats.counters.products_updated,
            products_deleted = stats.counters.products_deleted,
            errors = stats.errors.len(),
            warnings = stats.warnings.len(),
            duration_ms = stats.duration.as_millis() as u64,
            "reconciliation run finished"
        );
        Ok(stats)
    }

    async fn run_phases(&self, state: &mut RunState) -> Result<(), SyncError> {
        self.progress(state, "fetching remote catalog", 5).await?;
        let remote = self.fetch_remote_catalog().await?;
        let remote_ids: HashSet<PrintfulId> = remote.iter().map(|p| p.id).collect();

        self.progress(state, "loading local products", 20).await?;
        let local = ProductRepository::new(&self.pool).list_summaries().await?;

        self.progress(state, "deleting orphaned products", 25).await?;
        let deletions = plan::compute_deletions(&remote_ids, &local);
        self.delete_orphans(state, &deletions).await;

        self.progress(state, "upserting products", 40).await?;
        self.upsert_products(state, &remote).await;

        if !self.options.skip_verification && !self.options.dry_run {
            self.progress(state, "verifying counts", 95).await?;
            self.verify(state, &remote_ids).await?;
        }

        Ok(())
    }

    /// Page through the remote listing until an empty page is returned.
    async fn fetch_remote_catalog(&self) -> Result<Vec<SyncProductSummary>, SyncError> {
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.catalog.list_sync_products(offset, PAGE_SIZE).await?;
            if page.is_empty() {
                break;
            }
            offset += page.len() as i64;
            all.extend(page);
            tokio::time::sleep(self.page_delay).await;
        }

        info!(products = all.len(), "remote catalog fetched");
        Ok(all)
    }

    /// Delete local orphans, re-checking each against the remote API first
    /// unless `force_delete`.
    ///
    /// The re-check is a best-effort race mitigation, not a transaction:
    /// the remote catalog can still change between the check and the delete.
    async fn delete_orphans(&self, state: &mut RunState, deletions: &[ProductSummary]) {
        let products = ProductRepository::new(&self.pool);
        let variants = VariantRepository::new(&self.pool);

        for doomed in deletions {
            if self.options.dry_run {
                match variants.list_printful_ids(doomed.id).await {
                    Ok(ids) => {
                        state.counters.products_deleted += 1;
                        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                        {
                            state.counters.variants_deleted += ids.len() as i32;
                        }
                    }
                    Err(e) => state
                        .errors
                        .push(format!("dry-run variant count for {} failed: {e}", doomed.name)),
                }
                continue;
            }

            if !self.options.force_delete {
                match self.catalog.sync_product_exists(doomed.printful_id).await {
                    Ok(true) => {
                        state.warnings.push(format!(
                            "product {} ({}) reappeared remotely, skipping delete",
                            doomed.printful_id, doomed.name
                        ));
                        continue;
                    }
                    Ok(false) => {}
                    Err(e) => {
                        state.errors.push(format!(
                            "existence re-check for product {} ({}) failed: {e}",
                            doomed.printful_id, doomed.name
                        ));
                        continue;
                    }
                }
            }

            match products.delete(doomed.id).await {
                Ok(cascaded) => {
                    state.counters.products_deleted += 1;
                    state.counters.variants_deleted += cascaded as i32;
                    info!(printful_id = %doomed.printful_id, name = %doomed.name, "orphan deleted");
                }
                Err(e) => state.errors.push(format!(
                    "deleting product {} ({}) failed: {e}",
                    doomed.printful_id, doomed.name
                )),
            }
        }
    }

    /// Upsert every remote product in listing order. Per-item failures are
    /// recorded and skipped.
    async fn upsert_products(&self, state: &mut RunState, remote: &[SyncProductSummary]) {
        let total = remote.len();

        for (index, summary) in remote.iter().enumerate() {
            if let Err(e) = self.upsert_one(state, summary).await {
                state
                    .errors
                    .push(format!("product {} ({}): {e}", summary.id, summary.name));
                warn!(printful_id = %summary.id, error = %e, "product upsert failed, continuing");
            }
            state.counters.products_processed += 1;

            // 40..90 across the upsert loop
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let percent = 40 + (((index + 1) * 50) / total.max(1)) as i32;
            let step = format!("upserting products ({}/{total})", index + 1);
            if let Err(e) = self.progress(state, &step, percent).await {
                warn!(error = %e, "progress update failed");
            }

            if index + 1 < total {
                tokio::time::sleep(self.product_delay).await;
            }
        }
    }

    /// Upsert one product and its variants, auto-categorizing on first sight.
    async fn upsert_one(
        &self,
        state: &mut RunState,
        summary: &SyncProductSummary,
    ) -> Result<(), SyncError> {
        let detail = self.catalog.get_sync_product(summary.id).await?;
        let products = ProductRepository::new(&self.pool);
        let variants = VariantRepository::new(&self.pool);

        let existing = products.get_by_printful_id(detail.sync_product.id).await?;
        let is_new = existing.is_none();

        let remote_variant_ids: Vec<PrintfulId> =
            detail.sync_variants.iter().map(|v| v.id).collect();
        let known_variant_ids: HashSet<PrintfulId> = match &existing {
            Some(product) => variants.list_printful_ids(product.id).await?.into_iter().collect(),
            None => HashSet::new(),
        };

        if self.options.dry_run {
            if is_new {
                state.counters.products_created += 1;
            } else {
                state.counters.products_updated += 1;
            }
            for variant in &detail.sync_variants {
                if known_variant_ids.contains(&variant.id) {
                    state.counters.variants_updated += 1;
                } else {
                    state.counters.variants_created += 1;
                }
            }
            state.counters.variants_deleted += known_variant_ids
                .iter()
                .filter(|id| !remote_variant_ids.contains(*id))
                .count() as i32;
            return Ok(());
        }

        let product = products
            .upsert(&ProductUpsert {
                printful_id: detail.sync_product.id,
                external_id: detail.sync_product.external_id.clone(),
                name: detail.sync_product.name.clone(),
                thumbnail_url: detail.sync_product.thumbnail_url.clone(),
                description: detail.sync_product.description.clone(),
            })
            .await?;

        if is_new {
            state.counters.products_created += 1;
        } else {
            state.counters.products_updated += 1;
        }

        for variant in &detail.sync_variants {
            let (color, size) = variant.color_and_size();
            let result = variants
                .upsert(
                    product.id,
                    &VariantUpsert {
                        printful_id: variant.id,
                        external_id: variant.external_id.clone(),
                        name: variant.name.clone(),
                        color,
                        size,
                        retail_price: variant.retail_price,
                        currency: variant.currency.clone(),
                        files: variant.files.clone(),
                        options: variant.options.clone(),
                    },
                )
                .await;

            match result {
                Ok(_) if known_variant_ids.contains(&variant.id) => {
                    state.counters.variants_updated += 1;
                }
                Ok(_) => state.counters.variants_created += 1,
                Err(e) => state.errors.push(format!(
                    "variant {} of product {}: {e}",
                    variant.id, detail.sync_product.id
                )),
            }
        }

        let removed = variants.delete_missing(product.id, &remote_variant_ids).await?;
        state.counters.variants_deleted += removed as i32;

        if is_new {
            self.auto_categorize(state, &product.name, product.id).await;
        }

        Ok(())
    }

    /// Best-effort categorization of a first-seen product; failures become
    /// warnings, never errors.
    async fn auto_categorize(
        &self,
        state: &mut RunState,
        name: &str,
        product_id: ProductId,
    ) {
        let Some(slug) = categorize::categorize(name) else {
            state
                .warnings
                .push(format!("no category rule matched new product '{name}'"));
            return;
        };

        let categories = CategoryRepository::new(&self.pool);
        let assignment = match categories.get_by_slug(slug).await {
            Ok(Some(category)) => {
                ProductRepository::new(&self.pool)
                    .set_category(product_id, Some(category.id))
                    .await
            }
            Ok(None) => {
                state.warnings.push(format!(
                    "category '{slug}' for new product '{name}' does not exist"
                ));
                return;
            }
            Err(e) => Err(e),
        };

        if let Err(e) = assignment {
            state
                .warnings
                .push(format!("auto-categorization of '{name}' failed: {e}"));
        }
    }

    /// Recount local products against the remote set; mismatches are
    /// warnings with the exact missing/extra IDs, never fatal.
    async fn verify(
        &self,
        state: &mut RunState,
        remote_ids: &HashSet<PrintfulId>,
    ) -> Result<(), SyncError> {
        let products = ProductRepository::new(&self.pool);
        let count = products.count().await?;

        #[allow(clippy::cast_possible_wrap)]
        let remote_count = remote_ids.len() as i64;
        if count == remote_count {
            return Ok(());
        }

        let local_ids: HashSet<PrintfulId> = products
            .list_summaries()
            .await?
            .into_iter()
            .map(|p| p.printful_id)
            .collect();
        let diff = plan::verify_mirror(remote_ids, &local_ids);

        state.warnings.push(format!(
            "count mismatch after sync: local {count}, remote {remote_count} (missing: {:?}, extra: {:?})",
            diff.missing, diff.extra
        ));
        Ok(())
    }

    async fn progress(
        &self,
        state: &mut RunState,
        step: &str,
        percent: i32,
    ) -> Result<(), RepositoryError> {
        SyncLogRepository::new(&self.pool)
            .update_progress(state.log_id, step, percent, &state.counters)
            .await
    }

    async fn finalize(&self, state: &RunState, status: SyncStatus) -> Result<(), RepositoryError> {
        SyncLogRepository::new(&self.pool)
            .finalize(
                state.log_id,
                status,
                &state.counters,
                &state.errors,
                &state.warnings,
            )
            .await
    }
}
