//! Run-level mutual exclusion via `PostgreSQL` advisory locks.
//!
//! At most one reconciliation run per operation name may be active at a time.
//! The lease is a session-scoped advisory lock held on a dedicated connection
//! for the duration of the run; if the process dies, the server releases the
//! lock when the backend session ends.

use sqlx::postgres::PgConnection;
use sqlx::{Connection, PgPool};

use super::RepositoryError;

/// An advisory lease on an operation name.
///
/// Holds its own connection (detached from the pool) so that the session
/// lives exactly as long as the lease. Call [`SyncLease::release`] when the
/// run finishes; dropping the lease also closes the connection, which makes
/// the server release the lock.
pub struct SyncLease {
    conn: Option<PgConnection>,
    key: i64,
}

impl SyncLease {
    /// Try to acquire the lease for an operation name.
    ///
    /// Returns `Ok(None)` if another session already holds it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the connection or query fails.
    pub async fn try_acquire(pool: &PgPool, operation: &str) -> Result<Option<Self>, RepositoryError> {
        let key = lease_key(operation);

        let mut conn = pool.acquire().await?.detach();
        let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(key)
            .fetch_one(&mut conn)
            .await?;

        if acquired {
            Ok(Some(Self {
                conn: Some(conn),
                key,
            }))
        } else {
            // Not our lock; close the session promptly.
            let _ = conn.close().await;
            Ok(None)
        }
    }

    /// Release the lease and close its connection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the unlock query fails. The
    /// connection is closed either way.
    pub async fn release(mut self) -> Result<(), RepositoryError> {
        if let Some(mut conn) = self.conn.take() {
            let result = sqlx::query("SELECT pg_advisory_unlock($1)")
                .bind(self.key)
                .execute(&mut conn)
                .await;
            let _ = conn.close().await;
            result?;
        }
        Ok(())
    }
}

/// Stable 64-bit key for an operation name (FNV-1a).
///
/// Advisory lock keys are signed 64-bit integers; the wrap from u64 is
/// intentional and stable.
#[must_use]
pub fn lease_key(operation: &str) -> i64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in operation.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    #[allow(clippy::cast_possible_wrap)]
    {
        hash as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_key_stable() {
        // The key must never change between releases, or a rolling deploy
        // could run two syncs concurrently.
        assert_eq!(lease_key("catalog-sync"), lease_key("catalog-sync"));
        assert_ne!(lease_key("catalog-sync"), lease_key("other-op"));
    }

    #[test]
    fn test_lease_key_empty() {
        #[allow(clippy::cast_possible_wrap)]
        let expected = 0xcbf2_9ce4_8422_2325_u64 as i64;
        assert_eq!(lease_key(""), expected);
    }
}
