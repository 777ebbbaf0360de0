//! Sync run status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle status of a reconciliation run.
///
/// A run moves `Queued` → `Running` → one of the terminal states. Once a run
/// reaches a terminal state its sync log row is never mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Run created but not yet started.
    #[default]
    Queued,
    /// Run in progress; `progress` and `current_step` are being updated.
    Running,
    /// Run completed with zero recorded errors.
    Success,
    /// Run completed but recorded per-item errors.
    Partial,
    /// Run aborted on a fatal initialization or fetch error.
    Failed,
}

/// Error parsing a status string from the database.
#[derive(Debug, Error)]
#[error("unknown sync status: {0}")]
pub struct ParseSyncStatusError(String);

impl SyncStatus {
    /// Whether this status is terminal (the run is over).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Partial | Self::Failed)
    }

    /// Stable string form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Success => "success",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl core::str::FromStr for SyncStatus {
    type Err = ParseSyncStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "partial" => Ok(Self::Partial),
            "failed" => Ok(Self::Failed),
            other => Err(ParseSyncStatusError(other.to_string())),
        }
    }
}

impl core::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored as TEXT; delegate to the string impls rather than a custom PG type.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for SyncStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SyncStatus {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> core::result::Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for SyncStatus {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> std::result::Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SyncStatus::Queued.is_terminal());
        assert!(!SyncStatus::Running.is_terminal());
        assert!(SyncStatus::Success.is_terminal());
        assert!(SyncStatus::Partial.is_terminal());
        assert!(SyncStatus::Failed.is_terminal());
    }

    #[test]
    fn test_parse_roundtrip() {
        for status in [
            SyncStatus::Queued,
            SyncStatus::Running,
            SyncStatus::Success,
            SyncStatus::Partial,
            SyncStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<SyncStatus>().expect("parse"), status);
        }
        assert!("bogus".parse::<SyncStatus>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&SyncStatus::Partial).expect("serialize");
        assert_eq!(json, "\"partial\"");
    }
}
