//! Pure reconciliation math: deletion sets and verification diffs.
//!
//! Kept free of I/O so the create/update/delete decisions can be tested
//! without a database or API client.

use std::collections::HashSet;

use pressroom_core::PrintfulId;

use crate::models::ProductSummary;

/// Local products whose Printful ID no longer appears in the remote catalog
/// (orphans), in local ID order.
#[must_use]
pub fn compute_deletions(
    remote_ids: &HashSet<PrintfulId>,
    local: &[ProductSummary],
) -> Vec<ProductSummary> {
    local
        .iter()
        .filter(|p| !remote_ids.contains(&p.printful_id))
        .cloned()
        .collect()
}

/// Symmetric difference between the remote and local ID sets after a run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyDiff {
    /// Remote products with no local row (gaps).
    pub missing: Vec<PrintfulId>,
    /// Local products with no remote counterpart (orphans).
    pub extra: Vec<PrintfulId>,
}

impl VerifyDiff {
    /// True when local exactly mirrors remote.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Compare the remote ID set against the local one, both sides sorted for
/// stable warning output.
#[must_use]
pub fn verify_mirror(
    remote_ids: &HashSet<PrintfulId>,
    local_ids: &HashSet<PrintfulId>,
) -> VerifyDiff {
    let mut missing: Vec<PrintfulId> = remote_ids.difference(local_ids).copied().collect();
    let mut extra: Vec<PrintfulId> = local_ids.difference(remote_ids).copied().collect();
    missing.sort_unstable();
    extra.sort_unstable();

    VerifyDiff { missing, extra }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::ProductId;

    fn summary(id: i32, printful_id: i64, name: &str) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            printful_id: PrintfulId::new(printful_id),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_compute_deletions_scenario() {
        // Remote has [A(1), B(2)]; local has [A(1), C(3)]. C must go.
        let remote: HashSet<PrintfulId> = [PrintfulId::new(1), PrintfulId::new(2)].into();
        let local = vec![summary(10, 1, "A"), summary(11, 3, "C")];

        let deletions = compute_deletions(&remote, &local);
        assert_eq!(deletions.len(), 1);
        let doomed = deletions.first().expect("one deletion");
        assert_eq!(doomed.printful_id, PrintfulId::new(3));
        assert_eq!(doomed.name, "C");
    }

    #[test]
    fn test_compute_deletions_in_sync() {
        let remote: HashSet<PrintfulId> = [PrintfulId::new(1), PrintfulId::new(2)].into();
        let local = vec![summary(10, 1, "A"), summary(11, 2, "B")];

        assert!(compute_deletions(&remote, &local).is_empty());
    }

    #[test]
    fn test_compute_deletions_empty_remote_deletes_everything() {
        let remote = HashSet::new();
        let local = vec![summary(10, 1, "A"), summary(11, 2, "B")];

        assert_eq!(compute_deletions(&remote, &local).len(), 2);
    }

    #[test]
    fn test_verify_mirror_reports_both_sides() {
        let remote: HashSet<PrintfulId> =
            [PrintfulId::new(1), PrintfulId::new(2), PrintfulId::new(4)].into();
        let local: HashSet<PrintfulId> =
            [PrintfulId::new(1), PrintfulId::new(3), PrintfulId::new(4)].into();

        let diff = verify_mirror(&remote, &local);
        assert_eq!(diff.missing, vec![PrintfulId::new(2)]);
        assert_eq!(diff.extra, vec![PrintfulId::new(3)]);
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_verify_mirror_exact() {
        let ids: HashSet<PrintfulId> = [PrintfulId::new(7)].into();
        assert!(verify_mirror(&ids, &ids).is_empty());
    }
}
