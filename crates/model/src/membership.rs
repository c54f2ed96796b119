//! Membership resolution: which ranked securities are held in a period.

use std::collections::{BTreeMap, BTreeSet};

use capsort_primitives::{Bucket, MissingReason, RankKind, RankingSnapshot, SecurityId};

/// Securities of one bucket that are available in the period being
/// evaluated.
///
/// A decile bucket holds the securities ranked into it; a top-N bucket holds
/// ordinal ranks `1..=min(n, eligible)`. A bucket whose scheme does not match
/// the snapshot kind resolves to no member.
#[must_use]
pub fn bucket_members(
    snapshot: &RankingSnapshot,
    available: &BTreeSet<SecurityId>,
    bucket: Bucket,
) -> BTreeSet<SecurityId> {
    let selects = |rank: u32| match (bucket, snapshot.kind) {
        (Bucket::Decile(b), RankKind::Decile) => rank == u32::from(b),
        (Bucket::Top(n), RankKind::Ordinal) => {
            usize::try_from(rank).is_ok_and(|r| r <= n.min(snapshot.eligible()))
        }
        _ => false,
    };
    snapshot
        .ranks
        .iter()
        .filter(|&(id, &rank)| selects(rank) && available.contains(id))
        .map(|(&id, _)| id)
        .collect()
}

/// Resolve the members of every requested bucket.
#[must_use]
pub fn members(
    snapshot: &RankingSnapshot,
    available: &BTreeSet<SecurityId>,
    buckets: &[Bucket],
) -> BTreeMap<Bucket, BTreeSet<SecurityId>> {
    buckets.iter().map(|&b| (b, bucket_members(snapshot, available, b))).collect()
}

/// Members of one bucket, or why there are none.
///
/// # Errors
/// `NoEligible` when nothing was ranked, `EmptyMembership` when ranked
/// members exist but none is available.
pub fn resolve(
    snapshot: &RankingSnapshot,
    available: &BTreeSet<SecurityId>,
    bucket: Bucket,
) -> Result<BTreeSet<SecurityId>, MissingReason> {
    if snapshot.is_empty() {
        return Err(MissingReason::NoEligible);
    }
    let held = bucket_members(snapshot, available, bucket);
    if held.is_empty() { Err(MissingReason::EmptyMembership) } else { Ok(held) }
}
