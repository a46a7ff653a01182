//! Leaderboard ranking
//!
//! RANK semantics expressed as an explicit algorithm rather than a database
//! window function: tied totals share a rank, and the next distinct total
//! takes its 1-based position (skipping past the tie group). The full view is
//! recomputed whenever the backing query re-runs; nothing is patched
//! incrementally.

use super::entities::LeaderboardEntry;
use super::value_objects::UserId;

/// Rank users by total, descending.
///
/// Ties on the total are broken by user id ascending so the output is
/// deterministic regardless of storage order.
pub fn rank(mut totals: Vec<(UserId, i64)>) -> Vec<LeaderboardEntry> {
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut entries = Vec::with_capacity(totals.len());
    let mut current_rank = 0u32;
    let mut previous_total = None;

    for (position, (user_id, total)) in totals.into_iter().enumerate() {
        if previous_total != Some(total) {
            current_rank = position as u32 + 1;
            previous_total = Some(total);
        }
        entries.push(LeaderboardEntry {
            user_id,
            total,
            rank: current_rank,
        });
    }

    entries
}
