//! Aggregate counters kept on each item alongside the ledger.

use super::error::VoteError;
use super::ledger::VoteOutcome;
use super::store::{self, CountDelta};
use crate::orm::{ItemKind, VoteValue};
use sea_orm::ConnectionTrait;

impl VoteOutcome {
    /// Counter adjustment implied by this outcome. `None` for `NoChange`.
    ///
    /// Every decrement undoes an increment recorded for the same ledger row,
    /// so counters stay non-negative as long as both move in one transaction.
    pub fn count_delta(&self) -> Option<CountDelta> {
        match *self {
            VoteOutcome::FirstVote(VoteValue::Up) => Some(CountDelta {
                upvotes: 1,
                downvotes: 0,
            }),
            VoteOutcome::FirstVote(VoteValue::Down) => Some(CountDelta {
                upvotes: 0,
                downvotes: 1,
            }),
            VoteOutcome::Changed {
                from: VoteValue::Up,
                to: VoteValue::Down,
            } => Some(CountDelta {
                upvotes: -1,
                downvotes: 1,
            }),
            VoteOutcome::Changed {
                from: VoteValue::Down,
                to: VoteValue::Up,
            } => Some(CountDelta {
                upvotes: 1,
                downvotes: -1,
            }),
            // A flip to the same value is a no-op.
            VoteOutcome::Changed { .. } | VoteOutcome::NoChange => None,
        }
    }
}

/// Applies the counter change for a ledger outcome.
/// Fails with `NotFound` when the item vanished before the update.
pub async fn apply_count_delta<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
    outcome: VoteOutcome,
) -> Result<(), VoteError> {
    let delta = match outcome.count_delta() {
        Some(delta) => delta,
        None => return Ok(()),
    };

    let touched = store::apply_counts(conn, kind, item_id, delta).await?;
    if touched == 0 {
        return Err(VoteError::NotFound { kind, id: item_id });
    }

    Ok(())
}
