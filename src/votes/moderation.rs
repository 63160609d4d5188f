//! Community moderation driven by downvote counts.
//!
//! The target status is a function of the downvote count alone, never of the
//! current status, so re-evaluating an item is always safe.

use super::error::VoteError;
use super::store::{self, VoteTally};
use crate::app_config::ModerationConfig;
use crate::orm::{ItemKind, ItemStatus};
use sea_orm::ConnectionTrait;

/// Downvote counts at which items change status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub flag: i32,
    pub delete: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            flag: 20,
            delete: 50,
        }
    }
}

impl From<&ModerationConfig> for Thresholds {
    fn from(config: &ModerationConfig) -> Self {
        Self {
            flag: config.flag_threshold,
            delete: config.delete_threshold,
        }
    }
}

impl Thresholds {
    pub fn status_for(&self, downvotes: i32) -> ItemStatus {
        if downvotes >= self.delete {
            ItemStatus::Deleted
        } else if downvotes >= self.flag {
            ItemStatus::Flagged
        } else {
            ItemStatus::Active
        }
    }
}

/// Outcome of a moderation pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StateResult {
    pub status: ItemStatus,
    /// Counters the status was derived from
    pub tally: VoteTally,
}

/// Reads the item's counters and persists the status they imply.
///
/// At the delete threshold the item's dependents are removed first, then the
/// item itself.
pub async fn evaluate_and_apply<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
    thresholds: &Thresholds,
) -> Result<StateResult, VoteError> {
    let tally = store::get_counts(conn, kind, item_id)
        .await?
        .ok_or(VoteError::NotFound { kind, id: item_id })?;

    let status = thresholds.status_for(tally.downvotes);
    match status {
        ItemStatus::Deleted => {
            store::remove_item(conn, kind, item_id).await?;
            log::warn!(
                "Deleted {} {} after {} downvotes",
                kind.as_str(),
                item_id,
                tally.downvotes
            );
        }
        ItemStatus::Flagged => {
            store::set_status(conn, kind, item_id, status).await?;
            log::info!(
                "Flagged {} {} at {} downvotes",
                kind.as_str(),
                item_id,
                tally.downvotes
            );
        }
        ItemStatus::Active => {
            store::set_status(conn, kind, item_id, status).await?;
        }
    }

    Ok(StateResult { status, tally })
}
