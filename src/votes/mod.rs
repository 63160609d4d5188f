//! Community voting on events and resources.
//!
//! A vote submission runs as one transaction:
//! ledger update, counter update, then moderation. A repeated vote stops
//! after the ledger lookup and writes nothing.

pub mod counter;
pub mod error;
pub mod ledger;
pub mod moderation;
pub mod store;

pub use error::VoteError;
pub use ledger::VoteOutcome;
pub use moderation::{StateResult, Thresholds};
pub use store::{ItemState, VoteTally};

use crate::orm::{ItemKind, ItemStatus, VoteValue};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;

/// Result of a vote submission as reported to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub message: &'static str,
    pub recorded: bool,
    /// `None` once the item has been deleted
    pub status: Option<ItemStatus>,
    pub deleted: bool,
    pub already_voted: bool,
    pub upvotes: Option<i32>,
    pub downvotes: Option<i32>,
}

impl VoteReceipt {
    fn recorded(state: StateResult) -> Self {
        let deleted = state.status == ItemStatus::Deleted;
        Self {
            message: "vote recorded",
            recorded: true,
            status: if deleted { None } else { Some(state.status) },
            deleted,
            already_voted: false,
            upvotes: if deleted { None } else { Some(state.tally.upvotes) },
            downvotes: if deleted {
                None
            } else {
                Some(state.tally.downvotes)
            },
        }
    }

    fn already_voted(state: ItemState) -> Self {
        Self {
            message: "already voted",
            recorded: false,
            status: Some(state.status),
            deleted: false,
            already_voted: true,
            upvotes: Some(state.tally.upvotes),
            downvotes: Some(state.tally.downvotes),
        }
    }
}

/// Counters, status and the viewer's own vote for one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSummary {
    pub item_type: ItemKind,
    pub item_id: i32,
    pub upvotes: i32,
    pub downvotes: i32,
    pub status: ItemStatus,
    pub your_vote: Option<VoteValue>,
}

pub fn parse_item_kind(value: &str) -> Result<ItemKind, VoteError> {
    ItemKind::parse(value).ok_or(VoteError::Validation("invalid item type"))
}

pub fn parse_vote_value(value: &str) -> Result<VoteValue, VoteError> {
    VoteValue::parse(value).ok_or(VoteError::Validation("invalid vote"))
}

/// Validates raw request input and casts the vote.
///
/// Checks run in order: authentication, vote value, item type.
pub async fn cast_vote(
    db: &DatabaseConnection,
    voter: Option<i32>,
    item_type: &str,
    item_id: i32,
    vote: &str,
    thresholds: &Thresholds,
) -> Result<VoteReceipt, VoteError> {
    let voter = voter.ok_or(VoteError::AuthRequired)?;
    let value = parse_vote_value(vote)?;
    let kind = parse_item_kind(item_type)?;

    submit_vote(db, voter, kind, item_id, value, thresholds).await
}

/// Records a vote and applies its consequences atomically.
///
/// Dropping the transaction on any error rolls back every write.
pub async fn submit_vote(
    db: &DatabaseConnection,
    voter: i32,
    kind: ItemKind,
    item_id: i32,
    value: VoteValue,
    thresholds: &Thresholds,
) -> Result<VoteReceipt, VoteError> {
    let txn = db.begin().await?;

    if !store::exists(&txn, kind, item_id).await? {
        return Err(VoteError::NotFound { kind, id: item_id });
    }

    let outcome = ledger::record_or_update_vote(&txn, voter, kind, item_id, value).await?;
    if outcome == VoteOutcome::NoChange {
        // Read after the ledger so a flip committed by a concurrent request is visible.
        let state = store::get_state(&txn, kind, item_id)
            .await?
            .ok_or(VoteError::NotFound { kind, id: item_id })?;
        txn.commit().await?;
        return Ok(VoteReceipt::already_voted(state));
    }

    counter::apply_count_delta(&txn, kind, item_id, outcome).await?;
    let state = moderation::evaluate_and_apply(&txn, kind, item_id, thresholds).await?;

    txn.commit().await?;

    log::info!(
        "User {} voted {} on {} {} ({:?})",
        voter,
        value.as_str(),
        kind.as_str(),
        item_id,
        state.status
    );
    Ok(VoteReceipt::recorded(state))
}

/// Reads an item's vote summary. `viewer` is `None` for guests.
pub async fn summarize(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    kind: ItemKind,
    item_id: i32,
) -> Result<VoteSummary, VoteError> {
    let state = store::get_state(db, kind, item_id)
        .await?
        .ok_or(VoteError::NotFound { kind, id: item_id })?;

    let your_vote = match viewer {
        Some(user_id) => ledger::find_vote(db, user_id, kind, item_id)
            .await?
            .map(|v| v.vote),
        None => None,
    };

    Ok(VoteSummary {
        item_type: kind,
        item_id,
        upvotes: state.tally.upvotes,
        downvotes: state.tally.downvotes,
        status: state.status,
        your_vote,
    })
}
