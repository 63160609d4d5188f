//! Vote ledger: one current vote per (user, item kind, item id).

use super::error::is_unique_violation;
use crate::orm::{votes, ItemKind, VoteValue};
use chrono::Utc;
use sea_orm::{
    entity::*, query::*, sea_query::Expr, ActiveEnum, ActiveValue::Set, ColumnTrait,
    ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait, TransactionTrait,
};

/// Result of reconciling a new vote with the ledger.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// No previous vote; a row was inserted.
    FirstVote(VoteValue),
    /// The previous vote was flipped in place.
    Changed { from: VoteValue, to: VoteValue },
    /// The voter already holds this vote. Nothing was written.
    NoChange,
}

/// Looks up the voter's current vote on an item.
pub async fn find_vote<C: ConnectionTrait>(
    conn: &C,
    voter: i32,
    kind: ItemKind,
    item_id: i32,
) -> Result<Option<votes::Model>, DbErr> {
    votes::Entity::find()
        .filter(votes::Column::UserId.eq(voter))
        .filter(votes::Column::ItemType.eq(kind.to_value()))
        .filter(votes::Column::ItemId.eq(item_id))
        .one(conn)
        .await
}

/// Inserts a first vote inside a savepoint.
///
/// A concurrent insert for the same voter and item trips the unique index;
/// the savepoint is rolled back and the vote counts as already cast.
pub async fn insert_first_vote(
    txn: &DatabaseTransaction,
    voter: i32,
    kind: ItemKind,
    item_id: i32,
    value: VoteValue,
) -> Result<VoteOutcome, DbErr> {
    let savepoint = txn.begin().await?;

    let vote = votes::ActiveModel {
        user_id: Set(voter),
        item_type: Set(kind),
        item_id: Set(item_id),
        vote: Set(value),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    match vote.insert(&savepoint).await {
        Ok(_) => {
            savepoint.commit().await?;
            Ok(VoteOutcome::FirstVote(value))
        }
        Err(err) if is_unique_violation(&err) => {
            log::debug!(
                "Concurrent vote by user {} on {} {} lost the insert race",
                voter,
                kind.as_str(),
                item_id
            );
            savepoint.rollback().await?;
            Ok(VoteOutcome::NoChange)
        }
        Err(err) => Err(err),
    }
}

/// Flips a previously read vote to `value`.
///
/// The update only matches while the row still holds the value that was read.
/// A concurrent flip that committed first leaves nothing to match, so this one
/// reports `NoChange` instead of moving the counters a second time.
pub async fn flip_vote<C: ConnectionTrait>(
    conn: &C,
    existing: &votes::Model,
    value: VoteValue,
) -> Result<VoteOutcome, DbErr> {
    let from = existing.vote;
    if from == value {
        return Ok(VoteOutcome::NoChange);
    }

    let result = votes::Entity::update_many()
        .col_expr(votes::Column::Vote, Expr::value(value.to_value()))
        .filter(votes::Column::Id.eq(existing.id))
        .filter(votes::Column::Vote.eq(from.to_value()))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        log::debug!(
            "Vote {} changed underneath user {}, skipping flip",
            existing.id,
            existing.user_id
        );
        return Ok(VoteOutcome::NoChange);
    }

    Ok(VoteOutcome::Changed { from, to: value })
}

/// Records `value` as the voter's current vote, writing at most one ledger row.
pub async fn record_or_update_vote(
    txn: &DatabaseTransaction,
    voter: i32,
    kind: ItemKind,
    item_id: i32,
    value: VoteValue,
) -> Result<VoteOutcome, DbErr> {
    let previous = find_vote(txn, voter, kind, item_id).await?;

    let outcome = match previous {
        None => insert_first_vote(txn, voter, kind, item_id, value).await?,
        Some(existing) => flip_vote(txn, &existing, value).await?,
    };

    log::debug!(
        "Ledger outcome for user {} on {} {}: {:?}",
        voter,
        kind.as_str(),
        item_id,
        outcome
    );
    Ok(outcome)
}
