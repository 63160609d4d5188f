//! Test fixtures for creating test data
#![allow(dead_code)]

use campus_connect::orm::{
    comments, events, resources, rsvps, votes, ItemKind, ItemStatus, VoteValue,
};
use campus_connect::votes::{store, submit_vote, Thresholds, VoteReceipt, VoteTally};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveEnum, ActiveValue::Set, DatabaseConnection, DbErr};

/// Owner used for items created in tests. Voters use ids from 1000 up.
pub const OWNER_ID: i32 = 1;

/// Create an event with preset counters.
pub async fn create_test_event(
    db: &DatabaseConnection,
    title: &str,
    upvotes: i32,
    downvotes: i32,
) -> Result<events::Model, DbErr> {
    let event = events::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("{} description", title)),
        created_by: Set(OWNER_ID),
        upvotes: Set(upvotes),
        downvotes: Set(downvotes),
        status: Set(Thresholds::default().status_for(downvotes)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    event.insert(db).await
}

/// Create a resource with preset counters.
pub async fn create_test_resource(
    db: &DatabaseConnection,
    title: &str,
    upvotes: i32,
    downvotes: i32,
) -> Result<resources::Model, DbErr> {
    let resource = resources::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("{} description", title)),
        category: Set(Some("housing".to_string())),
        created_by: Set(OWNER_ID),
        upvotes: Set(upvotes),
        downvotes: Set(downvotes),
        status: Set(Thresholds::default().status_for(downvotes)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    resource.insert(db).await
}

/// Add a comment to an event or resource.
pub async fn add_comment(
    db: &DatabaseConnection,
    kind: ItemKind,
    item_id: i32,
    user_id: i32,
    content: &str,
) -> Result<comments::Model, DbErr> {
    let (event_id, resource_id) = match kind {
        ItemKind::Event => (Some(item_id), None),
        ItemKind::Resource => (None, Some(item_id)),
    };

    let comment = comments::ActiveModel {
        content: Set(content.to_string()),
        event_id: Set(event_id),
        resource_id: Set(resource_id),
        created_by: Set(user_id),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    comment.insert(db).await
}

/// RSVP to an event.
pub async fn add_rsvp(
    db: &DatabaseConnection,
    event_id: i32,
    user_id: i32,
    status: &str,
) -> Result<rsvps::Model, DbErr> {
    let rsvp = rsvps::ActiveModel {
        event_id: Set(event_id),
        created_by: Set(user_id),
        status: Set(status.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    rsvp.insert(db).await
}

/// Cast a vote with default thresholds, panicking on failure.
pub async fn vote(
    db: &DatabaseConnection,
    user_id: i32,
    kind: ItemKind,
    item_id: i32,
    value: VoteValue,
) -> VoteReceipt {
    submit_vote(db, user_id, kind, item_id, value, &Thresholds::default())
        .await
        .expect("Vote should succeed")
}

/// Downvotes from `count` distinct users with ids `first_user..first_user + count`.
pub async fn downvote_from_users(
    db: &DatabaseConnection,
    kind: ItemKind,
    item_id: i32,
    first_user: i32,
    count: i32,
) -> Option<VoteReceipt> {
    let mut last = None;
    for user_id in first_user..first_user + count {
        last = Some(vote(db, user_id, kind, item_id, VoteValue::Down).await);
    }
    last
}

/// Current counters of an item, panicking if it is gone.
pub async fn tally(db: &DatabaseConnection, kind: ItemKind, item_id: i32) -> VoteTally {
    store::get_counts(db, kind, item_id)
        .await
        .expect("Failed to read counts")
        .expect("Item should exist")
}

pub async fn event_status(db: &DatabaseConnection, event_id: i32) -> Option<ItemStatus> {
    events::Entity::find_by_id(event_id)
        .one(db)
        .await
        .expect("Failed to fetch event")
        .map(|e| e.status)
}

pub async fn resource_status(db: &DatabaseConnection, resource_id: i32) -> Option<ItemStatus> {
    resources::Entity::find_by_id(resource_id)
        .one(db)
        .await
        .expect("Failed to fetch resource")
        .map(|r| r.status)
}

/// Number of ledger rows for one voter on one item.
pub async fn ledger_rows(
    db: &DatabaseConnection,
    user_id: i32,
    kind: ItemKind,
    item_id: i32,
) -> usize {
    votes::Entity::find()
        .filter(votes::Column::UserId.eq(user_id))
        .filter(votes::Column::ItemType.eq(kind.to_value()))
        .filter(votes::Column::ItemId.eq(item_id))
        .all(db)
        .await
        .expect("Failed to fetch votes")
        .len()
}
