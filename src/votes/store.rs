//! Item store and dependent-record stores.
//!
//! Every operation takes an [`ItemKind`] and dispatches to the typed entity
//! for that kind, so table and column names never come from request input.

use crate::orm::{comments, events, resources, rsvps, votes, ItemKind, ItemStatus};
use sea_orm::{
    entity::*, query::*, sea_query::Expr, ActiveEnum, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, FromQueryResult,
};

/// Denormalized vote counters of an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct VoteTally {
    pub upvotes: i32,
    pub downvotes: i32,
}

/// Signed adjustment applied to an item's counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct CountDelta {
    pub upvotes: i32,
    pub downvotes: i32,
}

/// Counters and persisted moderation status of an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemState {
    pub tally: VoteTally,
    pub status: ItemStatus,
}

/// An entity carrying vote counters and a moderation status.
pub trait VotableEntity: EntityTrait {
    fn id_column() -> Self::Column;
    fn upvotes_column() -> Self::Column;
    fn downvotes_column() -> Self::Column;
    fn status_column() -> Self::Column;
    fn state_of(model: &Self::Model) -> ItemState;
}

impl VotableEntity for events::Entity {
    fn id_column() -> Self::Column {
        events::Column::Id
    }
    fn upvotes_column() -> Self::Column {
        events::Column::Upvotes
    }
    fn downvotes_column() -> Self::Column {
        events::Column::Downvotes
    }
    fn status_column() -> Self::Column {
        events::Column::Status
    }
    fn state_of(model: &events::Model) -> ItemState {
        ItemState {
            tally: VoteTally {
                upvotes: model.upvotes,
                downvotes: model.downvotes,
            },
            status: model.status,
        }
    }
}

impl VotableEntity for resources::Entity {
    fn id_column() -> Self::Column {
        resources::Column::Id
    }
    fn upvotes_column() -> Self::Column {
        resources::Column::Upvotes
    }
    fn downvotes_column() -> Self::Column {
        resources::Column::Downvotes
    }
    fn status_column() -> Self::Column {
        resources::Column::Status
    }
    fn state_of(model: &resources::Model) -> ItemState {
        ItemState {
            tally: VoteTally {
                upvotes: model.upvotes,
                downvotes: model.downvotes,
            },
            status: model.status,
        }
    }
}

async fn tally_of<E, C>(conn: &C, item_id: i32) -> Result<Option<VoteTally>, DbErr>
where
    E: VotableEntity,
    C: ConnectionTrait,
{
    E::find()
        .select_only()
        .column(E::upvotes_column())
        .column(E::downvotes_column())
        .filter(E::id_column().eq(item_id))
        .into_model::<VoteTally>()
        .one(conn)
        .await
}

async fn state_of_row<E, C>(conn: &C, item_id: i32) -> Result<Option<ItemState>, DbErr>
where
    E: VotableEntity,
    C: ConnectionTrait,
{
    let model = E::find()
        .filter(E::id_column().eq(item_id))
        .one(conn)
        .await?;

    Ok(model.as_ref().map(E::state_of))
}

async fn add_counts<E, C>(conn: &C, item_id: i32, delta: CountDelta) -> Result<u64, DbErr>
where
    E: VotableEntity,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(
            E::upvotes_column(),
            Expr::col(E::upvotes_column()).add(delta.upvotes),
        )
        .col_expr(
            E::downvotes_column(),
            Expr::col(E::downvotes_column()).add(delta.downvotes),
        )
        .filter(E::id_column().eq(item_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

async fn write_status<E, C>(conn: &C, item_id: i32, status: ItemStatus) -> Result<u64, DbErr>
where
    E: VotableEntity,
    C: ConnectionTrait,
{
    let result = E::update_many()
        .col_expr(E::status_column(), Expr::value(status.to_value()))
        .filter(E::id_column().eq(item_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

async fn delete_row<E, C>(conn: &C, item_id: i32) -> Result<u64, DbErr>
where
    E: VotableEntity,
    C: ConnectionTrait,
{
    let result = E::delete_many()
        .filter(E::id_column().eq(item_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Current counters of an item, or `None` if it does not exist.
pub async fn get_counts<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
) -> Result<Option<VoteTally>, DbErr> {
    match kind {
        ItemKind::Event => tally_of::<events::Entity, _>(conn, item_id).await,
        ItemKind::Resource => tally_of::<resources::Entity, _>(conn, item_id).await,
    }
}

/// Current counters and stored status, or `None` if the item does not exist.
pub async fn get_state<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
) -> Result<Option<ItemState>, DbErr> {
    match kind {
        ItemKind::Event => state_of_row::<events::Entity, _>(conn, item_id).await,
        ItemKind::Resource => state_of_row::<resources::Entity, _>(conn, item_id).await,
    }
}

pub async fn exists<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
) -> Result<bool, DbErr> {
    Ok(get_counts(conn, kind, item_id).await?.is_some())
}

/// Adds `delta` to the counters in a single statement.
/// Returns the number of rows touched; 0 means the item is gone.
pub async fn apply_counts<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
    delta: CountDelta,
) -> Result<u64, DbErr> {
    match kind {
        ItemKind::Event => add_counts::<events::Entity, _>(conn, item_id, delta).await,
        ItemKind::Resource => add_counts::<resources::Entity, _>(conn, item_id, delta).await,
    }
}

pub async fn set_status<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
    status: ItemStatus,
) -> Result<u64, DbErr> {
    match kind {
        ItemKind::Event => write_status::<events::Entity, _>(conn, item_id, status).await,
        ItemKind::Resource => write_status::<resources::Entity, _>(conn, item_id, status).await,
    }
}

/// Deletes the item row only. Dependents must already be gone.
pub async fn delete_item<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
) -> Result<u64, DbErr> {
    match kind {
        ItemKind::Event => delete_row::<events::Entity, _>(conn, item_id).await,
        ItemKind::Resource => delete_row::<resources::Entity, _>(conn, item_id).await,
    }
}

/// Deletes every record that references the item: ledger rows, RSVPs (events) and comments.
pub async fn delete_all_for_item<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
) -> Result<(), DbErr> {
    votes::Entity::delete_many()
        .filter(votes::Column::ItemType.eq(kind.to_value()))
        .filter(votes::Column::ItemId.eq(item_id))
        .exec(conn)
        .await?;

    match kind {
        ItemKind::Event => {
            rsvps::Entity::delete_many()
                .filter(rsvps::Column::EventId.eq(item_id))
                .exec(conn)
                .await?;
            comments::Entity::delete_many()
                .filter(comments::Column::EventId.eq(item_id))
                .exec(conn)
                .await?;
        }
        ItemKind::Resource => {
            comments::Entity::delete_many()
                .filter(comments::Column::ResourceId.eq(item_id))
                .exec(conn)
                .await?;
        }
    }

    Ok(())
}

/// Deletes an item together with its dependents, dependents first.
/// Returns false if the item did not exist.
pub async fn remove_item<C: ConnectionTrait>(
    conn: &C,
    kind: ItemKind,
    item_id: i32,
) -> Result<bool, DbErr> {
    delete_all_for_item(conn, kind, item_id).await?;
    Ok(delete_item(conn, kind, item_id).await? > 0)
}
