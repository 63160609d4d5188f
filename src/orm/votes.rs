//! SeaORM Entity for votes table (the vote ledger)
//!
//! `(user_id, item_type, item_id)` carries a unique index in the schema.
//! Items are referenced by kind and id, so there is no foreign key to follow.

use super::{ItemKind, VoteValue};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub item_type: ItemKind,
    pub item_id: i32,
    pub vote: VoteValue,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
