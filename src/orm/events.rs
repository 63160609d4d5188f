//! SeaORM Entity for events table

use super::ItemStatus;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub created_by: i32,
    pub upvotes: i32,
    pub downvotes: i32,
    pub status: ItemStatus,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
    #[sea_orm(has_many = "super::rsvps::Entity")]
    Rsvps,
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::rsvps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rsvps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
