//! Closed value sets stored as text columns.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Kind of a votable item. Each kind maps to exactly one table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[sea_orm(string_value = "event")]
    Event,
    #[sea_orm(string_value = "resource")]
    Resource,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Event => "event",
            ItemKind::Resource => "resource",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "event" => Some(ItemKind::Event),
            "resource" => Some(ItemKind::Resource),
            _ => None,
        }
    }
}

/// A single user's stance on an item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    #[sea_orm(string_value = "up")]
    Up,
    #[sea_orm(string_value = "down")]
    Down,
}

impl VoteValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Up => "up",
            VoteValue::Down => "down",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" => Some(VoteValue::Up),
            "down" => Some(VoteValue::Down),
            _ => None,
        }
    }
}

/// Moderation status of an item.
/// `Deleted` is never persisted: deleted items have no row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "flagged")]
    Flagged,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Flagged => "flagged",
            ItemStatus::Deleted => "deleted",
        }
    }
}
