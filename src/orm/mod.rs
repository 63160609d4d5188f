//! SeaORM entities.

pub mod comments;
pub mod enums;
pub mod events;
pub mod resources;
pub mod rsvps;
pub mod votes;

pub use enums::{ItemKind, ItemStatus, VoteValue};
