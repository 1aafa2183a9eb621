pub mod database;
pub mod events;
pub mod filter;
pub mod migrations;
pub mod path_utils;
pub mod store;

pub use filter::{EventField, EventFilter, RangeClause, RangeOp};
pub use store::{EventStore, SqliteStore};
