//! Battle state tracking from protocol events and request snapshots

mod battle;
mod request;
mod updater;

pub use battle::{BattleState, DEFAULT_FORMAT, DEFAULT_GENERATION, SCHEMA_VERSION, StateSummary};
pub use request::apply_request;
pub use updater::{Interpreter, LastMove};
