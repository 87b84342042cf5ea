//! Battle state model and event fold for Pokemon Showdown singles.
//!
//! # Overview
//!
//! `tactician-battle` sits between `tactician-protocol` (wire format) and the
//! decision layer:
//!
//! ```text
//! tactician-protocol (wire format)
//!        │
//!        ▼
//! tactician-battle (state model + fold) ← THIS CRATE
//!        │
//!        ▼
//! tactician-policy (evaluation and action selection)
//! ```
//!
//! # Main Types
//!
//! - [`BattleState`] - snapshot of one battle from our point of view
//! - [`Interpreter`] - folds protocol events into successive snapshots
//! - [`apply_request`] - refreshes our own team from a `|request|` snapshot
//! - [`PokemonState`], [`PlayerState`], [`FieldState`] - the parts of a snapshot
//! - [`History`] - bounded log used for switch-loop detection
//!
//! # Example Usage
//!
//! ```
//! use tactician_battle::{BattleState, Interpreter, Player};
//!
//! let state = BattleState::bootstrap("battle-1", 9, "randombattle", "Me", "Them");
//! let mut interpreter = Interpreter::new();
//! let state = interpreter.feed(
//!     [
//!         "|turn|1",
//!         "|switch|p1a: Charizard|Charizard, L80|100/100",
//!         "|-sidestart|p2: Them|move: Stealth Rock",
//!     ],
//!     state,
//! );
//!
//! assert_eq!(state.turn, 1);
//! assert_eq!(state.self_active().unwrap().species, "Charizard");
//! assert!(state.field.side(Player::P2).hazards.stealth_rock);
//! ```

pub mod tracking;
pub mod types;

pub use tracking::{
    BattleState, DEFAULT_FORMAT, DEFAULT_GENERATION, Interpreter, LastMove, SCHEMA_VERSION,
    StateSummary, apply_request,
};
pub use types::{
    ActionKind, FieldState, History, HistoryEntry, PlayerState, PokemonState, PokemonVolatile,
    SideConditions, SideFields, StatStages, Status, TEAM_SIZE, TYPE_CHART, Type, VolatileEffect,
};

// Re-export commonly used protocol types
pub use tactician_protocol::{Player, Stat};
