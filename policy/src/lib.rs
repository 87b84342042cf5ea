//! Action evaluation and selection for tracked Pokemon Showdown battles.
//!
//! # Overview
//!
//! ```text
//! tactician-protocol (wire format)
//!        │
//!        ▼
//! tactician-battle (state model + fold)
//!        │
//!        ▼
//! tactician-policy (evaluation and action selection) ← THIS CRATE
//! ```
//!
//! # Main Types
//!
//! - [`KnowledgeBase`] / [`Dex`] - move, species, item and type chart lookups
//! - [`Action`] - a move by id, a switch by species, or a move slot
//! - [`Evaluator`] - weighted five-term scoring of an action
//! - [`BaselinePolicy`], [`LookaheadPolicy`] - rank candidates into a [`Decision`]
//! - [`BattleContext`] - one battle's state, interpreter and policy
//!
//! # Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use tactician_policy::{Action, AgentConfig, BattleContext, Dex};
//!
//! let mut ctx = BattleContext::new(&AgentConfig::new("Me"), "battle-1", Arc::new(Dex::new()));
//! ctx.feed(["|player|p1|Me|1", "|switch|p1a: Pikachu|Pikachu, L88|100/100", "|turn|1"]);
//!
//! let decision = ctx.decide(None).unwrap();
//! assert_eq!(decision.chosen, Action::Slot(1));
//! ```

use thiserror::Error;

pub mod actions;
pub mod config;
pub mod context;
pub mod evaluator;
pub mod knowledge;
pub mod lookahead;
pub mod policy;

pub use actions::{Action, MOVE_SLOTS, dedup_actions, enumerate_legal_actions, request_actions};
pub use config::{AgentConfig, ConfigError};
pub use context::BattleContext;
pub use evaluator::{Breakdown, EvalWeights, Evaluator, switch_penalty};
pub use knowledge::{
    AbilityData, Dex, ItemData, KnowledgeBase, KnowledgeError, MoveCategory, MoveData, TypeChart,
};
pub use lookahead::LookaheadPolicy;
pub use policy::{ActionInsight, BaselinePolicy, Decision, Policy};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("No legal actions")]
    NoLegalActions,

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}
