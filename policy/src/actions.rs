//! Candidate actions and legal action enumeration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tactician_battle::BattleState;
use tactician_protocol::{BattleRequest, to_id};

use crate::PolicyError;

/// Number of placeholder move actions offered before any move is known
pub const MOVE_SLOTS: u8 = 4;

/// One thing our side can do on its turn.
///
/// Labels are `move:<id>`, `switch:<species>` and `move<N>` for a move
/// slot whose move is not known yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Action {
    Move(String),
    Switch(String),
    Slot(u8),
}

impl Action {
    /// A move action from a display name or id
    pub fn use_move(name: &str) -> Self {
        Action::Move(to_id(name))
    }

    pub fn switch_to(species: impl Into<String>) -> Self {
        Action::Switch(species.into())
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch(_))
    }

    pub fn move_id(&self) -> Option<&str> {
        match self {
            Action::Move(id) => Some(id),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(id) => write!(f, "move:{id}"),
            Action::Switch(species) => write!(f, "switch:{species}"),
            Action::Slot(n) => write!(f, "move{n}"),
        }
    }
}

impl FromStr for Action {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix("move:").filter(|id| !id.is_empty()) {
            return Ok(Action::Move(id.to_string()));
        }
        if let Some(species) = s.strip_prefix("switch:").filter(|sp| !sp.is_empty()) {
            return Ok(Action::Switch(species.to_string()));
        }
        if let Some(n) = s.strip_prefix("move").and_then(|n| n.parse().ok()) {
            return Ok(Action::Slot(n));
        }
        Err(PolicyError::UnknownAction(s.to_string()))
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl TryFrom<String> for Action {
    type Error = PolicyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Keep the first occurrence of each action, in order
pub fn dedup_actions<I>(actions: I) -> Vec<Action>
where
    I: IntoIterator<Item = Action>,
{
    let mut unique: Vec<Action> = Vec::new();
    for action in actions {
        if !unique.contains(&action) {
            unique.push(action);
        }
    }
    unique
}

/// Actions our side could take judging by the tracked state alone.
///
/// Known moves of the active Pokemon come first (or [`MOVE_SLOTS`] slot
/// placeholders when none are known), then a switch to every revealed
/// bench member that has not fainted.
pub fn enumerate_legal_actions(state: &BattleState) -> Vec<Action> {
    let me = &state.player_self;
    let mut actions = Vec::new();

    match me.active_pokemon().filter(|p| !p.moves_known.is_empty()) {
        Some(active) => actions.extend(active.moves_known.iter().map(|m| Action::use_move(m))),
        None => actions.extend((1..=MOVE_SLOTS).map(Action::Slot)),
    }

    actions.extend(
        me.bench()
            .filter(|(_, p)| !p.is_placeholder())
            .map(|(_, p)| Action::switch_to(p.species.clone())),
    );

    dedup_actions(actions)
}

/// Actions a `|request|` allows
pub fn request_actions(request: &BattleRequest) -> Vec<Action> {
    if request.wait {
        return Vec::new();
    }

    let force_switch = request.is_force_switch();
    let mut actions = Vec::new();

    if !force_switch {
        if let Some(active) = request.active_pokemon() {
            actions.extend(active.available_moves().map(|(_, slot)| {
                if slot.id.is_empty() {
                    Action::use_move(&slot.name)
                } else {
                    Action::use_move(&slot.id)
                }
            }));
        }
    }

    if force_switch || !request.is_trapped() {
        actions.extend(
            request
                .available_switches()
                .into_iter()
                .map(|p| Action::switch_to(p.species())),
        );
    }

    dedup_actions(actions)
}
