//! BattleState - the snapshot the interpreter folds events into

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tactician_protocol::Player;

use crate::types::{FieldState, History, HistoryEntry, PlayerState, PokemonState};

pub const SCHEMA_VERSION: &str = "0.1.0";

/// Defaults used when a battle is bootstrapped without format information
pub const DEFAULT_GENERATION: u8 = 9;
pub const DEFAULT_FORMAT: &str = "randombattle";

/// Snapshot of one battle from our point of view.
///
/// Handlers consume a snapshot and return the next one; keep a clone to
/// hold on to an earlier state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub schema_version: String,

    pub battle_id: String,

    pub generation: u8,

    pub format: String,

    /// Current turn number (0 = not started)
    pub turn: u32,

    /// Wall-clock time of the last turn change
    pub timestamp: DateTime<Utc>,

    pub player_self: PlayerState,

    pub player_opponent: PlayerState,

    /// Protocol side we play on, once known
    pub my_side: Option<Player>,

    pub field: FieldState,

    pub history: History,

    /// Observed multipliers by defending species, then move id
    pub observed_effectiveness: BTreeMap<String, BTreeMap<String, f64>>,
}

impl BattleState {
    pub fn new(
        battle_id: impl Into<String>,
        generation: u8,
        format: impl Into<String>,
        player_self: PlayerState,
        player_opponent: PlayerState,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            battle_id: battle_id.into(),
            generation,
            format: format.into(),
            turn: 0,
            timestamp: Utc::now(),
            player_self,
            player_opponent,
            my_side: None,
            field: FieldState::default(),
            history: History::default(),
            observed_effectiveness: BTreeMap::new(),
        }
    }

    /// A fresh battle where both teams are six placeholders
    pub fn bootstrap(
        battle_id: impl Into<String>,
        generation: u8,
        format: impl Into<String>,
        self_name: impl Into<String>,
        opponent_name: impl Into<String>,
    ) -> Self {
        Self::new(
            battle_id,
            generation,
            format,
            PlayerState::new(self_name),
            PlayerState::new(opponent_name),
        )
    }

    /// Replace the turn number and refresh the timestamp
    pub fn with_turn(self, turn: u32) -> Self {
        Self {
            turn,
            timestamp: Utc::now(),
            ..self
        }
    }

    /// Our protocol side; p1 until the side is known
    pub fn self_side(&self) -> Player {
        self.my_side.unwrap_or(Player::P1)
    }

    pub fn opponent_side(&self) -> Player {
        self.self_side().opponent()
    }

    pub fn is_self(&self, side: Player) -> bool {
        side == self.self_side()
    }

    pub fn player(&self, side: Player) -> &PlayerState {
        if self.is_self(side) {
            &self.player_self
        } else {
            &self.player_opponent
        }
    }

    pub(crate) fn player_mut(&mut self, side: Player) -> &mut PlayerState {
        if self.is_self(side) {
            &mut self.player_self
        } else {
            &mut self.player_opponent
        }
    }

    pub fn self_active(&self) -> Option<&PokemonState> {
        self.player_self.active_pokemon()
    }

    pub fn opponent_active(&self) -> Option<&PokemonState> {
        self.player_opponent.active_pokemon()
    }

    /// Record our protocol side. Only the first binding sticks.
    ///
    /// When the side differs from the p1 fallback, whatever was already folded
    /// into the two players is swapped so it follows the real sides.
    pub(crate) fn bind_self_side(&mut self, side: Player) -> bool {
        if let Some(bound) = self.my_side {
            if bound != side {
                tracing::debug!(bound = %bound, ignored = %side, "self side already bound");
            }
            return false;
        }

        if side != self.self_side() {
            std::mem::swap(&mut self.player_self.team, &mut self.player_opponent.team);
            std::mem::swap(
                &mut self.player_self.active_slot,
                &mut self.player_opponent.active_slot,
            );
        }
        self.my_side = Some(side);
        tracing::debug!(battle_id = %self.battle_id, side = %side, "bound self side");
        true
    }

    /// Observed multiplier for a move id against a species, if one was seen
    pub fn observed_multiplier(&self, species: &str, move_id: &str) -> Option<f64> {
        self.observed_effectiveness
            .get(species)
            .and_then(|moves| moves.get(move_id))
            .copied()
    }

    pub(crate) fn record_effectiveness(&mut self, species: &str, move_id: &str, multiplier: f64) {
        self.observed_effectiveness
            .entry(species.to_string())
            .or_default()
            .insert(move_id.to_string(), multiplier);
    }

    pub(crate) fn log(&mut self, entry: HistoryEntry) {
        tracing::trace!(battle_id = %self.battle_id, event = %entry, "applied");
        self.history.push(entry);
    }

    /// Compact view for logs
    pub fn summary(&self) -> StateSummary {
        StateSummary {
            turn: self.turn,
            self_active: self.self_active().map(|p| p.species.clone()),
            opponent_active: self.opponent_active().map(|p| p.species.clone()),
            weather: self.field.weather.clone(),
            terrain: self.field.terrain.clone(),
            recent_history: self
                .history
                .recent(5)
                .map(|e| e.description.clone())
                .collect(),
        }
    }
}

/// Compact view of a [`BattleState`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    pub turn: u32,
    pub self_active: Option<String>,
    pub opponent_active: Option<String>,
    pub weather: Option<String>,
    pub terrain: Option<String>,
    pub recent_history: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;

    fn new_state() -> BattleState {
        BattleState::bootstrap("battle-gen9randombattle-1", 9, "randombattle", "Me", "Them")
    }

    #[test]
    fn test_bootstrap() {
        let state = new_state();
        assert_eq!(state.turn, 0);
        assert_eq!(state.schema_version, SCHEMA_VERSION);
        assert_eq!(state.player_self.team.len(), 6);
        assert_eq!(state.player_opponent.team.len(), 6);
        assert!(state.my_side.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_with_turn_refreshes_timestamp() {
        let state = new_state();
        let before = state.timestamp;
        let state = state.with_turn(4);
        assert_eq!(state.turn, 4);
        assert!(state.timestamp >= before);
    }

    #[test]
    fn test_side_lookup_defaults_to_p1() {
        let mut state = new_state();
        assert_eq!(state.self_side(), Player::P1);
        assert_eq!(state.player(Player::P1).name, "Me");

        assert!(state.bind_self_side(Player::P2));
        assert_eq!(state.player(Player::P2).name, "Me");
        assert_eq!(state.player(Player::P1).name, "Them");
    }

    #[test]
    fn test_binding_swaps_already_folded_teams() {
        let mut state = new_state();
        state.player_self.team[0] = PokemonState::new("Charizard", 80);
        state.player_opponent.team[0] = PokemonState::new("Swampert", 80);

        state.bind_self_side(Player::P2);

        assert_eq!(state.player_self.team[0].species, "Swampert");
        assert_eq!(state.player_opponent.team[0].species, "Charizard");
    }

    #[test]
    fn test_binding_is_recorded_once() {
        let mut state = new_state();
        assert!(state.bind_self_side(Player::P1));
        assert!(!state.bind_self_side(Player::P2));
        assert_eq!(state.my_side, Some(Player::P1));
    }

    #[test]
    fn test_observed_effectiveness() {
        let mut state = new_state();
        assert_eq!(state.observed_multiplier("Swampert", "thunderbolt"), None);

        state.record_effectiveness("Swampert", "thunderbolt", 0.0);
        assert_eq!(state.observed_multiplier("Swampert", "thunderbolt"), Some(0.0));
    }

    #[test]
    fn test_summary() {
        let mut state = new_state();
        state.player_self.team[0] = PokemonState::new("Charizard", 80);
        state.field.set_weather("sun");
        state.log(HistoryEntry::new(Player::P1, ActionKind::Move, "Move: p1 used Ember"));

        let summary = state.summary();
        assert_eq!(summary.self_active.as_deref(), Some("Charizard"));
        assert_eq!(summary.weather.as_deref(), Some("sun"));
        assert_eq!(summary.recent_history, vec!["Move: p1 used Ember"]);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut state = new_state().with_turn(7);
        state.player_opponent.team[2] = PokemonState::new("Gengar", 82);
        state.player_opponent.set_active(2);
        state.record_effectiveness("Gengar", "shadowball", 2.0);
        state
            .field
            .last_actions
            .insert(Player::P2, "Shadow Ball".to_string());
        state.log(HistoryEntry::field("Turn 7"));

        let json = serde_json::to_string(&state).unwrap();
        let back: BattleState = serde_json::from_str(&json).unwrap();

        assert_eq!(back, state);
        assert_eq!(back.battle_id, "battle-gen9randombattle-1");
        assert_eq!(back.player_opponent.active_slot, 2);
    }
}
