//! Pokemon state types

use serde::{Deserialize, Serialize};
use tactician_protocol::{HpStatus, to_id};

use super::pokemon_type::Type;
use super::stats::StatStages;
use super::status::{PokemonVolatile, Status};

/// Species prefix of slots nothing has been revealed for yet
pub const PLACEHOLDER_PREFIX: &str = "unknown";

pub const DEFAULT_LEVEL: u8 = 100;

/// Pokemon state during battle.
///
/// Revealed information (moves, item, ability) only ever accumulates;
/// on-field state (boosts, volatiles) is dropped when the Pokemon leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonState {
    /// Species name (including forme, e.g., "Pikachu-Alola")
    pub species: String,

    pub level: u8,

    /// Zero, one or two types; empty until known
    pub types: Vec<Type>,

    /// Remaining HP in [0.0, 1.0]
    pub hp_fraction: f64,

    pub status: Option<Status>,

    pub fainted: bool,

    pub boosts: StatStages,

    pub volatiles: PokemonVolatile,

    pub item: Option<String>,

    pub ability: Option<String>,

    /// Moves revealed so far, by display name, in reveal order
    pub moves_known: Vec<String>,

    pub last_move: Option<String>,

    pub active: bool,
}

impl PokemonState {
    pub fn new(species: impl Into<String>, level: u8) -> Self {
        Self {
            species: species.into(),
            level,
            types: Vec::new(),
            hp_fraction: 1.0,
            status: None,
            fainted: false,
            boosts: StatStages::default(),
            volatiles: PokemonVolatile::default(),
            item: None,
            ability: None,
            moves_known: Vec::new(),
            last_move: None,
            active: false,
        }
    }

    /// Placeholder for team slot `index` (0-based), named "unknown-{index+1}"
    pub fn unknown(index: usize) -> Self {
        Self::new(format!("{PLACEHOLDER_PREFIX}-{}", index + 1), DEFAULT_LEVEL)
    }

    /// Six placeholders, the state of a team nothing is known about
    pub fn empty_team() -> Vec<Self> {
        (0..6).map(Self::unknown).collect()
    }

    pub fn is_placeholder(&self) -> bool {
        self.species
            .strip_prefix(PLACEHOLDER_PREFIX)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
    }

    /// Record a revealed move, deduplicated by id
    pub fn record_move(&mut self, move_name: &str) {
        let id = to_id(move_name);
        if id.is_empty() {
            return;
        }
        if !self.moves_known.iter().any(|m| to_id(m) == id) {
            self.moves_known.push(move_name.to_string());
        }
        self.last_move = Some(move_name.to_string());
    }

    pub fn knows_move(&self, move_name: &str) -> bool {
        let id = to_id(move_name);
        self.moves_known.iter().any(|m| to_id(m) == id)
    }

    /// Record a revealed item, replacing any earlier reveal
    pub fn record_item(&mut self, item: &str) {
        let item = item.trim();
        if !item.is_empty() {
            self.item = Some(item.to_string());
        }
    }

    /// Record a revealed ability, replacing any earlier reveal
    pub fn record_ability(&mut self, ability: &str) {
        let ability = ability.trim();
        if !ability.is_empty() {
            self.ability = Some(ability.to_string());
        }
    }

    /// Set HP from a parsed token; a status suffix on the token replaces the status
    pub fn apply_hp_status(&mut self, hp: &HpStatus) {
        self.hp_fraction = hp.fraction.clamp(0.0, 1.0);
        self.fainted = hp.fainted || self.hp_fraction <= 0.0;
        if self.fainted {
            self.hp_fraction = 0.0;
            self.status = None;
        } else if let Some(status) = hp.status.as_deref().and_then(Status::from_protocol) {
            self.status = Some(status);
        }
    }

    pub fn faint(&mut self) {
        self.hp_fraction = 0.0;
        self.fainted = true;
        self.status = None;
    }

    /// Called when this Pokemon leaves the field
    pub fn on_switch_out(&mut self) {
        self.active = false;
        self.boosts.clear();
        self.volatiles = PokemonVolatile::default();
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp_fraction > 0.0
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.types.contains(&t)
    }
}

impl Default for PokemonState {
    fn default() -> Self {
        Self::unknown(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        let team = PokemonState::empty_team();
        assert_eq!(team.len(), 6);
        assert_eq!(team[0].species, "unknown-1");
        assert_eq!(team[5].species, "unknown-6");
        assert!(team.iter().all(PokemonState::is_placeholder));
        assert!(!PokemonState::new("Unown", 80).is_placeholder());
    }

    #[test]
    fn test_record_move_dedupes_by_id() {
        let mut state = PokemonState::new("Scizor", 80);
        state.record_move("U-turn");
        state.record_move("Bullet Punch");
        state.record_move("uturn");

        assert_eq!(state.moves_known, vec!["U-turn", "Bullet Punch"]);
        assert_eq!(state.last_move.as_deref(), Some("uturn"));
        assert!(state.knows_move("u turn"));
    }

    #[test]
    fn test_record_item_never_clears() {
        let mut state = PokemonState::new("Scizor", 80);
        state.record_item("Choice Band");
        state.record_item("");
        assert_eq!(state.item.as_deref(), Some("Choice Band"));

        state.record_item("Life Orb");
        assert_eq!(state.item.as_deref(), Some("Life Orb"));
    }

    #[test]
    fn test_apply_hp_status() {
        let mut state = PokemonState::new("Test", 100);
        state.apply_hp_status(&HpStatus::parse("50/100 par"));
        assert_eq!(state.hp_fraction, 0.5);
        assert_eq!(state.status, Some(Status::Paralysis));
        assert!(!state.fainted);

        state.apply_hp_status(&HpStatus::parse("40/100"));
        assert_eq!(state.status, Some(Status::Paralysis));

        state.apply_hp_status(&HpStatus::parse("0 fnt"));
        assert!(state.fainted);
        assert_eq!(state.hp_fraction, 0.0);
        assert!(state.status.is_none());
    }

    #[test]
    fn test_switch_out_keeps_revealed_info() {
        let mut state = PokemonState::new("Test", 100);
        state.active = true;
        state.boosts.atk = 2;
        state.volatiles.confusion = true;
        state.record_move("Tackle");
        state.record_ability("Intimidate");

        state.on_switch_out();

        assert!(!state.active);
        assert!(state.boosts.is_clear());
        assert!(state.volatiles.is_clear());
        assert_eq!(state.moves_known, vec!["Tackle"]);
        assert_eq!(state.ability.as_deref(), Some("Intimidate"));
    }
}
