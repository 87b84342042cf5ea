//! Global field state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactician_protocol::{Player, to_id};

use super::conditions::{SideCondition, SideConditions, TRICK_ROOM_TURNS};

/// Per-side conditions, addressed by protocol side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideFields {
    pub p1: SideConditions,
    pub p2: SideConditions,
}

impl SideFields {
    pub fn get(&self, side: Player) -> &SideConditions {
        match side {
            Player::P1 => &self.p1,
            Player::P2 => &self.p2,
        }
    }

    pub fn get_mut(&mut self, side: Player) -> &mut SideConditions {
        match side {
            Player::P1 => &mut self.p1,
            Player::P2 => &mut self.p2,
        }
    }
}

/// Global field state affecting both sides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    /// Weather as announced ("SunnyDay", "sun", ...); `None` when clear
    pub weather: Option<String>,

    pub terrain: Option<String>,

    pub trick_room_turns: u8,

    pub sides: SideFields,

    /// Other field-wide effects by id ("gravity", "magicroom", ...), in start order
    pub field_effects: Vec<String>,

    /// Last move name used by each side
    pub last_actions: BTreeMap<Player, String>,
}

impl FieldState {
    pub fn side(&self, side: Player) -> &SideConditions {
        self.sides.get(side)
    }

    /// Overwrite weather; "none" or an empty value clears it
    pub fn set_weather(&mut self, weather: &str) {
        let weather = weather.trim();
        self.weather = if weather.is_empty() || weather.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(weather.to_string())
        };
    }

    pub fn set_terrain(&mut self, terrain: &str) {
        let terrain = terrain.trim();
        self.terrain = if terrain.is_empty() || terrain.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(terrain.to_string())
        };
    }

    /// Apply a `-sidestart`/`-sideend` condition to one side.
    ///
    /// Returns false when the condition is not one the tracker models.
    pub fn apply_side_condition(&mut self, side: Player, condition: &str, active: bool) -> bool {
        match SideCondition::from_protocol(condition) {
            Some(SideCondition::TrickRoom) => {
                self.trick_room_turns = if active { TRICK_ROOM_TURNS } else { 0 };
                true
            }
            Some(cond) => {
                self.sides.get_mut(side).apply(cond, active);
                true
            }
            None => false,
        }
    }

    /// Apply a field start condition from protocol
    pub fn apply_field_start(&mut self, condition: &str) {
        let clean = strip_move_prefix(condition);
        let id = to_id(clean);

        match id.as_str() {
            "trickroom" => self.trick_room_turns = TRICK_ROOM_TURNS,
            t if t.ends_with("terrain") => self.terrain = Some(clean.to_string()),
            "" => {}
            _ => {
                if !self.field_effects.contains(&id) {
                    self.field_effects.push(id.clone());
                }
            }
        }
    }

    /// Apply a field end condition from protocol
    pub fn apply_field_end(&mut self, condition: &str) {
        let id = to_id(strip_move_prefix(condition));

        match id.as_str() {
            "trickroom" => self.trick_room_turns = 0,
            t if t.ends_with("terrain") => self.terrain = None,
            _ => self.field_effects.retain(|e| *e != id),
        }
    }
}

fn strip_move_prefix(condition: &str) -> &str {
    let trimmed = condition.trim();
    trimmed
        .strip_prefix("move:")
        .map(str::trim)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_none_clears() {
        let mut field = FieldState::default();
        field.set_weather("RainDance");
        assert_eq!(field.weather.as_deref(), Some("RainDance"));

        field.set_weather("none");
        assert!(field.weather.is_none());
    }

    #[test]
    fn test_apply_field_start_terrain_and_rooms() {
        let mut field = FieldState::default();
        field.apply_field_start("move: Electric Terrain");
        assert_eq!(field.terrain.as_deref(), Some("Electric Terrain"));

        field.apply_field_start("move: Trick Room");
        assert_eq!(field.trick_room_turns, 5);

        field.apply_field_start("move: Gravity");
        field.apply_field_start("move: Gravity");
        assert_eq!(field.field_effects, vec!["gravity"]);
    }

    #[test]
    fn test_apply_field_end() {
        let mut field = FieldState::default();
        field.apply_field_start("move: Psychic Terrain");
        field.apply_field_start("move: Trick Room");
        field.apply_field_start("move: Magic Room");

        field.apply_field_end("move: Psychic Terrain");
        field.apply_field_end("move: Trick Room");
        field.apply_field_end("Magic Room");

        assert!(field.terrain.is_none());
        assert_eq!(field.trick_room_turns, 0);
        assert!(field.field_effects.is_empty());
    }

    #[test]
    fn test_side_conditions_are_per_side() {
        let mut field = FieldState::default();
        assert!(field.apply_side_condition(Player::P2, "move: Stealth Rock", true));
        assert!(field.apply_side_condition(Player::P1, "Reflect", true));
        assert!(!field.apply_side_condition(Player::P1, "Safeguard", true));

        assert!(field.side(Player::P2).hazards.stealth_rock);
        assert!(!field.side(Player::P1).hazards.stealth_rock);
        assert_eq!(field.side(Player::P1).screens.reflect_turns, 8);
    }

    #[test]
    fn test_trick_room_on_side_sets_field_counter() {
        let mut field = FieldState::default();
        field.apply_side_condition(Player::P1, "Trick Room", true);
        assert_eq!(field.trick_room_turns, 5);
        field.apply_side_condition(Player::P2, "Trick Room", false);
        assert_eq!(field.trick_room_turns, 0);
    }
}
