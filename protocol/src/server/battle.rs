//! Shared types for battle protocol messages

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Player side in a two-player battle (p1, p2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            _ => None,
        }
    }

    /// Resolve a side from the prefix of a side or slot token ("p2: Name", "p1a").
    ///
    /// Anything that does not start with `p2` resolves to [`Player::P1`].
    pub fn from_prefix(s: &str) -> Self {
        if s.trim_start().starts_with("p2") {
            Player::P2
        } else {
            Player::P1
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pokemon identifier in the form "POSITION: NAME" (e.g., "p1a: Pikachu")
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonRef {
    /// Side that owns this pokemon
    pub player: Player,
    /// Slot index from the position letter (a = 0, b = 1, ...), 0 when absent
    pub slot: usize,
    /// Label after the colon (nickname or species)
    pub name: String,
}

impl PokemonRef {
    /// Parse a pokemon ID string like "p1a: Pikachu" or "p1: Pikachu"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let (pos_part, name) = match s.split_once(':') {
            Some((pos, name)) => (pos.trim(), name.trim()),
            None => (s, ""),
        };

        let player = Player::from_prefix(pos_part);
        let slot = pos_part
            .chars()
            .nth(2)
            .filter(|c| c.is_ascii_lowercase())
            .map(position_to_slot)
            .unwrap_or(0);

        Some(PokemonRef {
            player,
            slot,
            name: name.to_string(),
        })
    }
}

/// Convert a position letter to a slot index ('a' = 0, 'b' = 1, ...)
pub fn position_to_slot(pos: char) -> usize {
    if pos.is_ascii_lowercase() {
        (pos as u8 - b'a') as usize
    } else {
        0
    }
}

/// Species and level from a details string.
///
/// Gender, shininess and tera type are skipped; nothing downstream reads them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PokemonDetails {
    pub species: String,
    pub level: Option<u8>,
}

impl PokemonDetails {
    /// Parse a details string like "Pikachu, L50, M, shiny" or "Arceus-*"
    pub fn parse(s: &str) -> Self {
        let mut details = PokemonDetails::default();
        let mut parts = s.split(',').map(str::trim);

        if let Some(species) = parts.next() {
            details.species = species.to_string();
        }

        details.level = parts.find_map(|part| part.strip_prefix('L')?.parse().ok());

        details
    }
}

/// HP and status condition (e.g., "100/100", "50/100 slp", "0 fnt", "73")
#[derive(Debug, Clone, PartialEq)]
pub struct HpStatus {
    /// Remaining HP as a fraction in [0.0, 1.0]
    pub fraction: f64,
    /// Status suffix (slp, par, brn, psn, tox, frz), never "fnt"
    pub status: Option<String>,
    /// Whether the token carried the fainted marker or zero HP
    pub fainted: bool,
}

impl HpStatus {
    /// Parse an HP token. Malformed input reads as full HP.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split_whitespace();
        let hp_part = parts.next().unwrap_or("");
        let suffix = parts.next();

        if hp_part == "fnt" || suffix == Some("fnt") || s.contains("fnt") {
            return HpStatus {
                fraction: 0.0,
                status: None,
                fainted: true,
            };
        }

        let fraction = parse_hp_fraction(hp_part);
        HpStatus {
            fraction,
            status: suffix.map(str::to_string),
            fainted: fraction <= 0.0,
        }
    }
}

impl Default for HpStatus {
    fn default() -> Self {
        HpStatus {
            fraction: 1.0,
            status: None,
            fainted: false,
        }
    }
}

fn parse_hp_fraction(hp: &str) -> f64 {
    if let Some((current, max)) = hp.split_once('/') {
        let current = current.trim().trim_end_matches('%').parse::<f64>();
        let max = max.trim().trim_end_matches('%').parse::<f64>();
        return match (current, max) {
            (Ok(current), Ok(max)) if max > 0.0 => (current / max).clamp(0.0, 1.0),
            _ => 1.0,
        };
    }

    match hp.trim_end_matches('%').parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let value = if value > 1.0 { value / 100.0 } else { value };
            value.clamp(0.0, 1.0)
        }
        _ => 1.0,
    }
}

/// Stat abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" | "acc" => Some(Stat::Accuracy),
            "evasion" | "eva" => Some(Stat::Evasion),
            _ => None,
        }
    }
}

/// Canonicalize text to a Showdown ID (lowercase ASCII alphanumerics only)
pub fn to_id(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Strip an effect prefix such as "move: " from a protocol effect string
pub fn strip_effect_prefix<'a>(effect: &'a str, prefix: &str) -> Option<&'a str> {
    effect
        .trim()
        .strip_prefix(prefix)
        .map(|rest| rest.trim_start_matches(':').trim())
}

/// Helper to parse a PokemonRef from message parts
pub fn parse_pokemon(parts: &[&str], index: usize) -> Result<PokemonRef, ParseError> {
    parts
        .get(index)
        .and_then(|s| PokemonRef::parse(s))
        .ok_or_else(|| ParseError::MissingField("pokemon".to_string()))
}

/// Helper to parse PokemonDetails from message parts
pub fn parse_details(parts: &[&str], index: usize) -> Result<PokemonDetails, ParseError> {
    parts
        .get(index)
        .map(|s| PokemonDetails::parse(s))
        .filter(|d| !d.species.is_empty())
        .ok_or_else(|| ParseError::MissingField("details".to_string()))
}

/// Helper to parse HpStatus from message parts
pub fn parse_hp_status(parts: &[&str], index: usize) -> HpStatus {
    parts.get(index).map(|s| HpStatus::parse(s)).unwrap_or_default()
}

/// Helper to fetch a required non-empty text field
pub fn required(parts: &[&str], index: usize, field: &str) -> Result<String, ParseError> {
    parts
        .get(index)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_ref_parse() {
        let poke = PokemonRef::parse("p2a: Swampert").unwrap();
        assert_eq!(poke.player, Player::P2);
        assert_eq!(poke.slot, 0);
        assert_eq!(poke.name, "Swampert");

        let poke = PokemonRef::parse("p1b: Mr. Mime").unwrap();
        assert_eq!(poke.player, Player::P1);
        assert_eq!(poke.slot, 1);
        assert_eq!(poke.name, "Mr. Mime");
    }

    #[test]
    fn test_pokemon_ref_unknown_side_defaults_to_p1() {
        let poke = PokemonRef::parse("p9c: Ditto").unwrap();
        assert_eq!(poke.player, Player::P1);
        assert_eq!(poke.slot, 2);
        assert!(PokemonRef::parse("").is_none());
    }

    #[test]
    fn test_side_prefix() {
        assert_eq!(Player::from_prefix("p2: opp"), Player::P2);
        assert_eq!(Player::from_prefix("p1: me"), Player::P1);
        assert_eq!(Player::from_prefix("spectator"), Player::P1);
    }

    #[test]
    fn test_details_parse() {
        let details = PokemonDetails::parse("Charizard, L80, F, shiny");
        assert_eq!(details.species, "Charizard");
        assert_eq!(details.level, Some(80));

        let details = PokemonDetails::parse("Ogerpon-Wellspring, F, tera:Water");
        assert_eq!(details.species, "Ogerpon-Wellspring");
        assert_eq!(details.level, None);
    }

    #[test]
    fn test_hp_status_fraction() {
        assert_eq!(HpStatus::parse("50/100").fraction, 0.5);
        assert_eq!(HpStatus::parse("150/100").fraction, 1.0);
        assert_eq!(HpStatus::parse("73").fraction, 0.73);
        assert_eq!(HpStatus::parse("40%").fraction, 0.4);
        assert_eq!(HpStatus::parse("0.25").fraction, 0.25);
    }

    #[test]
    fn test_hp_status_with_suffix() {
        let hp = HpStatus::parse("50/100 par");
        assert_eq!(hp.fraction, 0.5);
        assert_eq!(hp.status.as_deref(), Some("par"));
        assert!(!hp.fainted);
    }

    #[test]
    fn test_hp_status_fainted() {
        let hp = HpStatus::parse("0 fnt");
        assert_eq!(hp.fraction, 0.0);
        assert!(hp.fainted);
        assert!(hp.status.is_none());

        assert!(HpStatus::parse("fnt").fainted);
        assert!(HpStatus::parse("0/100").fainted);
    }

    #[test]
    fn test_hp_status_malformed_is_full() {
        assert_eq!(HpStatus::parse("abc").fraction, 1.0);
        assert_eq!(HpStatus::parse("x/y").fraction, 1.0);
        assert_eq!(HpStatus::parse("5/0").fraction, 1.0);
        assert_eq!(HpStatus::parse("").fraction, 1.0);
    }

    #[test]
    fn test_to_id() {
        assert_eq!(to_id("Flamethrower"), "flamethrower");
        assert_eq!(to_id("U-turn"), "uturn");
        assert_eq!(to_id("Will-O-Wisp"), "willowisp");
        assert_eq!(to_id("thunder-wave"), "thunderwave");
    }

    #[test]
    fn test_strip_effect_prefix() {
        assert_eq!(strip_effect_prefix("move: Stealth Rock", "move"), Some("Stealth Rock"));
        assert_eq!(strip_effect_prefix("ability: Sturdy", "move"), None);
    }
}
