//! Battle request types
//!
//! These types represent the JSON structure of |request| messages.

use serde::{Deserialize, Deserializer};

use super::battle::{HpStatus, Player, PokemonDetails};

/// A battle request asking the player to make a decision
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    /// Request ID for synchronization
    pub rqid: Option<u64>,

    /// Active pokemon and their available moves
    #[serde(default)]
    pub active: Option<Vec<ActivePokemon>>,

    /// Information about the player's side/team
    pub side: Option<SideInfo>,

    /// Which slots need to switch
    #[serde(default)]
    pub force_switch: Option<Vec<bool>>,

    /// Whether this is team preview
    #[serde(default)]
    pub team_preview: bool,

    /// Whether we're waiting for opponent
    #[serde(default)]
    pub wait: bool,
}

impl BattleRequest {
    /// Check if this request requires a decision
    pub fn needs_decision(&self) -> bool {
        !self.wait && (self.team_preview || self.force_switch.is_some() || self.active.is_some())
    }

    /// Check if this is a force switch request
    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .as_ref()
            .map(|fs| fs.iter().any(|&b| b))
            .unwrap_or(false)
    }

    /// The first active pokemon entry (singles)
    pub fn active_pokemon(&self) -> Option<&ActivePokemon> {
        self.active.as_ref().and_then(|a| a.first())
    }

    /// Whether the active pokemon is prevented from switching
    pub fn is_trapped(&self) -> bool {
        self.active_pokemon().map(|a| !a.can_switch()).unwrap_or(false)
    }

    /// Get available pokemon to switch to
    pub fn available_switches(&self) -> Vec<&SidePokemon> {
        self.side
            .as_ref()
            .map(|s| {
                s.pokemon
                    .iter()
                    .filter(|p| !p.active && !p.is_fainted())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Information about an active pokemon in battle
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePokemon {
    /// Available moves
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    /// Whether the pokemon is trapped
    #[serde(default)]
    pub trapped: bool,

    /// Whether the pokemon might be trapped
    #[serde(default)]
    pub maybe_trapped: bool,
}

impl ActivePokemon {
    /// Get moves that are not disabled
    pub fn available_moves(&self) -> impl Iterator<Item = (usize, &MoveSlot)> {
        self.moves.iter().enumerate().filter(|(_, m)| !m.disabled)
    }

    /// Check if the pokemon can switch out
    pub fn can_switch(&self) -> bool {
        !self.trapped && !self.maybe_trapped
    }
}

/// A move slot on an active pokemon
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoveSlot {
    /// Display name of the move
    #[serde(rename = "move", default)]
    pub name: String,

    /// Move ID (lowercase, no spaces)
    #[serde(default)]
    pub id: String,

    /// Current PP
    #[serde(default)]
    pub pp: Option<u32>,

    /// Maximum PP
    #[serde(rename = "maxpp", default)]
    pub max_pp: Option<u32>,

    /// Whether the move is disabled (the server may send a reason string instead of `true`)
    #[serde(default, deserialize_with = "deserialize_disabled")]
    pub disabled: bool,
}

fn deserialize_disabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => false,
    })
}

/// Information about the player's side
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideInfo {
    /// Player's display name
    #[serde(default)]
    pub name: String,

    /// Player ID (p1, p2)
    #[serde(default)]
    pub id: String,

    /// Pokemon on this side
    #[serde(default)]
    pub pokemon: Vec<SidePokemon>,
}

impl SideInfo {
    /// Get the player enum
    pub fn player(&self) -> Option<Player> {
        Player::parse(&self.id)
    }
}

/// A pokemon on the player's side
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePokemon {
    /// Pokemon identifier (e.g., "p1: Pikachu")
    #[serde(default)]
    pub ident: String,

    /// Details string (species, level, gender, shiny)
    #[serde(default)]
    pub details: String,

    /// Current condition (HP/MaxHP status)
    #[serde(default)]
    pub condition: String,

    /// Whether this pokemon is currently active
    #[serde(default)]
    pub active: bool,

    /// Known moves (ids)
    #[serde(default)]
    pub moves: Vec<String>,

    /// Base ability
    #[serde(default)]
    pub base_ability: Option<String>,

    /// Current ability
    #[serde(default)]
    pub ability: Option<String>,

    /// Held item
    #[serde(default)]
    pub item: Option<String>,
}

impl SidePokemon {
    /// Check if the pokemon is fainted
    pub fn is_fainted(&self) -> bool {
        self.condition.contains("fnt")
    }

    /// Parsed HP and status from the condition string
    pub fn hp_status(&self) -> HpStatus {
        if self.condition.trim().is_empty() {
            return HpStatus::default();
        }
        HpStatus::parse(&self.condition)
    }

    /// Parsed details string
    pub fn parsed_details(&self) -> PokemonDetails {
        PokemonDetails::parse(&self.details)
    }

    /// Get the species name from details
    pub fn species(&self) -> &str {
        self.details.split(',').next().unwrap_or(&self.details).trim()
    }

    /// Revealed ability, preferring the current one over the base one
    pub fn known_ability(&self) -> Option<&str> {
        self.ability
            .as_deref()
            .or(self.base_ability.as_deref())
            .filter(|a| !a.is_empty())
    }

    /// Held item, if any
    pub fn known_item(&self) -> Option<&str> {
        self.item.as_deref().filter(|i| !i.is_empty())
    }
}
