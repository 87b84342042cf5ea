//! Status conditions (volatile and non-volatile)

use serde::{Deserialize, Serialize};
use tactician_protocol::to_id;

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "brn")]
    Burn,
    #[serde(rename = "frz")]
    Freeze,
    #[serde(rename = "par")]
    Paralysis,
    #[serde(rename = "psn")]
    Poison,
    #[serde(rename = "tox")]
    BadPoison,
    #[serde(rename = "slp")]
    Sleep,
}

impl Status {
    /// Parse from protocol string ("brn", "frz", "par", "psn", "tox", "slp")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s.trim() {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::BadPoison),
            "slp" => Some(Status::Sleep),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_protocol())
    }
}

/// Volatile effects the tracker keeps flags for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatileEffect {
    Substitute,
    Confusion,
    Taunt,
    Torment,
    Encore,
    Disable,
    LeechSeed,
    /// Perish Song with the announced count (3..0)
    Perish(u8),
}

impl VolatileEffect {
    /// Parse a `-start`/`-end` effect ("move: Taunt", "Substitute", "perish2", ...)
    pub fn from_protocol(effect: &str) -> Option<Self> {
        let full = to_id(effect);
        let id = full
            .strip_prefix("move")
            .filter(|rest| !rest.is_empty() && effect.contains(':'))
            .unwrap_or(full.as_str());

        match id {
            "substitute" => Some(VolatileEffect::Substitute),
            "confusion" => Some(VolatileEffect::Confusion),
            "taunt" => Some(VolatileEffect::Taunt),
            "torment" => Some(VolatileEffect::Torment),
            "encore" => Some(VolatileEffect::Encore),
            "disable" => Some(VolatileEffect::Disable),
            "leechseed" => Some(VolatileEffect::LeechSeed),
            "perishsong" => Some(VolatileEffect::Perish(3)),
            other => other
                .strip_prefix("perish")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| *n <= 3)
                .map(VolatileEffect::Perish),
        }
    }
}

/// Volatile flags of one Pokemon (cleared on switch out)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonVolatile {
    pub substitute: bool,
    pub confusion: bool,
    pub taunt: bool,
    pub torment: bool,
    pub encore: bool,
    pub disable: bool,
    pub leech_seeded: bool,
    pub perish_song_active: bool,
    pub perish_song_count: u8,
}

impl PokemonVolatile {
    pub fn start(&mut self, effect: VolatileEffect) {
        self.set(effect, true);
    }

    pub fn end(&mut self, effect: VolatileEffect) {
        self.set(effect, false);
    }

    fn set(&mut self, effect: VolatileEffect, on: bool) {
        match effect {
            VolatileEffect::Substitute => self.substitute = on,
            VolatileEffect::Confusion => self.confusion = on,
            VolatileEffect::Taunt => self.taunt = on,
            VolatileEffect::Torment => self.torment = on,
            VolatileEffect::Encore => self.encore = on,
            VolatileEffect::Disable => self.disable = on,
            VolatileEffect::LeechSeed => self.leech_seeded = on,
            VolatileEffect::Perish(count) => {
                self.perish_song_active = on;
                self.perish_song_count = if on { count } else { 0 };
            }
        }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}
