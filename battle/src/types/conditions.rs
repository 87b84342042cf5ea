//! Side conditions: hazards, screens and tailwind

use serde::{Deserialize, Serialize};

pub const MAX_SPIKES: u8 = 3;
pub const MAX_TOXIC_SPIKES: u8 = 2;
pub const REFLECT_TURNS: u8 = 8;
pub const LIGHT_SCREEN_TURNS: u8 = 8;
pub const AURORA_VEIL_TURNS: u8 = 5;
pub const TAILWIND_TURNS: u8 = 4;
pub const TRICK_ROOM_TURNS: u8 = 5;

/// Side conditions the tracker models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    AuroraVeil,
    Spikes,
    ToxicSpikes,
    StealthRock,
    StickyWeb,
    Tailwind,
    /// Field-wide, but some servers announce it on a side
    TrickRoom,
}

impl SideCondition {
    /// Parse from protocol string ("move: Stealth Rock", "Spikes", "toxicspikes", ...)
    pub fn from_protocol(s: &str) -> Option<Self> {
        let clean = s.trim();
        let clean = clean.strip_prefix("move:").unwrap_or(clean);
        let normalized = clean.to_lowercase().replace([' ', '-', '_'], "");

        match normalized.as_str() {
            "reflect" => Some(SideCondition::Reflect),
            "lightscreen" => Some(SideCondition::LightScreen),
            "auroraveil" => Some(SideCondition::AuroraVeil),
            "spikes" => Some(SideCondition::Spikes),
            "toxicspikes" => Some(SideCondition::ToxicSpikes),
            "stealthrock" => Some(SideCondition::StealthRock),
            "stickyweb" => Some(SideCondition::StickyWeb),
            "tailwind" => Some(SideCondition::Tailwind),
            "trickroom" => Some(SideCondition::TrickRoom),
            _ => None,
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(
            self,
            SideCondition::Spikes
                | SideCondition::ToxicSpikes
                | SideCondition::StealthRock
                | SideCondition::StickyWeb
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::AuroraVeil => "Aurora Veil",
            SideCondition::Spikes => "Spikes",
            SideCondition::ToxicSpikes => "Toxic Spikes",
            SideCondition::StealthRock => "Stealth Rock",
            SideCondition::StickyWeb => "Sticky Web",
            SideCondition::Tailwind => "Tailwind",
            SideCondition::TrickRoom => "Trick Room",
        }
    }
}

impl std::fmt::Display for SideCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry hazards on one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideHazards {
    pub stealth_rock: bool,
    pub spikes_layers: u8,
    pub toxic_spikes_layers: u8,
    pub sticky_web: bool,
}

impl SideHazards {
    /// Add a layer or set a flag. Layer counts saturate at their maximum.
    pub fn add(&mut self, condition: SideCondition) {
        match condition {
            SideCondition::StealthRock => self.stealth_rock = true,
            SideCondition::StickyWeb => self.sticky_web = true,
            SideCondition::Spikes => {
                self.spikes_layers = self.spikes_layers.saturating_add(1).min(MAX_SPIKES)
            }
            SideCondition::ToxicSpikes => {
                self.toxic_spikes_layers =
                    self.toxic_spikes_layers.saturating_add(1).min(MAX_TOXIC_SPIKES)
            }
            _ => {}
        }
    }

    /// Remove a hazard entirely (Rapid Spin, Defog and friends clear every layer)
    pub fn remove(&mut self, condition: SideCondition) {
        match condition {
            SideCondition::StealthRock => self.stealth_rock = false,
            SideCondition::StickyWeb => self.sticky_web = false,
            SideCondition::Spikes => self.spikes_layers = 0,
            SideCondition::ToxicSpikes => self.toxic_spikes_layers = 0,
            _ => {}
        }
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

/// Screen turn counters on one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreensState {
    pub reflect_turns: u8,
    pub light_screen_turns: u8,
    pub aurora_veil_turns: u8,
}

impl ScreensState {
    pub fn set(&mut self, condition: SideCondition, active: bool) {
        match condition {
            SideCondition::Reflect => {
                self.reflect_turns = if active { REFLECT_TURNS } else { 0 }
            }
            SideCondition::LightScreen => {
                self.light_screen_turns = if active { LIGHT_SCREEN_TURNS } else { 0 }
            }
            SideCondition::AuroraVeil => {
                self.aurora_veil_turns = if active { AURORA_VEIL_TURNS } else { 0 }
            }
            _ => {}
        }
    }

    pub fn any_active(&self) -> bool {
        self.reflect_turns > 0 || self.light_screen_turns > 0 || self.aurora_veil_turns > 0
    }
}

/// Everything bound to one side of the field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideConditions {
    pub hazards: SideHazards,
    pub screens: ScreensState,
    pub tailwind_turns: u8,
}

impl SideConditions {
    /// Apply a `-sidestart` (`active = true`) or `-sideend` for a side-bound condition
    pub fn apply(&mut self, condition: SideCondition, active: bool) {
        match condition {
            c if c.is_hazard() => {
                if active {
                    self.hazards.add(c)
                } else {
                    self.hazards.remove(c)
                }
            }
            SideCondition::Reflect | SideCondition::LightScreen | SideCondition::AuroraVeil => {
                self.screens.set(condition, active)
            }
            SideCondition::Tailwind => {
                self.tailwind_turns = if active { TAILWIND_TURNS } else { 0 }
            }
            _ => {}
        }
    }
}
