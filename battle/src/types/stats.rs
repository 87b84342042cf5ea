//! Stat stage modifiers

use serde::{Deserialize, Serialize};
use tactician_protocol::Stat;

pub const MAX_STAGE: i8 = 6;
pub const MIN_STAGE: i8 = -6;

/// Stat stages, each held in [-6, +6]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    /// Set stage for a stat (clamped)
    pub fn set(&mut self, stat: Stat, value: i8) {
        let clamped = value.clamp(MIN_STAGE, MAX_STAGE);
        match stat {
            Stat::Atk => self.atk = clamped,
            Stat::Def => self.def = clamped,
            Stat::Spa => self.spa = clamped,
            Stat::Spd => self.spd = clamped,
            Stat::Spe => self.spe = clamped,
            Stat::Accuracy => self.accuracy = clamped,
            Stat::Evasion => self.evasion = clamped,
        }
    }

    /// Apply a stage change, returning the change actually applied
    pub fn boost(&mut self, stat: Stat, amount: i8) -> i8 {
        let current = self.get(stat);
        let next = current.saturating_add(amount).clamp(MIN_STAGE, MAX_STAGE);
        self.set(stat, next);
        next - current
    }

    pub fn unboost(&mut self, stat: Stat, amount: i8) -> i8 {
        self.boost(stat, amount.saturating_neg())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_clamps_at_cap() {
        let mut stages = StatStages::default();
        assert_eq!(stages.boost(Stat::Atk, 2), 2);

        stages.atk = 5;
        assert_eq!(stages.boost(Stat::Atk, 3), 1);
        assert_eq!(stages.atk, 6);
        assert_eq!(stages.boost(Stat::Atk, 1), 0);
    }

    #[test]
    fn test_unboost_clamps_at_floor() {
        let mut stages = StatStages::default();
        assert_eq!(stages.unboost(Stat::Def, 2), -2);

        stages.def = -5;
        assert_eq!(stages.unboost(Stat::Def, 3), -1);
        assert_eq!(stages.def, -6);
    }

    #[test]
    fn test_extreme_amounts_stay_in_bounds() {
        let mut stages = StatStages::default();
        stages.boost(Stat::Spe, i8::MAX);
        assert_eq!(stages.spe, MAX_STAGE);
        stages.unboost(Stat::Spe, i8::MIN);
        assert_eq!(stages.spe, MAX_STAGE);
        stages.boost(Stat::Spe, i8::MIN);
        assert_eq!(stages.spe, MIN_STAGE);
    }

    #[test]
    fn test_clear() {
        let mut stages = StatStages {
            atk: 3,
            evasion: -3,
            ..StatStages::default()
        };
        assert!(!stages.is_clear());
        stages.clear();
        assert!(stages.is_clear());
    }
}
