//! One-ply lookahead: score an action net of the opponent's best reply

use tactician_battle::{BattleState, PokemonState};

use crate::PolicyError;
use crate::actions::Action;
use crate::evaluator::{Evaluator, STAB};
use crate::knowledge::KnowledgeBase;
use crate::policy::{ActionInsight, Decision, Policy, candidates};

/// Base power assumed for an unrevealed move of each opponent type
pub const GENERIC_BASE_POWER: f64 = 80.0;

/// Moves after which an opponent's moveset counts as fully revealed
pub const FULL_MOVESET: usize = 4;

pub const DEFAULT_RISK_AVERSION: f64 = 1.0;

/// Ranks actions by evaluator score minus the damage we expect to take back.
///
/// Hidden opponent moves are covered by assuming one same-type move per
/// opponent type until four moves have been seen.
pub struct LookaheadPolicy<K: KnowledgeBase + ?Sized> {
    evaluator: Evaluator<K>,
    risk_aversion: f64,
}

impl<K: KnowledgeBase + ?Sized> LookaheadPolicy<K> {
    pub fn new(evaluator: Evaluator<K>, risk_aversion: f64) -> Self {
        Self {
            evaluator,
            risk_aversion,
        }
    }

    pub fn evaluator(&self) -> &Evaluator<K> {
        &self.evaluator
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Largest fraction of HP the opponent's active is expected to take from
    /// whichever of our Pokemon is on the field after `action`
    pub fn anticipate_incoming_damage(&self, state: &BattleState, action: &Action) -> f64 {
        let (Some(defender), Some(attacker)) = (facing_reply(state, action), state.opponent_active())
        else {
            return 0.0;
        };

        let known = attacker
            .moves_known
            .iter()
            .map(|m| self.evaluator.estimate_damage(state, attacker, defender, m))
            .fold(0.0, f64::max);

        let generic = if attacker.moves_known.len() < FULL_MOVESET {
            let knowledge = self.evaluator.knowledge();
            attacker
                .types
                .iter()
                .map(|t| {
                    GENERIC_BASE_POWER * STAB * knowledge.effectiveness_against(*t, &defender.types)
                        / 100.0
                })
                .fold(0.0, f64::max)
        } else {
            0.0
        };

        known.max(generic)
    }
}

/// Our Pokemon that takes the opponent's reply to `action`
fn facing_reply<'a>(state: &'a BattleState, action: &Action) -> Option<&'a PokemonState> {
    match action {
        Action::Switch(species) => state
            .player_self
            .team
            .iter()
            .find(|p| p.species.eq_ignore_ascii_case(species))
            .or_else(|| state.self_active()),
        _ => state.self_active(),
    }
}

impl<K: KnowledgeBase + ?Sized> Policy for LookaheadPolicy<K> {
    fn choose(&self, state: &BattleState, legal: Option<&[Action]>) -> Result<Decision, PolicyError> {
        let insights = candidates(state, legal)?
            .into_iter()
            .map(|action| {
                let breakdown = self.evaluator.explain(state, &action);
                let risk = self.anticipate_incoming_damage(state, &action);
                let score = breakdown.score - self.risk_aversion * risk;

                let mut named = breakdown.to_map();
                named.insert("base_score".to_string(), breakdown.score);
                named.insert("anticipated_risk".to_string(), risk);
                named.insert("final_score".to_string(), score);

                ActionInsight {
                    action,
                    score,
                    breakdown: named,
                }
            })
            .collect();

        Decision::from_insights(insights)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::evaluator::EvalWeights;
    use crate::knowledge::{Dex, MoveCategory, MoveData, TypeChart};
    use tactician_battle::Type;

    fn dex() -> Dex {
        Dex::new()
            .with_type_chart(TypeChart::neutral().with(Type::Fire, Type::Grass, 2.0))
            .with_move(MoveData::new("Ember", Type::Fire, MoveCategory::Special, Some(40)))
            .with_move(MoveData::new("Flamethrower", Type::Fire, MoveCategory::Special, Some(90)))
            .with_move(MoveData::new("Water Gun", Type::Water, MoveCategory::Special, Some(40)))
    }

    fn policy() -> LookaheadPolicy<Dex> {
        LookaheadPolicy::new(
            Evaluator::new(EvalWeights::default(), Arc::new(dex())),
            DEFAULT_RISK_AVERSION,
        )
    }

    /// Grass active, water bench, fire opponent with nothing revealed
    fn state() -> BattleState {
        let mut state = BattleState::bootstrap("battle-1", 9, "randombattle", "Me", "Them");

        let mut grass = PokemonState::new("Bulbasaur", 50);
        grass.types = vec![Type::Grass];
        state.player_self.team[0] = grass;
        let mut water = PokemonState::new("Squirtle", 50);
        water.types = vec![Type::Water];
        water.record_move("Water Gun");
        state.player_self.team[1] = water;
        state.player_self.set_active(0);

        let mut fire = PokemonState::new("Charmander", 50);
        fire.types = vec![Type::Fire];
        state.player_opponent.team[0] = fire;
        state.player_opponent.set_active(0);

        state
    }

    #[test]
    fn test_generic_stab_fallback() {
        let risk = policy().anticipate_incoming_damage(&state(), &Action::Slot(1));
        assert!((risk - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_switch_target_takes_the_hit() {
        let risk = policy().anticipate_incoming_damage(&state(), &Action::switch_to("Squirtle"));
        assert!((risk - 1.2).abs() < 1e-9);

        let risk = policy().anticipate_incoming_damage(&state(), &Action::switch_to("Missingno"));
        assert!((risk - 2.4).abs() < 1e-9);
    }

    #[test]
    fn test_known_moves_count_toward_risk() {
        let mut state = state();
        state.player_opponent.team[0].record_move("Flamethrower");

        let risk = policy().anticipate_incoming_damage(&state, &Action::Slot(1));
        assert!((risk - 90.0 * 1.5 * 2.0 / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_moveset_drops_generic_estimate() {
        let mut state = state();
        let opponent = &mut state.player_opponent.team[0];
        for name in ["Ember", "Growl", "Scratch", "Smokescreen"] {
            opponent.record_move(name);
        }

        let risk = policy().anticipate_incoming_damage(&state, &Action::Slot(1));
        assert!((risk - 40.0 * 1.5 * 2.0 / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_lookahead_prefers_switching_out_of_danger() {
        let decision = policy()
            .choose(
                &state(),
                Some(&[Action::Slot(1), Action::switch_to("Squirtle")][..]),
            )
            .unwrap();

        let slot = decision.insights.iter().find(|i| i.action == Action::Slot(1)).unwrap();
        assert!((slot.breakdown["anticipated_risk"] - 2.4).abs() < 1e-9);
        assert_eq!(slot.breakdown["final_score"], slot.score);
        assert_eq!(
            slot.breakdown["base_score"] - slot.breakdown["anticipated_risk"],
            slot.score
        );
        assert_eq!(decision.chosen, Action::switch_to("Squirtle"));
    }

    #[test]
    fn test_empty_candidates_error() {
        assert!(matches!(
            policy().choose(&state(), Some(&[][..])),
            Err(PolicyError::NoLegalActions)
        ));
    }
}
