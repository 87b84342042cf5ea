//! Static evaluation of a single action against a battle state

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tactician_battle::{ActionKind, BattleState, PokemonState};
use tactician_protocol::to_id;

use crate::actions::Action;
use crate::knowledge::KnowledgeBase;

/// Same-type attack bonus
pub const STAB: f64 = 1.5;

/// Tempo cost of any voluntary switch
pub const SWITCH_TEMPO_COST: f64 = 0.3;
/// Added per consecutive self switch while the opponent stays in
pub const SWITCH_CHAIN_COST: f64 = 2.0;
/// Flat cost once a switch chain has started against a stationary opponent
pub const SWITCH_LOOP_PENALTY: f64 = 5.0;

pub const REDUNDANT_STATUS_PENALTY: f64 = 0.5;

pub const SPIKES_LAYER_VALUE: f64 = 0.2;
pub const STEALTH_ROCK_VALUE: f64 = 0.5;

/// Progress credited to any move action
pub const WINCON_MOVE_BONUS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub material: f64,
    pub position: f64,
    pub field_control: f64,
    pub risk: f64,
    pub wincon_progress: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 1.0,
            position: 1.2,
            field_control: 0.5,
            risk: 0.3,
            wincon_progress: 0.8,
        }
    }
}

impl EvalWeights {
    pub fn is_finite(&self) -> bool {
        [
            self.material,
            self.position,
            self.field_control,
            self.risk,
            self.wincon_progress,
        ]
        .iter()
        .all(|w| w.is_finite())
    }
}

/// The unweighted terms behind a score, plus the weighted total
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub score: f64,
    pub material: f64,
    pub position: f64,
    pub field_control: f64,
    pub risk: f64,
    pub wincon_progress: f64,
}

impl Breakdown {
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("score".to_string(), self.score),
            ("material".to_string(), self.material),
            ("position".to_string(), self.position),
            ("field_control".to_string(), self.field_control),
            ("risk".to_string(), self.risk),
            ("wincon_progress".to_string(), self.wincon_progress),
        ])
    }
}

/// Scores one action at a time as a weighted sum of five terms
pub struct Evaluator<K: KnowledgeBase + ?Sized> {
    weights: EvalWeights,
    knowledge: Arc<K>,
}

impl<K: KnowledgeBase + ?Sized> Clone for Evaluator<K> {
    fn clone(&self) -> Self {
        Self {
            weights: self.weights,
            knowledge: Arc::clone(&self.knowledge),
        }
    }
}

impl<K: KnowledgeBase + ?Sized> Evaluator<K> {
    pub fn new(weights: EvalWeights, knowledge: Arc<K>) -> Self {
        Self { weights, knowledge }
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    pub fn knowledge(&self) -> &K {
        &self.knowledge
    }

    pub fn evaluate(&self, state: &BattleState, action: &Action) -> f64 {
        self.explain(state, action).score
    }

    pub fn explain(&self, state: &BattleState, action: &Action) -> Breakdown {
        let material = material_score(state);
        let position = self.position_score(state, action);
        let field_control = field_control_score(state);
        let risk = risk_penalty(state);
        let wincon_progress = wincon_progress_score(action);

        let w = &self.weights;
        let score = w.material * material
            + w.position * position
            + w.field_control * field_control
            - w.risk * risk
            + w.wincon_progress * wincon_progress;

        Breakdown {
            score,
            material,
            position,
            field_control,
            risk,
            wincon_progress,
        }
    }

    fn position_score(&self, state: &BattleState, action: &Action) -> f64 {
        match action {
            Action::Switch(_) => -switch_penalty(state),
            Action::Move(id) => {
                let (Some(attacker), Some(defender)) = (state.self_active(), state.opponent_active())
                else {
                    return 0.0;
                };

                let redundant_status = self
                    .knowledge
                    .move_data(id)
                    .is_some_and(|m| m.is_status && defender.status.is_some());
                if redundant_status {
                    return -REDUNDANT_STATUS_PENALTY;
                }

                self.estimate_damage(state, attacker, defender, id)
            }
            Action::Slot(_) => 0.0,
        }
    }

    /// Expected damage as a fraction of the defender's HP.
    ///
    /// An effectiveness multiplier observed in this battle for the defender's
    /// species replaces the type chart product. Unknown moves and moves
    /// without base power estimate 0.
    pub fn estimate_damage(
        &self,
        state: &BattleState,
        attacker: &PokemonState,
        defender: &PokemonState,
        move_name: &str,
    ) -> f64 {
        let move_id = to_id(move_name);
        let Some(data) = self.knowledge.move_data(&move_id) else {
            return 0.0;
        };
        let Some(base_power) = data.damaging_power() else {
            return 0.0;
        };

        let effectiveness = state
            .observed_multiplier(&defender.species, &move_id)
            .unwrap_or_else(|| {
                self.knowledge
                    .effectiveness_against(data.move_type, &defender.types)
            });
        let stab = if attacker.has_type(data.move_type) {
            STAB
        } else {
            1.0
        };

        f64::from(base_power) * stab * effectiveness / 100.0
    }
}

/// Living members on our side minus living members on theirs
fn material_score(state: &BattleState) -> f64 {
    state.player_self.alive_count() as f64 - state.player_opponent.alive_count() as f64
}

/// Cost of switching now.
///
/// Free-ish right after the opponent switched; otherwise every switch we
/// made since our last move makes the next one much more expensive.
pub fn switch_penalty(state: &BattleState) -> f64 {
    let depth = state.history.switch_depth(state.self_side());
    let opponent_switched =
        state.history.last_action(state.opponent_side()) == Some(ActionKind::Switch);

    let mut penalty = SWITCH_TEMPO_COST;
    if !opponent_switched {
        penalty += SWITCH_CHAIN_COST * depth as f64;
        if depth >= 1 {
            penalty += SWITCH_LOOP_PENALTY;
        }
    }
    penalty
}

fn field_control_score(state: &BattleState) -> f64 {
    let theirs = state.field.side(state.opponent_side()).hazards;
    let ours = state.field.side(state.self_side()).hazards;

    let value = |rock: bool, spikes: u8| {
        SPIKES_LAYER_VALUE * f64::from(spikes) + if rock { STEALTH_ROCK_VALUE } else { 0.0 }
    };

    value(theirs.stealth_rock, theirs.spikes_layers) - value(ours.stealth_rock, ours.spikes_layers)
}

fn risk_penalty(state: &BattleState) -> f64 {
    state
        .self_active()
        .map(|p| 1.0 - p.hp_fraction)
        .unwrap_or(0.0)
}

fn wincon_progress_score(action: &Action) -> f64 {
    match action {
        Action::Move(_) => WINCON_MOVE_BONUS,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{Dex, MoveCategory, MoveData, TypeChart};
    use tactician_battle::{HistoryEntry, Interpreter, Player, Status, Type};

    fn dex() -> Arc<Dex> {
        Arc::new(
            Dex::new()
                .with_type_chart(TypeChart::neutral().with(Type::Fire, Type::Grass, 2.0))
                .with_move(MoveData::new("Ember", Type::Fire, MoveCategory::Special, Some(40)))
                .with_move(MoveData::new("Tackle", Type::Normal, MoveCategory::Physical, Some(40)))
                .with_move(MoveData::new("Thunder Wave", Type::Electric, MoveCategory::Status, None)),
        )
    }

    fn evaluator() -> Evaluator<Dex> {
        Evaluator::new(EvalWeights::default(), dex())
    }

    fn matchup_state() -> BattleState {
        let mut state = BattleState::bootstrap("battle-1", 9, "randombattle", "Me", "Them");

        let mut attacker = PokemonState::new("Charmander", 50);
        attacker.types = vec![Type::Fire];
        attacker.record_move("Ember");
        attacker.record_move("Tackle");
        state.player_self.team[0] = attacker;
        state.player_self.team[1] = PokemonState::new("Squirtle", 50);
        state.player_self.set_active(0);

        let mut defender = PokemonState::new("Bulbasaur", 50);
        defender.types = vec![Type::Grass];
        state.player_opponent.team[0] = defender;
        state.player_opponent.set_active(0);

        state
    }

    fn switch(side: Player) -> HistoryEntry {
        HistoryEntry::new(side, ActionKind::Switch, format!("Switch: {side}"))
    }

    fn mv(side: Player) -> HistoryEntry {
        HistoryEntry::new(side, ActionKind::Move, format!("Move: {side}"))
    }

    #[test]
    fn test_estimate_damage_with_stab_and_chart() {
        let state = matchup_state();
        let attacker = state.self_active().unwrap();
        let defender = state.opponent_active().unwrap();

        let damage = evaluator().estimate_damage(&state, attacker, defender, "Ember");
        assert!((damage - 1.2).abs() < 1e-9);

        let damage = evaluator().estimate_damage(&state, attacker, defender, "Tackle");
        assert!((damage - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_damage_unknown_or_status_move_is_zero() {
        let state = matchup_state();
        let attacker = state.self_active().unwrap();
        let defender = state.opponent_active().unwrap();
        let evaluator = evaluator();

        assert_eq!(evaluator.estimate_damage(&state, attacker, defender, "Hyper Beam"), 0.0);
        assert_eq!(evaluator.estimate_damage(&state, attacker, defender, "Thunder Wave"), 0.0);
    }

    #[test]
    fn test_observed_effectiveness_replaces_chart() {
        let mut state = matchup_state();
        state
            .observed_effectiveness
            .entry("Bulbasaur".to_string())
            .or_default()
            .insert("ember".to_string(), 0.5);

        let attacker = state.self_active().unwrap();
        let defender = state.opponent_active().unwrap();
        let damage = evaluator().estimate_damage(&state, attacker, defender, "Ember");
        assert!((damage - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_super_effective_move_ranks_higher() {
        let state = matchup_state();
        let evaluator = evaluator();
        let ember = evaluator.evaluate(&state, &Action::use_move("Ember"));
        let tackle = evaluator.evaluate(&state, &Action::use_move("Tackle"));
        assert!(ember > tackle);
    }

    #[test]
    fn test_breakdown_terms() {
        let mut state = matchup_state();
        state.player_self.team[0].hp_fraction = 0.25;
        state.player_opponent.team[3].faint();
        state.field.sides.get_mut(Player::P2).hazards.stealth_rock = true;
        state.field.sides.get_mut(Player::P1).hazards.spikes_layers = 1;

        let breakdown = evaluator().explain(&state, &Action::use_move("Ember"));
        assert_eq!(breakdown.material, 1.0);
        assert!((breakdown.position - 1.2).abs() < 1e-9);
        assert!((breakdown.field_control - 0.3).abs() < 1e-9);
        assert_eq!(breakdown.risk, 0.75);
        assert_eq!(breakdown.wincon_progress, 0.1);

        let expected = 1.0 + 1.2 * 1.2 + 0.5 * 0.3 - 0.3 * 0.75 + 0.8 * 0.1;
        assert!((breakdown.score - expected).abs() < 1e-9);
        assert_eq!(breakdown.to_map().len(), 6);
    }

    #[test]
    fn test_redundant_status_move_is_penalized() {
        let mut state = matchup_state();
        state.player_opponent.team[0].status = Some(Status::Paralysis);

        let breakdown = evaluator().explain(&state, &Action::use_move("Thunder Wave"));
        assert_eq!(breakdown.position, -REDUNDANT_STATUS_PENALTY);
    }

    #[test]
    fn test_single_switch_pays_tempo_only() {
        let state = matchup_state();
        assert!((switch_penalty(&state) - SWITCH_TEMPO_COST).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_switches_are_penalized() {
        let mut state = matchup_state();
        state.history = vec![
            mv(Player::P2),
            mv(Player::P1),
            switch(Player::P1),
            mv(Player::P2),
            switch(Player::P1),
        ]
        .into_iter()
        .collect();

        let penalty = switch_penalty(&state);
        assert!(penalty >= 0.3 + 2.0 * 2.0 + 5.0 - 1e-9);

        let evaluator = evaluator();
        let switch_score = evaluator.evaluate(&state, &Action::switch_to("Squirtle"));
        let attack_score = evaluator.evaluate(&state, &Action::use_move("Tackle"));
        assert!(attack_score - switch_score > 9.0);
    }

    #[test]
    fn test_switch_after_opponent_switch_is_cheap() {
        let mut state = matchup_state();
        state.history = vec![switch(Player::P1), switch(Player::P1), switch(Player::P2)]
            .into_iter()
            .collect();

        assert!((switch_penalty(&state) - SWITCH_TEMPO_COST).abs() < 1e-9);
    }

    #[test]
    fn test_switch_penalty_follows_bound_side() {
        let mut state = matchup_state();
        state.my_side = Some(Player::P2);
        state.history = vec![switch(Player::P1), switch(Player::P1)].into_iter().collect();

        // p1's switches are the opponent's now
        assert!((switch_penalty(&state) - SWITCH_TEMPO_COST).abs() < 1e-9);
    }

    #[test]
    fn test_phazed_switch_keeps_next_switch_cheap() {
        let state = Interpreter::new().feed(
            [
                "|switch|p1a: Charizard|Charizard, L80|100/100",
                "|switch|p2a: Skarmory|Skarmory, L82|100/100",
                "|move|p1a: Charizard|Flamethrower|p2a: Skarmory",
                "|move|p2a: Skarmory|Whirlwind|p1a: Charizard",
                "|drag|p1a: Blastoise|Blastoise, L82|100/100",
            ],
            BattleState::bootstrap("battle-1", 9, "randombattle", "Me", "Them"),
        );

        assert!((switch_penalty(&state) - SWITCH_TEMPO_COST).abs() < 1e-9);
    }

    #[test]
    fn test_field_control_follows_bound_side() {
        let mut state = matchup_state();
        state.field.sides.get_mut(Player::P1).hazards.stealth_rock = true;
        state.field.sides.get_mut(Player::P2).hazards.spikes_layers = 2;

        let as_p1 = evaluator().explain(&state, &Action::use_move("Ember"));
        assert!((as_p1.field_control - (0.4 - 0.5)).abs() < 1e-9);

        state.my_side = Some(Player::P2);
        let as_p2 = evaluator().explain(&state, &Action::use_move("Ember"));
        assert!((as_p2.field_control - (0.5 - 0.4)).abs() < 1e-9);
    }
}
