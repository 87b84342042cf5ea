//! Per-battle decision context

use std::sync::Arc;

use anyhow::Result;
use tactician_battle::{BattleState, Interpreter, PlayerState, apply_request};
use tactician_protocol::{BattleRequest, parse_request};

use crate::PolicyError;
use crate::actions::{Action, request_actions};
use crate::config::AgentConfig;
use crate::evaluator::Evaluator;
use crate::knowledge::KnowledgeBase;
use crate::lookahead::LookaheadPolicy;
use crate::policy::{Decision, Policy};

/// Opponent name used until their `|player|` line arrives
const UNKNOWN_OPPONENT: &str = "opponent";

/// Everything needed to follow and play one battle.
///
/// Owns the battle's state and interpreter; only the knowledge base is
/// shared between contexts.
pub struct BattleContext<K: KnowledgeBase + ?Sized> {
    state: BattleState,
    interpreter: Interpreter,
    policy: LookaheadPolicy<K>,
    knowledge: Arc<K>,
}

impl<K: KnowledgeBase + ?Sized> BattleContext<K> {
    pub fn new(config: &AgentConfig, battle_id: impl Into<String>, knowledge: Arc<K>) -> Self {
        let state = BattleState::bootstrap(
            battle_id,
            config.generation,
            config.format.clone(),
            config.self_name.clone(),
            UNKNOWN_OPPONENT,
        );
        let evaluator = Evaluator::new(config.weights, Arc::clone(&knowledge));

        Self {
            state,
            interpreter: Interpreter::new(),
            policy: LookaheadPolicy::new(evaluator, config.risk_aversion),
            knowledge,
        }
    }

    pub fn battle_id(&self) -> &str {
        &self.state.battle_id
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Fold raw protocol lines into the state
    pub fn feed<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let next = self.interpreter.feed(lines, self.state.clone());
        self.state = self.with_known_types(next);
    }

    pub fn apply_request(&mut self, request: &BattleRequest) {
        let next = apply_request(self.state.clone(), request);
        self.state = self.with_known_types(next);
    }

    /// Apply a `|request|` payload and decide if it asks for a choice.
    ///
    /// Returns `None` for wait and team preview requests.
    pub fn handle_request_json(&mut self, payload: &str) -> Result<Option<Decision>> {
        let request = parse_request(payload)?;
        self.apply_request(&request);

        if !request.needs_decision() || request.team_preview {
            tracing::debug!(battle_id = %self.battle_id(), rqid = ?request.rqid, "no decision needed");
            return Ok(None);
        }

        let legal = request_actions(&request);
        Ok(Some(self.decide(Some(legal.as_slice()))?))
    }

    /// Rank `legal` (or the actions the state allows) with the lookahead policy
    pub fn decide(&self, legal: Option<&[Action]>) -> Result<Decision, PolicyError> {
        let span = tracing::info_span!("decide", battle_id = %self.battle_id(), turn = self.state.turn);
        let _enter = span.enter();

        let decision = self.policy.choose(&self.state, legal)?;
        tracing::info!(
            chosen = %decision.chosen,
            score = decision.chosen_score().unwrap_or_default(),
            candidates = decision.ranking.len(),
            "chose action"
        );
        tracing::debug!(summary = ?self.state.summary(), "decision state");
        Ok(decision)
    }

    /// Fill in types for revealed Pokemon; the protocol never carries them
    fn with_known_types(&self, mut state: BattleState) -> BattleState {
        fill_types(&mut state.player_self, self.knowledge.as_ref());
        fill_types(&mut state.player_opponent, self.knowledge.as_ref());
        state
    }
}

fn fill_types<K: KnowledgeBase + ?Sized>(player: &mut PlayerState, knowledge: &K) {
    for member in player
        .team
        .iter_mut()
        .filter(|p| p.types.is_empty() && !p.is_placeholder())
    {
        if let Some(types) = knowledge.species_types(&member.species) {
            member.types = types.to_vec();
        }
    }
}
