//! Policies turn a state and a candidate list into a ranked decision

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tactician_battle::BattleState;

use crate::PolicyError;
use crate::actions::{Action, dedup_actions, enumerate_legal_actions};
use crate::evaluator::Evaluator;
use crate::knowledge::KnowledgeBase;

/// Score and named breakdown for one ranked action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInsight {
    pub action: Action,
    pub score: f64,
    pub breakdown: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub chosen: Action,
    /// Every candidate, best first
    pub ranking: Vec<Action>,
    /// One entry per ranked action, in ranking order
    pub insights: Vec<ActionInsight>,
}

impl Decision {
    pub fn chosen_score(&self) -> Option<f64> {
        self.insights.first().map(|i| i.score)
    }

    /// Build a decision from scored insights, ordering them best first.
    ///
    /// Equal scores fall back to the action label so the order is stable.
    pub(crate) fn from_insights(mut insights: Vec<ActionInsight>) -> Result<Self, PolicyError> {
        insights.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.action.label().cmp(&b.action.label()))
        });

        let chosen = insights
            .first()
            .map(|i| i.action.clone())
            .ok_or(PolicyError::NoLegalActions)?;
        let ranking = insights.iter().map(|i| i.action.clone()).collect();

        Ok(Self {
            chosen,
            ranking,
            insights,
        })
    }
}

/// Picks an action for our side
pub trait Policy {
    /// Rank `legal`, or the actions enumerated from the state when `None`.
    ///
    /// An empty candidate list is an error.
    fn choose(&self, state: &BattleState, legal: Option<&[Action]>) -> Result<Decision, PolicyError>;
}

/// Deduplicated candidates for a decision
pub(crate) fn candidates(
    state: &BattleState,
    legal: Option<&[Action]>,
) -> Result<Vec<Action>, PolicyError> {
    let actions = match legal {
        Some(legal) => dedup_actions(legal.iter().cloned()),
        None => enumerate_legal_actions(state),
    };
    if actions.is_empty() {
        return Err(PolicyError::NoLegalActions);
    }
    Ok(actions)
}

/// Ranks actions by the evaluator alone
pub struct BaselinePolicy<K: KnowledgeBase + ?Sized> {
    evaluator: Evaluator<K>,
}

impl<K: KnowledgeBase + ?Sized> BaselinePolicy<K> {
    pub fn new(evaluator: Evaluator<K>) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &Evaluator<K> {
        &self.evaluator
    }
}

impl<K: KnowledgeBase + ?Sized> Policy for BaselinePolicy<K> {
    fn choose(&self, state: &BattleState, legal: Option<&[Action]>) -> Result<Decision, PolicyError> {
        let insights = candidates(state, legal)?
            .into_iter()
            .map(|action| {
                let breakdown = self.evaluator.explain(state, &action);
                ActionInsight {
                    score: breakdown.score,
                    breakdown: breakdown.to_map(),
                    action,
                }
            })
            .collect();

        Decision::from_insights(insights)
    }
}
