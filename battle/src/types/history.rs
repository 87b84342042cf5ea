//! Bounded log of recent battle events

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tactician_protocol::Player;

pub const HISTORY_CAPACITY: usize = 20;

/// How far back to look for the opponent's most recent action
pub const OPPONENT_LOOKBACK: usize = 15;

/// Coarse kind of a logged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Switch,
    Move,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Acting side; `None` for field-wide events
    pub side: Option<Player>,
    pub kind: ActionKind,
    pub description: String,
}

impl HistoryEntry {
    pub fn new(side: Player, kind: ActionKind, description: impl Into<String>) -> Self {
        Self {
            side: Some(side),
            kind,
            description: description.into(),
        }
    }

    /// An entry not attributed to either side
    pub fn field(description: impl Into<String>) -> Self {
        Self {
            side: None,
            kind: ActionKind::Other,
            description: description.into(),
        }
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

/// Ring buffer of the last [`HISTORY_CAPACITY`] entries, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recent `n` entries, oldest first
    pub fn recent(&self, n: usize) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    /// Consecutive switches by `side` since its last move, scanning newest first.
    ///
    /// Entries of other kinds and of the other side neither count nor reset.
    pub fn switch_depth(&self, side: Player) -> usize {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.side == Some(side))
            .take_while(|e| e.kind != ActionKind::Move)
            .filter(|e| e.kind == ActionKind::Switch)
            .count()
    }

    /// Kind of the most recent switch or move by `side` within the lookback window
    pub fn last_action(&self, side: Player) -> Option<ActionKind> {
        self.recent(OPPONENT_LOOKBACK)
            .rev()
            .find(|e| e.side == Some(side) && e.kind != ActionKind::Other)
            .map(|e| e.kind)
    }
}

impl FromIterator<HistoryEntry> for History {
    fn from_iter<I: IntoIterator<Item = HistoryEntry>>(iter: I) -> Self {
        let mut history = History::default();
        for entry in iter {
            history.push(entry);
        }
        history
    }
}
