//! Battle progress message parsers
//!
//! These messages track the flow of a battle.

use anyhow::{Context, Result};

use super::BattleMessage;
use super::request::BattleRequest;
use crate::ParseError;

/// Parse |turn|NUMBER
pub fn parse_turn(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let turn = parts
        .get(2)
        .ok_or_else(|| ParseError::MissingField("turn number".to_string()))?;

    turn.trim()
        .parse()
        .map(BattleMessage::Turn)
        .map_err(|_| ParseError::InvalidFormat(format!("turn number: {turn}")))
}

/// Parse the JSON payload of |request|REQUEST
///
/// Accepts either the bare JSON or the full `|request|...` line.
pub fn parse_request(payload: &str) -> Result<BattleRequest> {
    let json = payload
        .trim()
        .strip_prefix("|request|")
        .unwrap_or(payload.trim());

    if json.is_empty() {
        return Err(ParseError::EmptyMessage.into());
    }

    serde_json::from_str(json).context("invalid request json")
}
