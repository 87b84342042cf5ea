//! Battle initialization message parsers
//!
//! These messages are sent at the start of a battle to set up the game state.

use super::BattleMessage;
use super::battle::{Player, required};
use crate::ParseError;

/// Parse |player|PLAYER|USERNAME|AVATAR|RATING
pub fn parse_player(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let player = parts
        .get(2)
        .and_then(|s| Player::parse(s.trim()))
        .ok_or_else(|| ParseError::MissingField("player".to_string()))?;

    let username = required(parts, 3, "username")?;
    let rating = parts.get(5).and_then(|s| s.trim().parse().ok());

    Ok(BattleMessage::Player {
        player,
        username,
        rating,
    })
}

/// Parse |gen|GENNUM
pub fn parse_gen(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let generation = parts
        .get(2)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ParseError::InvalidFormat("generation".to_string()))?;

    Ok(BattleMessage::Gen(generation))
}

/// Parse |tier|FORMATNAME
pub fn parse_tier(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::Tier(required(parts, 2, "format")?))
}
