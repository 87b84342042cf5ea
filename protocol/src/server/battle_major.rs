//! Major battle action message parsers
//!
//! These are the primary actions in battle: moves, switches, faints.

use super::BattleMessage;
use super::battle::{PokemonRef, parse_details, parse_hp_status, parse_pokemon, required};
use crate::ParseError;

/// Parse |move|POKEMON|MOVE|TARGET with optional tags
pub fn parse_move(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let move_name = required(parts, 3, "move")?;
    let target = parts.get(4).and_then(|s| PokemonRef::parse(s));

    Ok(BattleMessage::Move {
        pokemon,
        move_name,
        target,
    })
}

/// Parse |switch|POKEMON|DETAILS|HP STATUS
///
/// `drag` and `replace` share the layout and are parsed with `forced` set.
pub fn parse_switch(parts: &[&str], forced: bool) -> Result<BattleMessage, ParseError> {
    if parts.len() < 5 {
        return Err(ParseError::MissingField("switch fields".to_string()));
    }

    let pokemon = parse_pokemon(parts, 2)?;
    let details = parse_details(parts, 3)?;
    let hp_status = parse_hp_status(parts, 4);

    Ok(BattleMessage::Switch {
        pokemon,
        details,
        hp_status,
        forced,
    })
}

/// Parse |faint|POKEMON
pub fn parse_faint(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    Ok(BattleMessage::Faint(pokemon))
}
