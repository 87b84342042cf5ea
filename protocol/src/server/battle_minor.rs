//! Minor battle action message parsers
//!
//! These are secondary effects in battle: damage, stat changes, status, etc.
//! In the official client, they're usually displayed in smaller font.

use super::BattleMessage;
use super::battle::{Player, Stat, parse_hp_status, parse_pokemon, required};
use crate::ParseError;

/// Parse |-activate|POKEMON|EFFECT
pub fn parse_activate(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let effect = required(parts, 3, "effect")?;

    Ok(BattleMessage::Activate { pokemon, effect })
}

/// Parse |-damage|POKEMON|HP STATUS
pub fn parse_damage(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let hp_status = parse_hp_status(parts, 3);

    Ok(BattleMessage::Damage { pokemon, hp_status })
}

/// Parse |-heal|POKEMON|HP STATUS
pub fn parse_heal(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let hp_status = parse_hp_status(parts, 3);

    Ok(BattleMessage::Heal { pokemon, hp_status })
}

/// Parse |-status|POKEMON|STATUS
pub fn parse_status(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let status = required(parts, 3, "status")?;

    Ok(BattleMessage::Status { pokemon, status })
}

/// Parse |-curestatus|POKEMON|STATUS
pub fn parse_curestatus(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let status = required(parts, 3, "status")?;

    Ok(BattleMessage::CureStatus { pokemon, status })
}

/// Parse |-supereffective|POKEMON
pub fn parse_supereffective(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::SuperEffective(parse_pokemon(parts, 2)?))
}

/// Parse |-resisted|POKEMON
pub fn parse_resisted(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::Resisted(parse_pokemon(parts, 2)?))
}

/// Parse |-immune|POKEMON
pub fn parse_immune(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::Immune(parse_pokemon(parts, 2)?))
}

fn parse_stat_change(parts: &[&str]) -> Result<(Stat, i8), ParseError> {
    let stat = parts
        .get(3)
        .and_then(|s| Stat::parse(s.trim()))
        .ok_or_else(|| ParseError::MissingField("stat".to_string()))?;
    let amount = parts
        .get(4)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ParseError::MissingField("amount".to_string()))?;

    Ok((stat, amount))
}

/// Parse |-boost|POKEMON|STAT|AMOUNT
pub fn parse_boost(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let (stat, amount) = parse_stat_change(parts)?;

    Ok(BattleMessage::Boost {
        pokemon,
        stat,
        amount,
    })
}

/// Parse |-unboost|POKEMON|STAT|AMOUNT
pub fn parse_unboost(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let (stat, amount) = parse_stat_change(parts)?;

    Ok(BattleMessage::Unboost {
        pokemon,
        stat,
        amount,
    })
}

/// Parse |-clearboost|POKEMON
pub fn parse_clearboost(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::ClearBoost(parse_pokemon(parts, 2)?))
}

/// Parse |-start|POKEMON|EFFECT
pub fn parse_volatile_start(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let effect = required(parts, 3, "effect")?;

    Ok(BattleMessage::VolatileStart { pokemon, effect })
}

/// Parse |-end|POKEMON|EFFECT
pub fn parse_volatile_end(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let effect = required(parts, 3, "effect")?;

    Ok(BattleMessage::VolatileEnd { pokemon, effect })
}

/// Parse |-item|POKEMON|ITEM
pub fn parse_item(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let item = required(parts, 3, "item")?;

    Ok(BattleMessage::Item { pokemon, item })
}

/// Parse |-ability|POKEMON|ABILITY
pub fn parse_ability(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let pokemon = parse_pokemon(parts, 2)?;
    let ability = required(parts, 3, "ability")?;

    Ok(BattleMessage::Ability { pokemon, ability })
}

/// Parse |weather|WEATHER (and |-weather|WEATHER|[upkeep])
pub fn parse_weather(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::Weather(required(parts, 2, "weather")?))
}

/// Parse |terrain|TERRAIN
pub fn parse_terrain(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::Terrain(required(parts, 2, "terrain")?))
}

/// Parse |-fieldstart|CONDITION
pub fn parse_fieldstart(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::FieldStart(required(parts, 2, "condition")?))
}

/// Parse |-fieldend|CONDITION
pub fn parse_fieldend(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    Ok(BattleMessage::FieldEnd(required(parts, 2, "condition")?))
}

fn parse_side_condition(parts: &[&str]) -> Result<(Player, String), ParseError> {
    let side = required(parts, 2, "side")?;
    let condition = required(parts, 3, "condition")?;

    Ok((Player::from_prefix(&side), condition))
}

/// Parse |-sidestart|SIDE|CONDITION
pub fn parse_sidestart(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let (player, condition) = parse_side_condition(parts)?;
    Ok(BattleMessage::SideStart { player, condition })
}

/// Parse |-sideend|SIDE|CONDITION
pub fn parse_sideend(parts: &[&str]) -> Result<BattleMessage, ParseError> {
    let (player, condition) = parse_side_condition(parts)?;
    Ok(BattleMessage::SideEnd { player, condition })
}
