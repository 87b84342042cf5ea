mod battle;
mod battle_init;
mod battle_major;
mod battle_minor;
mod battle_progress;
mod request;

pub use battle::{
    HpStatus, Player, PokemonDetails, PokemonRef, Stat, position_to_slot, strip_effect_prefix,
    to_id,
};
pub use battle_progress::parse_request;
pub use request::{ActivePokemon, BattleRequest, MoveSlot, SideInfo, SidePokemon};

use crate::ParseError;

/// A typed battle message.
///
/// Kinds the tracker does not understand, and lines too short for their
/// kind, become [`BattleMessage::Unrecognized`] and fold as no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleMessage {
    // === Initialization ===
    Player {
        player: Player,
        username: String,
        rating: Option<u32>,
    },
    Gen(u8),
    Tier(String),

    // === Progress ===
    Turn(u32),

    // === Major actions ===
    Switch {
        pokemon: PokemonRef,
        details: PokemonDetails,
        hp_status: HpStatus,
        /// `drag` or `replace`: the side did not choose this switch
        forced: bool,
    },
    Move {
        pokemon: PokemonRef,
        move_name: String,
        target: Option<PokemonRef>,
    },
    Faint(PokemonRef),

    // === Minor actions ===
    Activate {
        pokemon: PokemonRef,
        effect: String,
    },
    Damage {
        pokemon: PokemonRef,
        hp_status: HpStatus,
    },
    Heal {
        pokemon: PokemonRef,
        hp_status: HpStatus,
    },
    Status {
        pokemon: PokemonRef,
        status: String,
    },
    CureStatus {
        pokemon: PokemonRef,
        status: String,
    },
    SuperEffective(PokemonRef),
    Resisted(PokemonRef),
    Immune(PokemonRef),
    Boost {
        pokemon: PokemonRef,
        stat: Stat,
        amount: i8,
    },
    Unboost {
        pokemon: PokemonRef,
        stat: Stat,
        amount: i8,
    },
    ClearBoost(PokemonRef),
    VolatileStart {
        pokemon: PokemonRef,
        effect: String,
    },
    VolatileEnd {
        pokemon: PokemonRef,
        effect: String,
    },
    Item {
        pokemon: PokemonRef,
        item: String,
    },
    Ability {
        pokemon: PokemonRef,
        ability: String,
    },

    // === Field ===
    Weather(String),
    Terrain(String),
    FieldStart(String),
    FieldEnd(String),
    SideStart {
        player: Player,
        condition: String,
    },
    SideEnd {
        player: Player,
        condition: String,
    },

    Unrecognized,
}

/// One tokenized protocol line
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolEvent {
    /// The line as received
    pub raw: String,
    /// Event kind (the first pipe-delimited segment)
    pub kind: String,
    /// Remaining segments
    pub args: Vec<String>,
    /// Typed view of the event
    pub message: BattleMessage,
}

impl ProtocolEvent {
    pub fn is_recognized(&self) -> bool {
        self.message != BattleMessage::Unrecognized
    }
}

/// Tokenize raw protocol lines into events.
///
/// Lines without an event kind are skipped; everything else, including
/// unknown kinds, is kept in arrival order.
pub fn parse_events<I, S>(lines: I) -> Vec<ProtocolEvent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_event(line.as_ref()))
        .collect()
}

/// Tokenize a single protocol line
pub fn parse_event(line: &str) -> Option<ProtocolEvent> {
    let trimmed = line.trim();
    let mut parts: Vec<&str> = trimmed.split('|').collect();

    if parts.first() == Some(&"") {
        parts.remove(0);
    }

    let kind = *parts.first()?;
    if kind.is_empty() {
        return None;
    }

    // Re-align so parsers index args from 2, like the full "|kind|..." split
    let mut aligned = Vec::with_capacity(parts.len() + 1);
    aligned.push("");
    aligned.extend(parts.iter().copied());

    let message = match parse_message(kind, &aligned) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(kind, error = %e, "skipping malformed protocol line");
            BattleMessage::Unrecognized
        }
    };

    Some(ProtocolEvent {
        raw: line.to_string(),
        kind: kind.to_string(),
        args: parts[1..].iter().map(|s| s.to_string()).collect(),
        message,
    })
}

fn parse_message(kind: &str, parts: &[&str]) -> Result<BattleMessage, ParseError> {
    match kind {
        "player" => battle_init::parse_player(parts),
        "gen" => battle_init::parse_gen(parts),
        "tier" => battle_init::parse_tier(parts),

        "turn" => battle_progress::parse_turn(parts),

        "switch" => battle_major::parse_switch(parts, false),
        "drag" | "replace" => battle_major::parse_switch(parts, true),
        "move" => battle_major::parse_move(parts),
        "faint" | "-faint" => battle_major::parse_faint(parts),

        "-activate" => battle_minor::parse_activate(parts),
        "-damage" => battle_minor::parse_damage(parts),
        "-heal" => battle_minor::parse_heal(parts),
        "-status" => battle_minor::parse_status(parts),
        "-curestatus" => battle_minor::parse_curestatus(parts),
        "-supereffective" => battle_minor::parse_supereffective(parts),
        "-resisted" => battle_minor::parse_resisted(parts),
        "-immune" => battle_minor::parse_immune(parts),
        "-boost" => battle_minor::parse_boost(parts),
        "-unboost" => battle_minor::parse_unboost(parts),
        "-clearboost" => battle_minor::parse_clearboost(parts),
        "-start" => battle_minor::parse_volatile_start(parts),
        "-end" => battle_minor::parse_volatile_end(parts),
        "-item" => battle_minor::parse_item(parts),
        "-ability" => battle_minor::parse_ability(parts),

        "weather" | "-weather" => battle_minor::parse_weather(parts),
        "terrain" => battle_minor::parse_terrain(parts),
        "-fieldstart" => battle_minor::parse_fieldstart(parts),
        "-fieldend" => battle_minor::parse_fieldend(parts),
        "-sidestart" => battle_minor::parse_sidestart(parts),
        "-sideend" => battle_minor::parse_sideend(parts),

        _ => Ok(BattleMessage::Unrecognized),
    }
}
