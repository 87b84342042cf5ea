use thiserror::Error;

pub mod server;

pub use server::{
    ActivePokemon, BattleMessage, BattleRequest, HpStatus, MoveSlot, Player, PokemonDetails,
    PokemonRef, ProtocolEvent, SideInfo, SidePokemon, Stat, parse_event, parse_events,
    parse_request, to_id,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty message")]
    EmptyMessage,
}
