//! Domain types for battle state tracking

mod conditions;
mod field;
mod history;
mod pokemon;
mod pokemon_type;
mod side;
mod stats;
mod status;

pub use conditions::{
    AURORA_VEIL_TURNS, LIGHT_SCREEN_TURNS, MAX_SPIKES, MAX_TOXIC_SPIKES, REFLECT_TURNS,
    ScreensState, SideCondition, SideConditions, SideHazards, TAILWIND_TURNS, TRICK_ROOM_TURNS,
};
pub use field::{FieldState, SideFields};
pub use history::{
    ActionKind, HISTORY_CAPACITY, History, HistoryEntry, OPPONENT_LOOKBACK,
};
pub use pokemon::{DEFAULT_LEVEL, PLACEHOLDER_PREFIX, PokemonState};
pub use pokemon_type::{TYPE_CHART, Type};
pub use side::{PlayerState, TEAM_SIZE};
pub use stats::{MAX_STAGE, MIN_STAGE, StatStages};
pub use status::{PokemonVolatile, Status, VolatileEffect};
