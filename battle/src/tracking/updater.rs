//! Folding protocol events into a BattleState

use tactician_protocol::{
    BattleMessage, HpStatus, Player, PokemonDetails, PokemonRef, ProtocolEvent, Stat,
    parse_events, server::strip_effect_prefix, to_id,
};

use super::battle::BattleState;
use crate::types::{ActionKind, HistoryEntry, PlayerState, PokemonState, Status, VolatileEffect};

/// Move most recently used by a side, kept for the effectiveness event that follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastMove {
    pub side: Player,
    pub move_id: String,
}

/// Effectiveness signal carried by `-supereffective`, `-resisted` and `-immune`
#[derive(Debug, Clone, Copy, PartialEq)]
enum Effectiveness {
    Super,
    Resisted,
    Immune,
}

impl Effectiveness {
    fn multiplier(self) -> f64 {
        match self {
            Effectiveness::Super => 2.0,
            Effectiveness::Resisted => 0.5,
            Effectiveness::Immune => 0.0,
        }
    }
}

/// Folds events into battle states for one battle.
///
/// The only thing carried between events is the last move seen, which
/// lets an effectiveness event be attributed to the move that caused it.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    last_move: Option<LastMove>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokenize raw lines
    pub fn parse<I, S>(lines: I) -> Vec<ProtocolEvent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        parse_events(lines)
    }

    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    /// Tokenize and fold raw lines in one go
    pub fn feed<I, S>(&mut self, lines: I, state: BattleState) -> BattleState
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let events = Self::parse(lines);
        self.apply(&events, state)
    }

    /// Fold events in order
    pub fn apply<'a, I>(&mut self, events: I, state: BattleState) -> BattleState
    where
        I: IntoIterator<Item = &'a ProtocolEvent>,
    {
        events
            .into_iter()
            .fold(state, |state, event| self.apply_event(event, state))
    }

    /// Apply a single event. Unrecognized events leave the state untouched.
    pub fn apply_event(&mut self, event: &ProtocolEvent, state: BattleState) -> BattleState {
        match &event.message {
            BattleMessage::Player {
                player,
                username,
                rating,
            } => on_player(state, *player, username, *rating),
            BattleMessage::Gen(generation) => on_gen(state, *generation),
            BattleMessage::Tier(tier) => on_tier(state, tier),
            BattleMessage::Turn(turn) => on_turn(state, *turn),

            BattleMessage::Switch {
                pokemon,
                details,
                hp_status,
                forced,
            } => on_switch(state, pokemon, details, hp_status, *forced),
            BattleMessage::Move {
                pokemon, move_name, ..
            } => self.on_move(state, pokemon, move_name),
            BattleMessage::Faint(pokemon) => on_faint(state, pokemon),

            BattleMessage::Activate { pokemon, effect } => self.on_activate(state, pokemon, effect),
            BattleMessage::Damage { pokemon, hp_status }
            | BattleMessage::Heal { pokemon, hp_status } => on_hp(state, pokemon, hp_status),
            BattleMessage::Status { pokemon, status } => on_status(state, pokemon, Some(status)),
            BattleMessage::CureStatus { pokemon, .. } => on_status(state, pokemon, None),
            BattleMessage::SuperEffective(pokemon) => {
                self.on_effectiveness(state, pokemon, Effectiveness::Super)
            }
            BattleMessage::Resisted(pokemon) => {
                self.on_effectiveness(state, pokemon, Effectiveness::Resisted)
            }
            BattleMessage::Immune(pokemon) => {
                self.on_effectiveness(state, pokemon, Effectiveness::Immune)
            }
            BattleMessage::Boost {
                pokemon,
                stat,
                amount,
            } => on_boost(state, pokemon, *stat, *amount),
            BattleMessage::Unboost {
                pokemon,
                stat,
                amount,
            } => on_boost(state, pokemon, *stat, amount.saturating_neg()),
            BattleMessage::ClearBoost(pokemon) => on_clear_boost(state, pokemon),
            BattleMessage::VolatileStart { pokemon, effect } => {
                on_volatile(state, pokemon, effect, true)
            }
            BattleMessage::VolatileEnd { pokemon, effect } => {
                on_volatile(state, pokemon, effect, false)
            }
            BattleMessage::Item { pokemon, item } => on_item(state, pokemon, item),
            BattleMessage::Ability { pokemon, ability } => on_ability(state, pokemon, ability),

            BattleMessage::Weather(weather) => on_weather(state, weather),
            BattleMessage::Terrain(terrain) => on_terrain(state, terrain),
            BattleMessage::FieldStart(condition) => on_field(state, condition, true),
            BattleMessage::FieldEnd(condition) => on_field(state, condition, false),
            BattleMessage::SideStart { player, condition } => {
                on_side_condition(state, *player, condition, true)
            }
            BattleMessage::SideEnd { player, condition } => {
                on_side_condition(state, *player, condition, false)
            }

            BattleMessage::Unrecognized => {
                tracing::debug!(kind = %event.kind, "ignoring unrecognized event");
                state
            }
        }
    }

    fn on_move(&mut self, mut state: BattleState, pokemon: &PokemonRef, move_name: &str) -> BattleState {
        let move_id = to_id(move_name);
        if move_id.is_empty() {
            return state;
        }

        let side = pokemon.player;
        self.last_move = Some(LastMove { side, move_id });

        let player = state.player_mut(side);
        member_mut(player, pokemon).record_move(move_name);

        state
            .field
            .last_actions
            .insert(side, move_name.to_string());
        state.log(HistoryEntry::new(
            side,
            ActionKind::Move,
            format!("Move: {side} used {move_name}"),
        ));
        state
    }

    fn on_activate(&mut self, mut state: BattleState, pokemon: &PokemonRef, effect: &str) -> BattleState {
        if let Some(move_name) = strip_effect_prefix(effect, "move") {
            return self.on_move(state, pokemon, move_name);
        }

        let side = pokemon.player;
        let player = state.player_mut(side);
        let member = member_mut(player, pokemon);

        let description = if let Some(ability) = strip_effect_prefix(effect, "ability") {
            member.record_ability(ability);
            format!("Ability: {side} {} has {ability}", member.species)
        } else if let Some(item) = strip_effect_prefix(effect, "item") {
            member.record_item(item);
            format!("Item: {side} {} holds {item}", member.species)
        } else {
            return state;
        };

        state.log(HistoryEntry::new(side, ActionKind::Other, description));
        state
    }

    fn on_effectiveness(
        &mut self,
        mut state: BattleState,
        defender: &PokemonRef,
        signal: Effectiveness,
    ) -> BattleState {
        let Some(last) = self.last_move.as_ref() else {
            return state;
        };

        // Self-hits and confusion damage say nothing about the matchup
        if last.side == defender.player {
            tracing::debug!(side = %last.side, move_id = %last.move_id, "ignoring same-side effectiveness");
            return state;
        }

        let player = state.player(defender.player);
        let index = resolve_member(player, defender);
        let Some(species) = player
            .team
            .get(index)
            .filter(|p| !p.is_placeholder())
            .map(|p| p.species.clone())
        else {
            return state;
        };

        let move_id = last.move_id.clone();
        let multiplier = signal.multiplier();
        state.record_effectiveness(&species, &move_id, multiplier);
        state.log(HistoryEntry::new(
            defender.player,
            ActionKind::Other,
            format!("Effectiveness: {move_id} x{multiplier} on {species}"),
        ));
        state
    }
}

/// Team index an event about `pokemon` refers to: the member whose species
/// matches the label, otherwise the side's active member.
fn resolve_member(player: &PlayerState, pokemon: &PokemonRef) -> usize {
    player
        .find_species(&pokemon.name)
        .unwrap_or(player.active_slot)
}

fn member_mut<'a>(player: &'a mut PlayerState, pokemon: &PokemonRef) -> &'a mut PokemonState {
    let index = resolve_member(player, pokemon);
    player.ensure_slot(index);
    &mut player.team[index]
}

/// Team index a switch-in lands on.
///
/// A member already known by species keeps its slot (and everything revealed
/// about it); otherwise the addressed position is used while it still holds a
/// placeholder, then the first placeholder, then a new slot at the end.
/// Only the species from the details field is matched; the nickname in the
/// slot label never is.
fn resolve_switch_slot(player: &mut PlayerState, species: &str, position: usize) -> usize {
    if let Some(index) = player.find_species(species) {
        return index;
    }

    player.ensure_slot(position);
    if player.team[position].is_placeholder() {
        return position;
    }

    match player.team.iter().position(|p| p.is_placeholder()) {
        Some(index) => index,
        None => {
            let index = player.team.len();
            player.ensure_slot(index);
            index
        }
    }
}

fn on_player(mut state: BattleState, side: Player, username: &str, rating: Option<u32>) -> BattleState {
    if username.eq_ignore_ascii_case(&state.player_self.name) {
        state.bind_self_side(side);
        state.player_self.rating = rating.or(state.player_self.rating);
    } else {
        state.player_opponent.name = username.to_string();
        state.player_opponent.rating = rating.or(state.player_opponent.rating);
    }
    state.log(HistoryEntry::new(side, ActionKind::Other, format!("Player: {side} is {username}")));
    state
}

fn on_gen(mut state: BattleState, generation: u8) -> BattleState {
    state.generation = generation;
    state.log(HistoryEntry::field(format!("Gen: {generation}")));
    state
}

fn on_tier(mut state: BattleState, tier: &str) -> BattleState {
    state.format = tier.to_string();
    state.log(HistoryEntry::field(format!("Tier: {tier}")));
    state
}

fn on_turn(state: BattleState, turn: u32) -> BattleState {
    let mut state = state.with_turn(turn);
    state.log(HistoryEntry::field(format!("Turn: {turn}")));
    state
}

fn on_switch(
    mut state: BattleState,
    pokemon: &PokemonRef,
    details: &PokemonDetails,
    hp_status: &HpStatus,
    forced: bool,
) -> BattleState {
    let side = pokemon.player;
    let species = details.species.trim();
    if species.is_empty() {
        return state;
    }

    let player = state.player_mut(side);
    let index = resolve_switch_slot(player, species, pokemon.slot);

    let member = &mut player.team[index];
    member.species = species.to_string();
    if let Some(level) = details.level {
        member.level = level;
    }
    member.boosts.clear();
    member.volatiles = Default::default();
    member.last_move = None;
    member.apply_hp_status(hp_status);
    if !member.fainted {
        member.status = hp_status.status.as_deref().and_then(Status::from_protocol);
    }

    player.set_active(index);

    // Phazing and Illusion reveals are not switches the side chose
    let entry = if forced {
        HistoryEntry::new(side, ActionKind::Other, format!("Drag: {side} {species} forced in"))
    } else {
        HistoryEntry::new(side, ActionKind::Switch, format!("Switch: {side} sent out {species}"))
    };
    state.log(entry);
    state
}

fn on_faint(mut state: BattleState, pokemon: &PokemonRef) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    let member = member_mut(player, pokemon);
    member.faint();
    let species = member.species.clone();

    state.log(HistoryEntry::new(side, ActionKind::Other, format!("Faint: {side} {species}")));
    state
}

fn on_hp(mut state: BattleState, pokemon: &PokemonRef, hp_status: &HpStatus) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    let member = member_mut(player, pokemon);
    member.apply_hp_status(hp_status);
    let description = format!(
        "HP: {side} {} at {:.0}%",
        member.species,
        member.hp_fraction * 100.0
    );

    state.log(HistoryEntry::new(side, ActionKind::Other, description));
    state
}

fn on_status(mut state: BattleState, pokemon: &PokemonRef, status: Option<&String>) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    let member = member_mut(player, pokemon);

    let description = match status {
        Some(code) => {
            let Some(parsed) = Status::from_protocol(code) else {
                return state;
            };
            member.status = Some(parsed);
            format!("Status: {side} {} is {parsed}", member.species)
        }
        None => {
            member.status = None;
            format!("Status: {side} {} cured", member.species)
        }
    };

    state.log(HistoryEntry::new(side, ActionKind::Other, description));
    state
}

fn on_boost(mut state: BattleState, pokemon: &PokemonRef, stat: Stat, amount: i8) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    let member = member_mut(player, pokemon);
    let applied = member.boosts.boost(stat, amount);
    let description = format!("Boost: {side} {} {stat:?} {applied:+}", member.species);

    state.log(HistoryEntry::new(side, ActionKind::Other, description));
    state
}

fn on_clear_boost(mut state: BattleState, pokemon: &PokemonRef) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    member_mut(player, pokemon).boosts.clear();

    state.log(HistoryEntry::new(side, ActionKind::Other, format!("ClearBoost: {side}")));
    state
}

fn on_volatile(mut state: BattleState, pokemon: &PokemonRef, effect: &str, start: bool) -> BattleState {
    let Some(volatile) = VolatileEffect::from_protocol(effect) else {
        return state;
    };

    let side = pokemon.player;
    let player = state.player_mut(side);
    let member = member_mut(player, pokemon);
    if start {
        member.volatiles.start(volatile);
    } else {
        member.volatiles.end(volatile);
    }

    let verb = if start { "Start" } else { "End" };
    state.log(HistoryEntry::new(side, ActionKind::Other, format!("{verb}: {side} {effect}")));
    state
}

fn on_item(mut state: BattleState, pokemon: &PokemonRef, item: &str) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    member_mut(player, pokemon).record_item(item);

    state.log(HistoryEntry::new(side, ActionKind::Other, format!("Item: {side} {item}")));
    state
}

fn on_ability(mut state: BattleState, pokemon: &PokemonRef, ability: &str) -> BattleState {
    let side = pokemon.player;
    let player = state.player_mut(side);
    member_mut(player, pokemon).record_ability(ability);

    state.log(HistoryEntry::new(side, ActionKind::Other, format!("Ability: {side} {ability}")));
    state
}

fn on_weather(mut state: BattleState, weather: &str) -> BattleState {
    state.field.set_weather(weather);
    state.log(HistoryEntry::field(format!("Weather: {weather}")));
    state
}

fn on_terrain(mut state: BattleState, terrain: &str) -> BattleState {
    state.field.set_terrain(terrain);
    state.log(HistoryEntry::field(format!("Terrain: {terrain}")));
    state
}

fn on_field(mut state: BattleState, condition: &str, start: bool) -> BattleState {
    if start {
        state.field.apply_field_start(condition);
    } else {
        state.field.apply_field_end(condition);
    }

    let verb = if start { "FieldStart" } else { "FieldEnd" };
    state.log(HistoryEntry::field(format!("{verb}: {condition}")));
    state
}

fn on_side_condition(mut state: BattleState, side: Player, condition: &str, start: bool) -> BattleState {
    if !state.field.apply_side_condition(side, condition, start) {
        return state;
    }

    let verb = if start { "SideStart" } else { "SideEnd" };
    state.log(HistoryEntry::new(side, ActionKind::Other, format!("{verb}: {side} {condition}")));
    state
}
