//! Applying `|request|` snapshots to our own side

use tactician_protocol::{BattleRequest, SidePokemon, to_id};

use super::battle::BattleState;
use crate::types::{ActionKind, DEFAULT_LEVEL, HistoryEntry, PokemonState, Status, TEAM_SIZE};

/// Refresh our team from a request.
///
/// The request is authoritative for our side: it replaces whatever the event
/// fold derived for our team, keeping only the types already known for each
/// species and the display names of moves already seen.
pub fn apply_request(mut state: BattleState, request: &BattleRequest) -> BattleState {
    let Some(side) = request.side.as_ref() else {
        return state;
    };

    if let Some(player) = side.player() {
        state.bind_self_side(player);
    }

    if side.pokemon.is_empty() {
        return state;
    }

    let previous = std::mem::take(&mut state.player_self.team);
    let mut team: Vec<PokemonState> = side
        .pokemon
        .iter()
        .map(|entry| rebuild_member(entry, &previous))
        .collect();

    while team.len() < TEAM_SIZE {
        let next = team.len();
        team.push(PokemonState::unknown(next));
    }

    let active_slot = side
        .pokemon
        .iter()
        .position(|p| p.active)
        .unwrap_or(state.player_self.active_slot.min(team.len() - 1));

    state.player_self.team = team;
    state.player_self.active_slot = active_slot;

    tracing::debug!(
        battle_id = %state.battle_id,
        rqid = ?request.rqid,
        active_slot,
        "applied request snapshot"
    );
    state.log(HistoryEntry::new(
        state.self_side(),
        ActionKind::Other,
        format!("Request: {} members", side.pokemon.len()),
    ));
    state
}

fn rebuild_member(entry: &SidePokemon, previous: &[PokemonState]) -> PokemonState {
    let details = entry.parsed_details();
    let prior = previous
        .iter()
        .find(|p| p.species.eq_ignore_ascii_case(&details.species));

    let level = details
        .level
        .or(prior.map(|p| p.level))
        .unwrap_or(DEFAULT_LEVEL);
    let mut member = PokemonState::new(details.species.clone(), level);

    let hp = entry.hp_status();
    member.hp_fraction = hp.fraction;
    member.fainted = hp.fainted || entry.is_fainted();
    if member.fainted {
        member.hp_fraction = 0.0;
    } else {
        member.status = hp.status.as_deref().and_then(Status::from_protocol);
    }

    member.moves_known = entry
        .moves
        .iter()
        .map(|id| display_move_name(id, prior))
        .collect();
    member.item = entry.known_item().map(str::to_string);
    member.ability = entry.known_ability().map(str::to_string);
    member.active = entry.active;

    if let Some(prior) = prior {
        member.types = prior.types.clone();
        member.last_move = prior.last_move.clone();
        if entry.active {
            member.boosts = prior.boosts;
            member.volatiles = prior.volatiles.clone();
        }
    }

    member
}

/// The name a move was revealed under, or its id when never seen in battle
fn display_move_name(id: &str, prior: Option<&PokemonState>) -> String {
    let wanted = to_id(id);
    prior
        .and_then(|p| p.moves_known.iter().find(|m| to_id(m) == wanted))
        .cloned()
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Interpreter;
    use crate::types::Type;
    use tactician_protocol::{Player, parse_request};

    const REQUEST: &str = r#"{
        "rqid": 3,
        "active": [{"moves": [
            {"move": "Thunderbolt", "id": "thunderbolt", "pp": 24, "maxpp": 24, "disabled": false},
            {"move": "Volt Switch", "id": "voltswitch", "pp": 32, "maxpp": 32, "disabled": false}
        ]}],
        "side": {
            "name": "TacticianBot",
            "id": "p2",
            "pokemon": [
                {"ident": "p2: Pikachu", "details": "Pikachu, L90, M", "condition": "150/211 par", "active": true,
                 "moves": ["thunderbolt", "voltswitch"], "baseAbility": "static", "item": "lightball"},
                {"ident": "p2: Gyarados", "details": "Gyarados, L82, F", "condition": "0 fnt", "active": false,
                 "moves": ["waterfall", "dragondance"], "baseAbility": "intimidate", "item": ""}
            ]
        }
    }"#;

    fn new_state() -> BattleState {
        BattleState::bootstrap("battle-1", 9, "randombattle", "TacticianBot", "Opponent")
    }

    #[test]
    fn test_request_rebuilds_self_team() {
        let request = parse_request(REQUEST).unwrap();
        let state = apply_request(new_state(), &request);

        assert_eq!(state.my_side, Some(Player::P2));

        let team = &state.player_self.team;
        assert_eq!(team.len(), 6);
        assert_eq!(state.player_self.active_slot, 0);

        let pikachu = &team[0];
        assert_eq!(pikachu.species, "Pikachu");
        assert_eq!(pikachu.level, 90);
        assert!((pikachu.hp_fraction - 150.0 / 211.0).abs() < 1e-9);
        assert_eq!(pikachu.status, Some(Status::Paralysis));
        assert_eq!(pikachu.moves_known, vec!["thunderbolt", "voltswitch"]);
        assert_eq!(pikachu.item.as_deref(), Some("lightball"));
        assert_eq!(pikachu.ability.as_deref(), Some("static"));
        assert!(pikachu.active);

        let gyarados = &team[1];
        assert!(gyarados.fainted);
        assert_eq!(gyarados.hp_fraction, 0.0);
        assert!(gyarados.item.is_none());
        assert!(!gyarados.active);

        assert!(team[2].is_placeholder());
    }

    #[test]
    fn test_request_overrides_folded_state() {
        let mut interpreter = Interpreter::new();
        let state = interpreter.feed(
            [
                "|player|p2|TacticianBot|2",
                "|switch|p2a: Pikachu|Pikachu, L90, M|100/100",
                "|move|p2a: Pikachu|Thunderbolt|p1a: Gyarados",
                "|-boost|p2a: Pikachu|spe|1",
            ],
            new_state(),
        );
        let mut state = state;
        state.player_self.team[0].types = vec![Type::Electric];

        let request = parse_request(REQUEST).unwrap();
        let state = apply_request(state, &request);

        let pikachu = state.self_active().unwrap();
        assert!((pikachu.hp_fraction - 150.0 / 211.0).abs() < 1e-9);
        assert_eq!(pikachu.types, vec![Type::Electric]);
        assert_eq!(pikachu.moves_known, vec!["Thunderbolt", "voltswitch"]);
        assert_eq!(pikachu.boosts.spe, 1);
        assert_eq!(pikachu.last_move.as_deref(), Some("Thunderbolt"));
    }

    #[test]
    fn test_request_without_team_keeps_state() {
        let request = parse_request(r#"{"wait": true, "side": {"name": "TacticianBot", "id": "p1", "pokemon": []}}"#)
            .unwrap();
        let mut state = new_state();
        state.player_self.team[0] = PokemonState::new("Mew", 100);

        let state = apply_request(state, &request);
        assert_eq!(state.my_side, Some(Player::P1));
        assert_eq!(state.player_self.team[0].species, "Mew");
    }

    #[test]
    fn test_request_without_side_is_ignored() {
        let request = parse_request(r#"{"wait": true}"#).unwrap();
        let start = new_state();
        assert_eq!(apply_request(start.clone(), &request), start);
    }
}
