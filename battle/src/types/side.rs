//! Player (side) state

use serde::{Deserialize, Serialize};

use super::pokemon::PokemonState;

pub const TEAM_SIZE: usize = 6;

/// One player's side of the battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Display name
    pub name: String,

    pub rating: Option<u32>,

    /// Index into `team` of the Pokemon on the field
    pub active_slot: usize,

    /// Team in slot order; unrevealed slots hold placeholders
    pub team: Vec<PokemonState>,
}

impl PlayerState {
    /// A player with six placeholder slots
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating: None,
            active_slot: 0,
            team: PokemonState::empty_team(),
        }
    }

    pub fn active_pokemon(&self) -> Option<&PokemonState> {
        self.team.get(self.active_slot)
    }

    /// Iterate over bench Pokemon that could come in (not active, not fainted)
    pub fn bench(&self) -> impl Iterator<Item = (usize, &PokemonState)> {
        self.team
            .iter()
            .enumerate()
            .filter(move |(idx, poke)| *idx != self.active_slot && !poke.active && poke.is_alive())
    }

    /// Count non-fainted members, placeholders included
    pub fn alive_count(&self) -> usize {
        self.team.iter().filter(|p| !p.fainted).count()
    }

    /// Find a team member by species (case-insensitive)
    pub fn find_species(&self, species: &str) -> Option<usize> {
        self.team
            .iter()
            .position(|p| p.species.eq_ignore_ascii_case(species))
    }

    /// Grow the team with placeholders until `index` is addressable
    pub fn ensure_slot(&mut self, index: usize) {
        while self.team.len() <= index {
            let next = self.team.len();
            self.team.push(PokemonState::unknown(next));
        }
    }

    /// Make `index` the only active team member
    pub fn set_active(&mut self, index: usize) {
        for (idx, poke) in self.team.iter_mut().enumerate() {
            if idx == index {
                poke.active = true;
            } else if poke.active {
                poke.on_switch_out();
            }
        }
        self.active_slot = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_player() -> PlayerState {
        let mut player = PlayerState::new("TestUser");
        player.team[0] = PokemonState::new("Pikachu", 50);
        player.team[1] = PokemonState::new("Charizard", 50);
        player.team[2] = PokemonState::new("Blastoise", 50);
        player.team[2].faint();
        player.set_active(0);
        player
    }

    #[test]
    fn test_new_player_has_six_placeholders() {
        let player = PlayerState::new("Alice");
        assert_eq!(player.team.len(), TEAM_SIZE);
        assert_eq!(player.active_slot, 0);
        assert!(player.team.iter().all(PokemonState::is_placeholder));
    }

    #[test]
    fn test_bench_skips_active_and_fainted() {
        let player = create_test_player();
        let bench: Vec<_> = player.bench().map(|(_, p)| p.species.as_str()).collect();
        assert_eq!(
            bench,
            vec!["Charizard", "unknown-4", "unknown-5", "unknown-6"]
        );
    }

    #[test]
    fn test_alive_count() {
        let player = create_test_player();
        assert_eq!(player.alive_count(), 5);
    }

    #[test]
    fn test_find_species() {
        let player = create_test_player();
        assert_eq!(player.find_species("charizard"), Some(1));
        assert_eq!(player.find_species("Mew"), None);
    }

    #[test]
    fn test_set_active_switches_out_previous() {
        let mut player = create_test_player();
        player.team[0].boosts.spe = 2;

        player.set_active(1);

        assert!(!player.team[0].active);
        assert!(player.team[0].boosts.is_clear());
        assert!(player.team[1].active);
        assert_eq!(player.active_pokemon().unwrap().species, "Charizard");
    }

    #[test]
    fn test_ensure_slot_grows_with_placeholders() {
        let mut player = PlayerState::new("Test");
        player.team.truncate(2);
        player.ensure_slot(3);
        assert_eq!(player.team.len(), 4);
        assert_eq!(player.team[3].species, "unknown-4");
    }
}
