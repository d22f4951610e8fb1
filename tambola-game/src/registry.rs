use crate::{GameError, GameState, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tambola_core::{GameConfig, GameId};

pub type SharedGame = Arc<Mutex<GameState>>;

/// All live games, keyed by identifier.
///
/// Entries are only ever inserted; abandoned games stay until the registry is
/// dropped. The map lock is held just long enough to find or insert an entry,
/// so work on one game never blocks another.
pub struct GameRegistry {
    config: GameConfig,
    games: RwLock<HashMap<GameId, SharedGame>>,
}

impl GameRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            games: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Register a fresh game with an empty roster and a full pool.
    pub fn create(&self) -> (GameId, SharedGame) {
        let mut games = self.games.write();

        let mut id = GameId::generate(self.config.id_length);
        while games.contains_key(&id) {
            id = GameId::generate(self.config.id_length);
        }

        let game = Arc::new(Mutex::new(GameState::new(id.clone(), &self.config)));
        games.insert(id.clone(), game.clone());

        tracing::info!("Created game {}", id);
        (id, game)
    }

    pub fn get(&self, game_id: &GameId) -> Result<SharedGame> {
        self.games
            .read()
            .get(game_id)
            .cloned()
            .ok_or_else(|| GameError::GameNotFound(game_id.clone()))
    }

    pub fn contains(&self, game_id: &GameId) -> bool {
        self.games.read().contains_key(game_id)
    }

    pub fn len(&self) -> usize {
        self.games.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.read().is_empty()
    }

    pub fn ids(&self) -> Vec<GameId> {
        self.games.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_create_and_lookup() {
        let registry = GameRegistry::new(GameConfig::default());
        assert!(registry.is_empty());

        let (id, _) = registry.create();
        assert!(registry.contains(&id));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&id).unwrap().lock().id(), &id);
        assert_eq!(registry.ids(), vec![id]);
    }

    #[test]
    fn test_unknown_game_is_not_created() {
        let registry = GameRegistry::new(GameConfig::default());
        let missing: GameId = "nope00".parse().unwrap();

        assert!(matches!(
            registry.get(&missing),
            Err(GameError::GameNotFound(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_interleaved_draws_stay_separate() {
        let registry = GameRegistry::new(GameConfig::default());
        let (a, _) = registry.create();
        let (b, _) = registry.create();

        let mut drawn_a = HashSet::new();
        let mut drawn_b = HashSet::new();
        for _ in 0..30 {
            drawn_a.insert(registry.get(&a).unwrap().lock().draw().unwrap());
            drawn_b.insert(registry.get(&b).unwrap().lock().draw().unwrap());
        }

        let history = |id: &GameId| -> HashSet<u8> {
            let game = registry.get(id).unwrap();
            let numbers = game.lock().drawn().to_vec();
            numbers.into_iter().collect()
        };
        let history_a = history(&a);
        let history_b = history(&b);
        assert_eq!(history_a, drawn_a);
        assert_eq!(history_b, drawn_b);

        let only_b: HashSet<u8> = drawn_b.difference(&drawn_a).copied().collect();
        assert!(history_a.is_disjoint(&only_b));
    }

    #[test]
    fn test_concurrent_draws_never_repeat() {
        let registry = Arc::new(GameRegistry::new(GameConfig::default()));
        let ids: Vec<GameId> = (0..4).map(|_| registry.create().0).collect();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let registry = registry.clone();
                let ids = ids.clone();
                scope.spawn(move || {
                    for _ in 0..60 {
                        for id in &ids {
                            let game = registry.get(id).unwrap();
                            game.lock().draw();
                        }
                    }
                });
            }
        });

        for id in &ids {
            let game = registry.get(id).unwrap();
            let game = game.lock();
            let unique: HashSet<u8> = game.drawn().iter().copied().collect();
            assert_eq!(game.drawn().len(), 100);
            assert_eq!(unique.len(), 100);
            assert_eq!(game.remaining_count(), 0);
        }
    }
}
