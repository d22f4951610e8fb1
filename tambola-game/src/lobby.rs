use crate::events::{EventChannel, GameEvent, Notification};
use crate::{ClaimOutcome, GameRegistry, GameSummary, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tambola_core::{ClaimType, GameId, PlayerId, Ticket};

/// Returned to the host when a game is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInvite {
    pub game_id: GameId,
    pub invite_link: String,
}

/// Returned to the joining connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinedPlayer {
    pub player_id: PlayerId,
    pub ticket: Ticket,
}

/// Entry point for transports: looks games up, applies each operation under
/// the game's lock, then publishes what changed.
pub struct Lobby {
    registry: Arc<GameRegistry>,
    channel: Arc<dyn EventChannel>,
}

impl Lobby {
    pub fn new(registry: Arc<GameRegistry>, channel: Arc<dyn EventChannel>) -> Self {
        Self { registry, channel }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn create_game(&self) -> GameInvite {
        let (game_id, _) = self.registry.create();
        let invite_link = self.registry.config().invite_link(&game_id);

        GameInvite {
            game_id,
            invite_link,
        }
    }

    pub fn join_game(&self, game_id: &GameId, name: &str) -> Result<JoinedPlayer> {
        let game = self.registry.get(game_id)?;
        let joined = game.lock().join(name)?;

        self.channel.publish(Notification::player(
            game_id,
            &joined.player_id,
            GameEvent::Ticket {
                player_id: joined.player_id.clone(),
                ticket: joined.ticket.clone(),
            },
        ));
        self.channel.publish(Notification::room(
            game_id,
            GameEvent::Players {
                names: joined.roster,
            },
        ));

        Ok(JoinedPlayer {
            player_id: joined.player_id,
            ticket: joined.ticket,
        })
    }

    pub fn draw(&self, game_id: &GameId) -> Result<Option<u8>> {
        let game = self.registry.get(game_id)?;
        let drawn = game.lock().draw();

        match drawn {
            Some(number) => {
                self.channel
                    .publish(Notification::room(game_id, GameEvent::Number { number }));
            }
            None => tracing::debug!("Game {} has no numbers left to draw", game_id),
        }

        Ok(drawn)
    }

    pub fn claim(
        &self,
        game_id: &GameId,
        player_id: &PlayerId,
        claim: ClaimType,
        marked: &HashSet<u8>,
    ) -> Result<ClaimOutcome> {
        let game = self.registry.get(game_id)?;
        let outcome = game.lock().claim(player_id, claim, marked)?;

        let notification = match &outcome {
            ClaimOutcome::Valid { history } => Notification::room(
                game_id,
                GameEvent::History {
                    history: history.clone(),
                },
            ),
            ClaimOutcome::Invalid { .. } => {
                Notification::player(game_id, player_id, GameEvent::Invalid { claim })
            }
        };
        self.channel.publish(notification);

        Ok(outcome)
    }

    /// Results sheet for the game, one section per prize.
    pub fn results(&self, game_id: &GameId) -> Result<String> {
        let game = self.registry.get(game_id)?;
        let text = game.lock().history().to_string();
        Ok(text)
    }

    pub fn summary(&self, game_id: &GameId) -> Result<GameSummary> {
        let game = self.registry.get(game_id)?;
        let summary = game.lock().summary();
        Ok(summary)
    }

    pub fn drawn_numbers(&self, game_id: &GameId) -> Result<Vec<u8>> {
        let game = self.registry.get(game_id)?;
        let drawn = game.lock().drawn().to_vec();
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Audience, BroadcastHub, MemoryChannel, Viewer};
    use crate::{GameError, RejectReason};
    use tambola_core::GameConfig;

    fn lobby() -> (Lobby, Arc<MemoryChannel>) {
        let channel = Arc::new(MemoryChannel::new());
        let registry = Arc::new(GameRegistry::new(GameConfig::default()));
        (Lobby::new(registry, channel.clone()), channel)
    }

    #[test]
    fn test_create_game_returns_invite() {
        let (lobby, channel) = lobby();
        let invite = lobby.create_game();

        assert!(lobby.registry().contains(&invite.game_id));
        assert_eq!(
            invite.invite_link,
            format!("http://localhost:5000/join/{}", invite.game_id)
        );
        assert!(channel.notifications().is_empty());
    }

    #[test]
    fn test_join_sends_ticket_to_player_and_roster_to_room() {
        let (lobby, channel) = lobby();
        let game_id = lobby.create_game().game_id;

        lobby.join_game(&game_id, "Asha").unwrap();
        channel.take();
        let ravi = lobby.join_game(&game_id, "Ravi").unwrap();

        let published = channel.take();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].audience, Audience::Player(ravi.player_id.clone()));
        assert_eq!(
            published[0].event,
            GameEvent::Ticket {
                player_id: ravi.player_id.clone(),
                ticket: ravi.ticket.clone(),
            }
        );
        assert_eq!(published[1].audience, Audience::Room);
        assert_eq!(
            published[1].event,
            GameEvent::Players {
                names: vec!["Asha".to_string(), "Ravi".to_string()],
            }
        );
    }

    #[test]
    fn test_exhausted_pool_publishes_nothing() {
        let (lobby, channel) = lobby();
        let game_id = lobby.create_game().game_id;

        for _ in 0..100 {
            assert!(lobby.draw(&game_id).unwrap().is_some());
        }
        assert_eq!(channel.take().len(), 100);

        assert_eq!(lobby.draw(&game_id).unwrap(), None);
        assert!(channel.notifications().is_empty());
        assert_eq!(lobby.drawn_numbers(&game_id).unwrap().len(), 100);
    }

    #[test]
    fn test_valid_claim_broadcasts_history() {
        let (lobby, channel) = lobby();
        let game_id = lobby.create_game().game_id;
        let asha = lobby.join_game(&game_id, "Asha").unwrap();
        channel.take();

        let marked: HashSet<u8> = asha.ticket.row_numbers(2).collect();
        let outcome = lobby
            .claim(&game_id, &asha.player_id, ClaimType::Row3, &marked)
            .unwrap();
        assert!(outcome.is_valid());

        let published = channel.take();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].audience, Audience::Room);
        match &published[0].event {
            GameEvent::History { history } => {
                assert_eq!(history.winners(ClaimType::Row3), ["Asha"]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_claim_only_notifies_claimant() {
        let (lobby, channel) = lobby();
        let game_id = lobby.create_game().game_id;
        let ravi = lobby.join_game(&game_id, "Ravi").unwrap();
        channel.take();

        let outcome = lobby
            .claim(&game_id, &ravi.player_id, ClaimType::Full, &HashSet::new())
            .unwrap();
        assert_eq!(
            outcome,
            ClaimOutcome::Invalid {
                reason: RejectReason::PatternIncomplete
            }
        );

        let published = channel.take();
        assert_eq!(
            published,
            vec![Notification::player(
                &game_id,
                &ravi.player_id,
                GameEvent::Invalid {
                    claim: ClaimType::Full
                }
            )]
        );
    }

    #[test]
    fn test_resubmitted_claim_does_not_duplicate_winner() {
        let (lobby, _) = lobby();
        let game_id = lobby.create_game().game_id;
        let asha = lobby.join_game(&game_id, "Asha").unwrap();
        let marked: HashSet<u8> = asha.ticket.numbers().collect();

        for _ in 0..3 {
            lobby
                .claim(&game_id, &asha.player_id, ClaimType::Full, &marked)
                .unwrap();
        }

        let results = lobby.results(&game_id).unwrap();
        assert!(results.contains("Full House Winners:\n1. Asha\n\n"));
        assert!(!results.contains("2. Asha"));
    }

    #[test]
    fn test_unknown_identifiers_fail_fast() {
        let (lobby, channel) = lobby();
        let missing: GameId = "zzzzzz".parse().unwrap();

        assert!(matches!(
            lobby.join_game(&missing, "Asha"),
            Err(GameError::GameNotFound(_))
        ));
        assert!(matches!(lobby.draw(&missing), Err(GameError::GameNotFound(_))));
        assert!(matches!(lobby.results(&missing), Err(GameError::GameNotFound(_))));
        assert!(lobby.registry().is_empty());

        let game_id = lobby.create_game().game_id;
        let ghost: PlayerId = "ghost0".parse().unwrap();
        assert!(matches!(
            lobby.claim(&game_id, &ghost, ClaimType::Jaldi5, &HashSet::new()),
            Err(GameError::PlayerNotFound(_))
        ));
        assert_eq!(lobby.summary(&game_id).unwrap().player_count, 0);
        assert!(channel.notifications().is_empty());
    }

    #[test]
    fn test_results_for_fresh_game() {
        let (lobby, _) = lobby();
        let game_id = lobby.create_game().game_id;
        let results = lobby.results(&game_id).unwrap();

        assert!(results.starts_with("🎯 Tambola Game Results\n\n"));
        assert_eq!(results.matches("None\n").count(), 5);
    }

    #[tokio::test]
    async fn test_subscribers_receive_draws() {
        let hub = Arc::new(BroadcastHub::new(128));
        let registry = Arc::new(GameRegistry::new(GameConfig::default()));
        let lobby = Lobby::new(registry, hub.clone());

        let game_id = lobby.create_game().game_id;
        let mut host = hub.subscribe(&game_id, Viewer::Host);

        let number = lobby.draw(&game_id).unwrap().unwrap();
        let received = host.recv().await.unwrap();
        assert_eq!(received.event, GameEvent::Number { number });
    }
}
