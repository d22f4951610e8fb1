use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tambola_core::{pattern_complete, ClaimType, GameConfig, GameId, PlayerId, Ticket};
use tambola_game::{BroadcastHub, GameEvent, GameRegistry, Lobby, RoomSubscription, Viewer};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A simulated player: marks every called number on its ticket and claims
/// each prize as soon as the pattern is complete.
struct Seat {
    lobby: Arc<Lobby>,
    game_id: GameId,
    player_id: PlayerId,
    name: String,
    ticket: Ticket,
}

impl Seat {
    fn mark(&self, marked: &mut HashSet<u8>, number: u8) {
        if self.ticket.contains(number) {
            marked.insert(number);
        }
    }

    async fn run(self, mut subscription: RoomSubscription) -> Result<(String, Vec<ClaimType>)> {
        let mut marked = HashSet::new();
        let mut pending: Vec<ClaimType> = ClaimType::ALL.to_vec();
        let mut won = Vec::new();

        while !pending.is_empty() {
            match subscription.recv().await {
                Ok(notification) => match notification.event {
                    GameEvent::Number { number } => self.mark(&mut marked, number),
                    GameEvent::Invalid { claim } => {
                        tracing::warn!("{}'s {} claim was turned down", self.name, claim)
                    }
                    _ => {}
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "{} missed {} notifications, resyncing draws",
                        self.name,
                        skipped
                    );
                    for number in self.lobby.drawn_numbers(&self.game_id)? {
                        self.mark(&mut marked, number);
                    }
                }
                Err(RecvError::Closed) => break,
            }

            let ready: Vec<ClaimType> = pending
                .iter()
                .copied()
                .filter(|claim| pattern_complete(&self.ticket, *claim, &marked))
                .collect();

            for claim in ready {
                let outcome = self
                    .lobby
                    .claim(&self.game_id, &self.player_id, claim, &marked)?;
                if outcome.is_valid() {
                    won.push(claim);
                }
                pending.retain(|c| *c != claim);
            }
        }

        Ok((self.name, won))
    }
}

/// Hand every room event to `emit` until `stop` fires, then flush whatever
/// was already published. Returns how many events were relayed.
async fn relay_events<F>(
    mut host: RoomSubscription,
    mut stop: oneshot::Receiver<()>,
    mut emit: F,
) -> usize
where
    F: FnMut(&GameEvent),
{
    let mut relayed = 0;

    loop {
        tokio::select! {
            received = host.recv() => match received {
                Ok(notification) => {
                    emit(&notification.event);
                    relayed += 1;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event printer skipped {} notifications", skipped)
                }
                Err(RecvError::Closed) => return relayed,
            },
            _ = &mut stop => break,
        }
    }

    loop {
        match host.try_recv() {
            Ok(notification) => {
                emit(&notification.event);
                relayed += 1;
            }
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Event printer skipped {} notifications", skipped)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    relayed
}

fn print_event(event: &GameEvent) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{}", line),
        Err(e) => tracing::warn!("Could not encode event: {}", e),
    }
}

pub async fn play_game(
    config: GameConfig,
    names: Vec<String>,
    delay_ms: u64,
    show_events: bool,
) -> Result<()> {
    let hub = Arc::new(BroadcastHub::new(config.room_capacity));
    let registry = Arc::new(GameRegistry::new(config));
    let lobby = Arc::new(Lobby::new(registry, hub.clone()));

    let invite = lobby.create_game();
    let game_id = invite.game_id.clone();
    println!("Created game {}", game_id);
    println!("Invite link: {}", invite.invite_link);
    println!();

    let printer = show_events.then(|| {
        let host = hub.subscribe(&game_id, Viewer::Host);
        let (stop, stopped) = oneshot::channel();
        (stop, tokio::spawn(relay_events(host, stopped, print_event)))
    });

    let mut seats: Vec<JoinHandle<Result<(String, Vec<ClaimType>)>>> = Vec::new();
    for name in &names {
        let joined = lobby.join_game(&game_id, name)?;
        let subscription = hub.subscribe(&game_id, Viewer::Player(joined.player_id.clone()));

        tracing::debug!("{} holds ticket\n{}", name, joined.ticket);

        let seat = Seat {
            lobby: lobby.clone(),
            game_id: game_id.clone(),
            player_id: joined.player_id,
            name: name.trim().to_string(),
            ticket: joined.ticket,
        };
        seats.push(tokio::spawn(seat.run(subscription)));
    }

    while !seats.iter().all(|seat| seat.is_finished()) {
        if lobby.draw(&game_id)?.is_none() {
            break;
        }

        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Player", "Prizes"]);

    for seat in seats {
        let (name, won) = seat.await??;
        let prizes: Vec<&str> = won.iter().map(|claim| claim.title()).collect();
        let prizes = if prizes.is_empty() {
            "-".to_string()
        } else {
            prizes.join(", ")
        };
        table.add_row(vec![name, prizes]);
    }

    // Every claim has been published by now; let the printer catch up.
    if let Some((stop, printer)) = printer {
        let _ = stop.send(());
        let relayed = printer.await?;
        tracing::debug!("Printed {} room events", relayed);
    }

    let summary = lobby.summary(&game_id)?;
    println!();
    println!(
        "Numbers called: {} ({} left in the pool)",
        summary.drawn_count, summary.remaining_count
    );
    println!("{}", table);
    println!();
    print!("{}", lobby.results(&game_id)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seat_claims_every_prize_once_pool_is_called() {
        let hub = Arc::new(BroadcastHub::new(256));
        let registry = Arc::new(GameRegistry::new(GameConfig::default()));
        let lobby = Arc::new(Lobby::new(registry, hub.clone()));
        let game_id = lobby.create_game().game_id;

        let joined = lobby.join_game(&game_id, "Asha").unwrap();
        let subscription = hub.subscribe(&game_id, Viewer::Player(joined.player_id.clone()));
        let seat = Seat {
            lobby: lobby.clone(),
            game_id: game_id.clone(),
            player_id: joined.player_id,
            name: "Asha".to_string(),
            ticket: joined.ticket,
        };
        let handle = tokio::spawn(seat.run(subscription));

        while lobby.draw(&game_id).unwrap().is_some() {}

        let (name, mut won) = handle.await.unwrap().unwrap();
        assert_eq!(name, "Asha");
        // Won in completion order; rows finish in whatever order the draw allows.
        won.sort();
        assert_eq!(won, ClaimType::ALL.to_vec());
        assert!(lobby.results(&game_id).unwrap().contains("Full House Winners:\n1. Asha"));
    }

    #[tokio::test]
    async fn test_lagging_seat_resyncs_from_draw_history() {
        let hub = Arc::new(BroadcastHub::new(4));
        let registry = Arc::new(GameRegistry::new(GameConfig::default()));
        let lobby = Arc::new(Lobby::new(registry, hub.clone()));
        let game_id = lobby.create_game().game_id;

        let joined = lobby.join_game(&game_id, "Ravi").unwrap();
        let subscription = hub.subscribe(&game_id, Viewer::Player(joined.player_id.clone()));

        // Call everything before the seat starts listening so it lags.
        while lobby.draw(&game_id).unwrap().is_some() {}

        let seat = Seat {
            lobby: lobby.clone(),
            game_id: game_id.clone(),
            player_id: joined.player_id,
            name: "Ravi".to_string(),
            ticket: joined.ticket,
        };
        let (_, mut won) = seat.run(subscription).await.unwrap();
        won.sort();
        assert_eq!(won, ClaimType::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_event_relay_keeps_every_history_broadcast() {
        let hub = Arc::new(BroadcastHub::new(1024));
        let registry = Arc::new(GameRegistry::new(GameConfig::default()));
        let lobby = Arc::new(Lobby::new(registry, hub.clone()));
        let game_id = lobby.create_game().game_id;

        let host = hub.subscribe(&game_id, Viewer::Host);
        let (stop, stopped) = oneshot::channel();
        let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel();
        let relay = tokio::spawn(relay_events(host, stopped, move |event: &GameEvent| {
            let _ = events_tx.send(event.clone());
        }));

        let mut seats = Vec::new();
        for name in ["Asha", "Ravi", "Meera"] {
            let joined = lobby.join_game(&game_id, name).unwrap();
            let subscription =
                hub.subscribe(&game_id, Viewer::Player(joined.player_id.clone()));
            let seat = Seat {
                lobby: lobby.clone(),
                game_id: game_id.clone(),
                player_id: joined.player_id,
                name: name.to_string(),
                ticket: joined.ticket,
            };
            seats.push(tokio::spawn(seat.run(subscription)));
        }

        while lobby.draw(&game_id).unwrap().is_some() {
            tokio::task::yield_now().await;
        }

        let mut accepted = 0;
        for seat in seats {
            let (_, won) = seat.await.unwrap().unwrap();
            accepted += won.len();
        }

        stop.send(()).unwrap();
        let relayed = relay.await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = events_rx.try_recv() {
            events.push(event);
        }
        let history = events
            .iter()
            .filter(|e| matches!(e, GameEvent::History { .. }))
            .count();
        let numbers = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Number { .. }))
            .count();

        assert_eq!(accepted, 15);
        assert_eq!(history, accepted);
        assert_eq!(numbers, 100);
        assert_eq!(relayed, events.len());
    }
}
