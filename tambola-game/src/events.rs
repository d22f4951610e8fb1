//! Room notifications and the channels that carry them.
//!
//! Game operations only describe what changed; the [`Lobby`](crate::Lobby)
//! turns those descriptions into [`Notification`]s and hands them to an
//! [`EventChannel`] once the game lock has been released.

use crate::ClaimHistory;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tambola_core::{ClaimType, GameId, PlayerId, Ticket};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    /// Ticket dealt to a joining player
    Ticket { player_id: PlayerId, ticket: Ticket },
    /// Current roster
    Players { names: Vec<String> },
    Number { number: u8 },
    History { history: ClaimHistory },
    Invalid { claim: ClaimType },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Room,
    Player(PlayerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub game_id: GameId,
    pub audience: Audience,
    pub event: GameEvent,
}

impl Notification {
    pub fn room(game_id: &GameId, event: GameEvent) -> Self {
        Self {
            game_id: game_id.clone(),
            audience: Audience::Room,
            event,
        }
    }

    pub fn player(game_id: &GameId, player_id: &PlayerId, event: GameEvent) -> Self {
        Self {
            game_id: game_id.clone(),
            audience: Audience::Player(player_id.clone()),
            event,
        }
    }

    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        match (&self.audience, viewer) {
            (Audience::Room, _) => true,
            (Audience::Player(target), Viewer::Player(id)) => target == id,
            (Audience::Player(_), Viewer::Host) => false,
        }
    }
}

/// Who is on the receiving end of a room subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Host,
    Player(PlayerId),
}

/// Per-room publish side. Delivery is fire-and-forget.
pub trait EventChannel: Send + Sync {
    fn publish(&self, notification: Notification);
}

/// In-process fan-out with one tokio broadcast channel per room.
pub struct BroadcastHub {
    capacity: usize,
    rooms: RwLock<HashMap<GameId, broadcast::Sender<Notification>>>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            rooms: RwLock::new(HashMap::new()),
        }
    }

    fn sender(&self, game_id: &GameId) -> broadcast::Sender<Notification> {
        if let Some(sender) = self.rooms.read().get(game_id) {
            return sender.clone();
        }

        let mut rooms = self.rooms.write();
        rooms
            .entry(game_id.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    pub fn subscribe(&self, game_id: &GameId, viewer: Viewer) -> RoomSubscription {
        RoomSubscription {
            viewer,
            receiver: self.sender(game_id).subscribe(),
        }
    }

    pub fn subscriber_count(&self, game_id: &GameId) -> usize {
        self.rooms
            .read()
            .get(game_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}

impl EventChannel for BroadcastHub {
    fn publish(&self, notification: Notification) {
        let sender = self.sender(&notification.game_id);
        // No subscribers yet is fine.
        if sender.send(notification).is_err() {
            tracing::trace!("Dropped notification for a room with no subscribers");
        }
    }
}

/// One connection's view of a room.
pub struct RoomSubscription {
    viewer: Viewer,
    receiver: broadcast::Receiver<Notification>,
}

impl RoomSubscription {
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Next notification addressed to this viewer.
    ///
    /// `RecvError::Lagged` means older notifications were overwritten; the
    /// subscription remains usable.
    pub async fn recv(&mut self) -> Result<Notification, RecvError> {
        loop {
            let notification = self.receiver.recv().await?;
            if notification.is_visible_to(&self.viewer) {
                return Ok(notification);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv); `TryRecvError::Empty`
    /// once everything published so far has been seen.
    pub fn try_recv(&mut self) -> Result<Notification, TryRecvError> {
        loop {
            let notification = self.receiver.try_recv()?;
            if notification.is_visible_to(&self.viewer) {
                return Ok(notification);
            }
        }
    }
}

/// Records everything published, in order.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    published: Mutex<Vec<Notification>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.published.lock().clone()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.published.lock())
    }
}

impl EventChannel for MemoryChannel {
    fn publish(&self, notification: Notification) {
        self.published.lock().push(notification);
    }
}
