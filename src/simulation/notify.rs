//! Per-soldier notification queues

use std::collections::VecDeque;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{CellPos, SimTime, SoldierId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BaseUnderAttack,
    SoldierUnderAttack,
    LowHealth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Where the event happened
    pub position: CellPos,
    pub from: Option<SoldierId>,
    pub time: SimTime,
    /// Free text, never interpreted by the engine
    pub message: String,
}

/// Ordered queue per recipient; receivers drain their own queue
#[derive(Debug, Clone, Default)]
pub struct NotificationChannel {
    queues: AHashMap<SoldierId, VecDeque<Notification>>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, to: SoldierId, notification: Notification) {
        self.queues.entry(to).or_default().push_back(notification);
    }

    /// Deliver a copy to each recipient
    pub fn broadcast<'a, I>(&mut self, recipients: I, notification: &Notification)
    where
        I: IntoIterator<Item = &'a SoldierId>,
    {
        for to in recipients {
            self.send(*to, notification.clone());
        }
    }

    pub fn pending(&self, soldier: SoldierId) -> usize {
        self.queues.get(&soldier).map_or(0, VecDeque::len)
    }

    pub fn peek(&self, soldier: SoldierId) -> impl Iterator<Item = &Notification> {
        self.queues.get(&soldier).into_iter().flatten()
    }

    /// Take everything queued for `soldier`, oldest first
    pub fn drain(&mut self, soldier: SoldierId) -> Vec<Notification> {
        self.queues
            .get_mut(&soldier)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }
}
