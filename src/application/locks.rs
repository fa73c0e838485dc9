use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Registry of per-sender async locks.
///
/// Turns for the same sender queue behind one another; turns for different
/// senders never contend beyond the brief map lookup. A slot is dropped as
/// soon as no turn holds or waits on it.
#[derive(Default)]
pub struct SenderLocks {
    slots: Mutex<HashMap<String, Slot>>,
}

impl SenderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn for `sender_id` is in flight.
    pub async fn lock(&self, sender_id: &str) -> SenderGuard<'_> {
        let slot = self
            .slots()
            .entry(sender_id.to_string())
            .or_default()
            .clone();
        let guard = slot.clone().lock_owned().await;

        SenderGuard {
            locks: self,
            sender_id: sender_id.to_string(),
            slot,
            guard: Some(guard),
        }
    }

    /// Number of senders with a turn in flight or queued.
    pub fn active(&self) -> usize {
        self.slots().len()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive access to one sender's conversation, released on drop.
pub struct SenderGuard<'a> {
    locks: &'a SenderLocks,
    sender_id: String,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SenderGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut slots = self.locks.slots();
        // One reference in the map, one here: nobody else is waiting.
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(&self.sender_id);
        }
    }
}
