//! Transient status messages.
//!
//! A [`Notification`] holds at most one message. Showing a message schedules its
//! dismissal after the configured timeout; showing another one first cancels the
//! pending dismissal, so a newer message always gets its full display time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// How long a message stays visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct Slot {
    message: Option<String>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Slot {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation += 1;
    }
}

#[derive(Clone, Debug)]
pub struct Notification {
    slot: Arc<Mutex<Slot>>,
    timeout: Duration,
}

impl Default for Notification {
    fn default() -> Self {
        Self::new(MESSAGE_TIMEOUT)
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Notification {
    pub fn new(timeout: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            timeout,
        }
    }

    /// Display `message`, replacing the current one.
    ///
    /// Outside a tokio runtime no dismissal is scheduled and the message stays
    /// until it is replaced or cleared.
    pub fn show(&self, message: impl Into<String>) {
        let mut slot = lock(&self.slot);
        slot.cancel_timer();
        slot.message = Some(message.into());

        let Ok(handle) = Handle::try_current() else {
            return;
        };
        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let timeout = self.timeout;
        slot.timer = Some(handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut slot = lock(&shared);
            // An aborted timer can still reach this point if it woke first
            if slot.generation == generation {
                slot.message = None;
                slot.timer = None;
            }
        }));
    }

    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        slot.cancel_timer();
        slot.message = None;
    }

    pub fn message(&self) -> Option<String> {
        lock(&self.slot).message.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_message_expires() {
        let notification = Notification::default();
        notification.show("a new blog added");
        assert_eq!(notification.message().as_deref(), Some("a new blog added"));

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(notification.message().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(notification.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_gets_full_timeout() {
        let notification = Notification::default();
        notification.show("first");

        tokio::time::sleep(Duration::from_secs(3)).await;
        notification.show("second");

        // The first message's timer would have fired here
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(notification.message().as_deref(), Some("second"));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(notification.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_timer() {
        let notification = Notification::new(Duration::from_secs(1));
        notification.show("gone soon");
        notification.clear();
        assert!(notification.message().is_none());

        notification.show("again");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(notification.message().as_deref(), Some("again"));
    }

    #[test]
    fn test_without_runtime_message_persists() {
        let notification = Notification::default();
        notification.show("sticky");
        assert_eq!(notification.message().as_deref(), Some("sticky"));
        notification.clear();
        assert!(notification.message().is_none());
    }
}
