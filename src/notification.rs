//! Short-lived status messages shown after an operation completes

use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Outcome a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A visible status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Sequence number; a newer notification always has a larger id
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    timer: Option<JoinHandle<()>>,
    next_id: u64,
}

impl Slot {
    fn clear(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.current = None;
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds at most one notification; raising a new one replaces the old.
///
/// Each notification expires after a fixed duration. Expiry runs on the current tokio
/// runtime; outside a runtime the notification stays until dismissed.
#[derive(Clone)]
pub struct NotificationChannel {
    slot: Arc<Mutex<Slot>>,
    duration: Duration,
}

impl NotificationChannel {
    /// Create a channel whose notifications expire after `duration`
    pub fn new(duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            duration,
        }
    }

    /// How long a notification stays visible
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Show `message`, replacing whatever is visible, and return its id
    pub fn raise(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let mut slot = lock(&self.slot);
        slot.clear();
        slot.next_id += 1;
        let id = slot.next_id;
        let message = message.into();
        debug!("Notification {} ({:?}): {}", id, kind, message);
        slot.current = Some(Notification { id, kind, message });

        match Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.slot);
                let duration = self.duration;
                slot.timer = Some(handle.spawn(expire(weak, id, duration)));
            }
            Err(_) => warn!("No async runtime; notification {} will not expire on its own", id),
        }
        id
    }

    /// Raise a success notification
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.raise(NotificationKind::Success, message)
    }

    /// Raise a failure notification
    pub fn failure(&self, message: impl Into<String>) -> u64 {
        self.raise(NotificationKind::Failure, message)
    }

    /// Hide the visible notification and cancel its timer
    pub fn dismiss(&self) {
        lock(&self.slot).clear();
    }

    /// Hide notification `id` if it is still the visible one
    pub fn withdraw(&self, id: u64) {
        let mut slot = lock(&self.slot);
        if slot.current.as_ref().map(|n| n.id) == Some(id) {
            slot.clear();
        }
    }

    /// The visible notification, if any
    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }
}

async fn expire(slot: Weak<Mutex<Slot>>, id: u64, duration: Duration) {
    tokio::time::sleep(duration).await;
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let mut slot = lock(&slot);
    if slot.current.as_ref().map(|n| n.id) == Some(id) {
        debug!("Notification {} expired", id);
        slot.current = None;
        slot.timer = None;
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_duration() {
        let channel = NotificationChannel::default();
        channel.success("Expense added successfully!");

        sleep(Duration::from_millis(2999)).await;
        assert_eq!(
            channel.current().map(|n| n.message),
            Some("Expense added successfully!".to_string())
        );

        sleep(Duration::from_millis(2)).await;
        assert!(channel.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notification_replaces_old() {
        let channel = NotificationChannel::default();
        let first = channel.success("first");
        sleep(Duration::from_millis(2000)).await;
        let second = channel.failure("second");
        assert!(second > first);

        // the first timer would have fired here
        sleep(Duration::from_millis(1500)).await;
        let current = channel.current().unwrap();
        assert_eq!(current.id, second);
        assert_eq!(current.kind, NotificationKind::Failure);

        sleep(Duration::from_millis(1600)).await;
        assert!(channel.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_timer() {
        let channel = NotificationChannel::default();
        channel.success("saved");
        sleep(Duration::from_millis(1000)).await;
        channel.dismiss();
        assert!(channel.current().is_none());

        let later = channel.success("again");
        // the dismissed timer must not clear the newer notification
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(channel.current().map(|n| n.id), Some(later));
    }

    #[tokio::test(start_paused = true)]
    async fn test_withdraw_only_clears_matching_id() {
        let channel = NotificationChannel::default();
        let first = channel.success("first");
        let second = channel.success("second");

        channel.withdraw(first);
        assert_eq!(channel.current().map(|n| n.id), Some(second));

        channel.withdraw(second);
        assert!(channel.current().is_none());
    }

    #[test]
    fn test_without_runtime_stays_until_dismissed() {
        let channel = NotificationChannel::new(Duration::from_millis(1));
        channel.failure("offline");
        std::thread::sleep(Duration::from_millis(5));
        assert!(channel.current().is_some());
        channel.dismiss();
        assert!(channel.current().is_none());
    }
}
