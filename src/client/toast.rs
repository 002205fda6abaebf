//! Toast notifications.
//!
//! Entries stack in arrival order. Each one owns its own expiry timer, so
//! dismissing or expiring one entry never touches the others.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use uuid::Uuid;

/// How long a toast stays up unless dismissed.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastEntry {
    pub id: ToastId,
    pub severity: Severity,
    pub message: String,
    pub ttl: Duration,
}

/// Shared, append-only toast stack.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    entries: Arc<Mutex<Vec<ToastEntry>>>,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            ttl,
        }
    }

    /// Show a toast with the queue's default lifetime.
    pub fn show(&self, severity: Severity, message: impl Into<String>) -> ToastId {
        self.show_for(severity, message, self.ttl)
    }

    /// Show a toast that expires after `ttl`.
    ///
    /// Expiry needs a Tokio runtime; without one the toast stays until dismissed.
    pub fn show_for(&self, severity: Severity, message: impl Into<String>, ttl: Duration) -> ToastId {
        let entry = ToastEntry {
            id: ToastId(Uuid::new_v4()),
            severity,
            message: message.into(),
            ttl,
        };
        let id = entry.id;

        tracing::debug!(toast_id = %id, severity = severity.as_str(), message = %entry.message, "Toast shown");
        self.lock().push(entry);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let queue = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                queue.dismiss(id);
            });
        }

        id
    }

    /// Remove one toast (expiry or a click). Returns false if it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    /// Snapshot of the visible toasts, oldest first.
    pub fn entries(&self) -> Vec<ToastEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ToastEntry>> {
        // A panic mid-push cannot leave the Vec inconsistent.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn messages(queue: &ToastQueue) -> Vec<String> {
        queue.entries().into_iter().map(|e| e.message).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_ttl() {
        let queue = ToastQueue::default();
        queue.show(Severity::Info, "hello");

        sleep(Duration::from_millis(3_900)).await;
        assert_eq!(queue.len(), 1);

        sleep(Duration::from_millis(200)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissing_one_leaves_other_timers_alone() {
        let queue = ToastQueue::default();
        let first = queue.show(Severity::Error, "first");
        sleep(Duration::from_secs(1)).await;
        queue.show(Severity::Success, "second");
        sleep(Duration::from_secs(1)).await;
        queue.show(Severity::Info, "third");

        assert_eq!(messages(&queue), ["first", "second", "third"]);
        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(messages(&queue), ["second", "third"]);

        // t = 4.5s: second expires at 5s, third at 6s.
        sleep(Duration::from_millis(2_500)).await;
        assert_eq!(messages(&queue), ["second", "third"]);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(messages(&queue), ["third"]);

        sleep(Duration::from_secs(1)).await;
        assert!(queue.is_empty());
    }

    #[test]
    fn test_without_runtime_toasts_persist() {
        let queue = ToastQueue::default();
        let id = queue.show(Severity::Info, "sticky");
        assert_eq!(queue.len(), 1);
        assert!(queue.dismiss(id));
    }
}
