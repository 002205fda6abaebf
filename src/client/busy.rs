//! Busy indicator.
//!
//! A marker lives exactly as long as its `BusyGuard`, so an early return or
//! an error path cannot leave it behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

#[derive(Debug, Clone, Default)]
pub struct BusyIndicator {
    markers: Arc<DashMap<u64, String>>,
    next_id: Arc<AtomicU64>,
}

impl BusyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `label` until the returned guard is dropped.
    #[must_use = "the marker is removed when the guard drops"]
    pub fn show(&self, label: impl Into<String>) -> BusyGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.markers.insert(id, label.into());
        BusyGuard {
            markers: Arc::clone(&self.markers),
            id,
        }
    }

    pub fn is_busy(&self) -> bool {
        !self.markers.is_empty()
    }

    /// Visible labels, oldest first.
    pub fn labels(&self) -> Vec<String> {
        let mut markers: Vec<(u64, String)> = self
            .markers
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        markers.sort_by_key(|(id, _)| *id);
        markers.into_iter().map(|(_, label)| label).collect()
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    markers: Arc<DashMap<u64, String>>,
    id: u64,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.markers.remove(&self.id);
    }
}
