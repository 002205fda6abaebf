//! The presentation services one page owns: toasts, modals, busy markers.
//!
//! Built once per front end and handed to whatever needs it; nothing here
//! is global.

use std::sync::Arc;
use std::time::Duration;

use crate::client::busy::BusyIndicator;
use crate::client::modal::ModalHost;
use crate::client::toast::{ToastQueue, DEFAULT_TOAST_TTL};

#[derive(Debug, Clone)]
pub struct Overlay {
    pub toasts: ToastQueue,
    pub modals: Arc<ModalHost>,
    pub busy: BusyIndicator,
}

impl Overlay {
    pub fn new(toast_ttl: Duration) -> Self {
        let toasts = ToastQueue::new(toast_ttl);
        Self {
            modals: Arc::new(ModalHost::new(toasts.clone())),
            toasts,
            busy: BusyIndicator::new(),
        }
    }
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}
