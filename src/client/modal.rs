//! Single-instance modal dialogs.
//!
//! A modal is a one-shot channel between the user (who answers through
//! [`ModalHost::dispatch`]) and the code awaiting [`ModalHost::confirm`] or
//! [`ModalHost::prompt`]. Every modal resolves exactly once and leaves the
//! display as soon as it does, including when the awaiting future is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::{oneshot, watch};

use crate::client::toast::{Severity, ToastQueue};

/// Local check run on prompt input before the modal may resolve.
pub type InputValidator = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Confirm,
    Prompt,
}

/// What a front end should draw for the open modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub kind: ModalKind,
    pub title: String,
    pub message: Option<String>,
    /// Current text in the input box (prompts only).
    pub input: String,
}

/// User gestures a modal reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalEvent {
    Confirm,
    /// Enter in the input box; same as Confirm.
    Enter,
    Cancel,
    Escape,
    ClickOutside,
    Input(String),
}

enum Resolution {
    Accepted(String),
    Dismissed,
}

struct ActiveModal {
    generation: u64,
    view: ModalView,
    validator: Option<InputValidator>,
    responder: oneshot::Sender<Resolution>,
}

/// Owns the (at most one) open modal.
pub struct ModalHost {
    active: Mutex<Option<ActiveModal>>,
    view_tx: watch::Sender<Option<ModalView>>,
    generation: AtomicU64,
    toasts: ToastQueue,
}

impl ModalHost {
    /// Validation errors are reported through `toasts`.
    pub fn new(toasts: ToastQueue) -> Self {
        let (view_tx, _) = watch::channel(None);
        Self {
            active: Mutex::new(None),
            view_tx,
            generation: AtomicU64::new(0),
            toasts,
        }
    }

    /// Ask a yes/no question. Every way of closing other than Confirm is `false`.
    pub async fn confirm(&self, title: impl Into<String>, message: impl Into<String>) -> bool {
        let view = ModalView {
            kind: ModalKind::Confirm,
            title: title.into(),
            message: Some(message.into()),
            input: String::new(),
        };
        matches!(self.open(view, None).await, Resolution::Accepted(_))
    }

    /// Ask for a value. `None` when the user backs out.
    pub async fn prompt(
        &self,
        title: impl Into<String>,
        initial: impl Into<String>,
        validator: InputValidator,
    ) -> Option<String> {
        let view = ModalView {
            kind: ModalKind::Prompt,
            title: title.into(),
            message: None,
            input: initial.into(),
        };
        match self.open(view, Some(validator)).await {
            Resolution::Accepted(value) => Some(value),
            Resolution::Dismissed => None,
        }
    }

    /// Feed one user gesture to the open modal. Returns false when no modal
    /// is open.
    pub fn dispatch(&self, event: ModalEvent) -> bool {
        let mut active = self.lock();
        let Some(modal) = active.as_mut() else {
            return false;
        };

        match event {
            ModalEvent::Input(text) => {
                modal.view.input = text;
                self.view_tx.send_replace(Some(modal.view.clone()));
            }
            ModalEvent::Confirm | ModalEvent::Enter => {
                if let Some(validator) = &modal.validator {
                    if let Err(reason) = validator(&modal.view.input) {
                        tracing::debug!(title = %modal.view.title, reason = %reason, "Modal input rejected");
                        self.toasts.show(Severity::Error, reason);
                        // Still open: republish so watchers redraw the prompt.
                        self.view_tx.send_replace(Some(modal.view.clone()));
                        return true;
                    }
                }
                let value = modal.view.input.clone();
                self.resolve(&mut active, Resolution::Accepted(value));
            }
            ModalEvent::Cancel | ModalEvent::Escape | ModalEvent::ClickOutside => {
                self.resolve(&mut active, Resolution::Dismissed);
            }
        }
        true
    }

    /// The open modal, if any.
    pub fn current(&self) -> Option<ModalView> {
        self.view_tx.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.view_tx.borrow().is_some()
    }

    /// Watch the open modal; `None` means nothing is displayed.
    pub fn subscribe(&self) -> watch::Receiver<Option<ModalView>> {
        self.view_tx.subscribe()
    }

    async fn open(&self, view: ModalView, validator: Option<InputValidator>) -> Resolution {
        let (responder, response) = oneshot::channel();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        {
            let mut active = self.lock();
            if let Some(open) = active.as_ref() {
                tracing::debug!(open = %open.view.title, requested = %view.title, "Modal already open");
                return Resolution::Dismissed;
            }
            self.view_tx.send_replace(Some(view.clone()));
            *active = Some(ActiveModal {
                generation,
                view,
                validator,
                responder,
            });
        }

        let _close = CloseOnDrop {
            host: self,
            generation,
        };
        response.await.unwrap_or(Resolution::Dismissed)
    }

    fn resolve(&self, active: &mut Option<ActiveModal>, resolution: Resolution) {
        if let Some(modal) = active.take() {
            self.view_tx.send_replace(None);
            let _ = modal.responder.send(resolution);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveModal>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ModalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalHost")
            .field("current", &self.current())
            .finish()
    }
}

/// Takes the modal down if its awaiting future goes away first.
struct CloseOnDrop<'a> {
    host: &'a ModalHost,
    generation: u64,
}

impl Drop for CloseOnDrop<'_> {
    fn drop(&mut self) {
        let mut active = self.host.lock();
        if active.as_ref().is_some_and(|m| m.generation == self.generation) {
            self.host.resolve(&mut active, Resolution::Dismissed);
        }
    }
}
