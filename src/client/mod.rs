//! Client-side interaction subsystem.
//!
//! # Data Flow
//! ```text
//! user gesture (UserAction)
//!     → pipeline.rs (re-entry guard per control)
//!     → modal.rs    (confirm removal / prompt for cost, resolves once)
//!     → transport.rs (GatewayClient → mutation route → ResultEnvelope)
//!       busy.rs marker held for the request
//!     → toast.rs    (success | failure | fault)
//!     → refresh.rs  (success only, after the reload delay)
//! ```
//!
//! # Design Decisions
//! - Overlay services are owned and injected, never global
//! - Transport and refresh sit behind traits so the pipeline runs without a network
//! - No retries: every failure needs a new gesture

pub mod busy;
pub mod modal;
pub mod overlay;
pub mod pipeline;
pub mod refresh;
pub mod toast;
pub mod transport;

pub use busy::{BusyGuard, BusyIndicator};
pub use modal::{InputValidator, ModalEvent, ModalHost, ModalKind, ModalView};
pub use overlay::Overlay;
pub use pipeline::{
    parse_cost, ActionPipeline, ControlKey, Outcome, PipelineState, RunReport, Settlement,
    UserAction, DEFAULT_RELOAD_DELAY,
};
pub use refresh::{PageRefresher, ViewRefresher};
pub use toast::{Severity, ToastEntry, ToastId, ToastQueue, DEFAULT_TOAST_TTL};
pub use transport::{GatewayClient, MutationTransport, TransportError};
