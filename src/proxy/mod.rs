//! Mutation proxy subsystem.
//!
//! # Data Flow
//! ```text
//! browser write (path ids + JSON/form body)
//!     → intent.rs (MutationIntent, structural id check only)
//!     → intent.rs (upstream path/query/body mapping)
//!     → upstream client (single attempt)
//!     → envelope.rs ({success: true, data} | {success: false, error} + 400)
//! ```
//!
//! # Design Decisions
//! - Pure translation: no business validation, values pass through unchanged
//! - Upstream error detail is logged, the browser only sees a generic message
//! - No dedup; duplicate submissions are the client pipeline's concern

pub mod envelope;
pub mod intent;

use crate::config::TeamDefaults;
use crate::observability::metrics;
use crate::upstream::{UpstreamCallSpec, UpstreamClient};

pub use envelope::ResultEnvelope;
pub use intent::{CreateTeamIntent, IntentError, MutationAction, MutationIntent};

/// Generic failure text for team creation.
pub const CREATE_TEAM_FAILURE: &str = "Failed to create team";

/// Forwards user mutations to the upstream API.
#[derive(Debug, Clone)]
pub struct MutationProxy {
    upstream: UpstreamClient,
    team_defaults: TeamDefaults,
}

impl MutationProxy {
    pub fn new(upstream: UpstreamClient, team_defaults: TeamDefaults) -> Self {
        Self {
            upstream,
            team_defaults,
        }
    }

    /// Forward one roster mutation.
    pub async fn execute(&self, intent: &MutationIntent, request_id: &str) -> ResultEnvelope {
        let call = intent.to_upstream_call();
        self.forward(
            &call,
            intent.action.kind(),
            intent.action.failure_message(),
            request_id,
        )
        .await
    }

    /// Forward a team-creation submission.
    pub async fn create_team(&self, intent: &CreateTeamIntent, request_id: &str) -> ResultEnvelope {
        let call = intent.to_upstream_call(&self.team_defaults);
        self.forward(&call, "create_team", CREATE_TEAM_FAILURE, request_id)
            .await
    }

    async fn forward(
        &self,
        call: &UpstreamCallSpec,
        kind: &'static str,
        failure_message: &'static str,
        request_id: &str,
    ) -> ResultEnvelope {
        let envelope = match self.upstream.execute(call).await {
            Ok(data) => {
                tracing::info!(
                    request_id = %request_id,
                    kind,
                    upstream_path = %call.display_path(),
                    "Mutation accepted upstream"
                );
                ResultEnvelope::ok(data)
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    kind,
                    upstream_path = %call.display_path(),
                    error = %e,
                    "Mutation failed upstream"
                );
                ResultEnvelope::failure(failure_message)
            }
        };

        metrics::record_mutation(kind, envelope.success);
        envelope
    }
}
