//! The action pipeline: one user gesture from click to settled UI.
//!
//! ```text
//! Idle → [AwaitingConsent] → [AwaitingInput] → Submitting → Settled → Idle
//! ```
//!
//! Consent is asked only for removals, input only for the add cost. While a
//! control's pipeline is running, further triggers of that control are
//! ignored; different controls run independently. Once `Submitting` begins
//! the request always runs to completion.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashSet;
use serde_json::json;

use crate::client::modal::InputValidator;
use crate::client::overlay::Overlay;
use crate::client::refresh::PageRefresher;
use crate::client::toast::Severity;
use crate::client::transport::MutationTransport;
use crate::proxy::{MutationAction, MutationIntent};

/// Delay between a success toast and the view refresh.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_secs(1);

pub const REMOVE_CONFIRM_TITLE: &str = "Remove Player";
pub const REMOVE_CONFIRM_MESSAGE: &str = "Are you sure you want to remove this player from the team?";
pub const COST_PROMPT_TITLE: &str = "Add Player Cost";
pub const COST_PROMPT_INITIAL: &str = "0.00";
pub const INVALID_COST: &str = "Please enter a valid cost";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A gesture on one control of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    AddPlayer {
        team_id: String,
        player_id: String,
        position_on_team: Option<String>,
    },
    RemovePlayer {
        team_id: String,
        player_id: String,
    },
    SetStarter {
        team_id: String,
        player_id: String,
        is_starter: bool,
    },
}

/// Identifies the control a gesture came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlKey {
    kind: &'static str,
    team_id: String,
    player_id: String,
}

struct ActionMessages {
    busy: &'static str,
    success: &'static str,
    failure_prefix: &'static str,
    fault: &'static str,
}

impl UserAction {
    pub fn control(&self) -> ControlKey {
        let (kind, team_id, player_id) = match self {
            UserAction::AddPlayer { team_id, player_id, .. } => ("add", team_id, player_id),
            UserAction::RemovePlayer { team_id, player_id } => ("remove", team_id, player_id),
            // Start and bench share one toggle.
            UserAction::SetStarter { team_id, player_id, .. } => ("starter", team_id, player_id),
        };
        ControlKey {
            kind,
            team_id: team_id.clone(),
            player_id: player_id.clone(),
        }
    }

    fn needs_consent(&self) -> bool {
        matches!(self, UserAction::RemovePlayer { .. })
    }

    fn needs_cost(&self) -> bool {
        matches!(self, UserAction::AddPlayer { .. })
    }

    fn messages(&self) -> ActionMessages {
        match self {
            UserAction::AddPlayer { .. } => ActionMessages {
                busy: "Adding player to team...",
                success: "Player added to team successfully!",
                failure_prefix: "Failed to add player",
                fault: "An error occurred while adding the player",
            },
            UserAction::RemovePlayer { .. } => ActionMessages {
                busy: "Removing player...",
                success: "Player removed from team successfully!",
                failure_prefix: "Failed to remove player",
                fault: "An error occurred while removing the player",
            },
            UserAction::SetStarter { is_starter: true, .. } => ActionMessages {
                busy: "Starting player...",
                success: "Player started successfully!",
                failure_prefix: "Failed to start player",
                fault: "An error occurred while updating player status",
            },
            UserAction::SetStarter { is_starter: false, .. } => ActionMessages {
                busy: "Benching player...",
                success: "Player benched successfully!",
                failure_prefix: "Failed to bench player",
                fault: "An error occurred while updating player status",
            },
        }
    }

    fn to_intent(&self, cost: Option<f64>) -> Result<MutationIntent, crate::proxy::IntentError> {
        match self {
            UserAction::AddPlayer {
                team_id,
                player_id,
                position_on_team,
            } => MutationIntent::new(
                team_id.as_str(),
                player_id.as_str(),
                MutationAction::AddPlayer {
                    position_on_team: position_on_team.clone(),
                    cost: Some(json!(cost.unwrap_or(0.0))),
                },
            ),
            UserAction::RemovePlayer { team_id, player_id } => {
                MutationIntent::new(team_id.as_str(), player_id.as_str(), MutationAction::RemovePlayer)
            }
            UserAction::SetStarter {
                team_id,
                player_id,
                is_starter,
            } => MutationIntent::new(
                team_id.as_str(),
                player_id.as_str(),
                MutationAction::SetStarter {
                    is_starter: *is_starter,
                },
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    AwaitingConsent,
    AwaitingInput,
    Submitting,
    Settled(Outcome),
}

/// How one run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Settlement {
    /// The control was already running; nothing happened.
    Ignored,
    /// The user backed out before submission.
    Cancelled,
    Succeeded,
    /// Carries the toast text shown.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub settlement: Settlement,
    /// States visited, in order.
    pub trail: Vec<PipelineState>,
}

/// Parse a cost prompt answer. Blank means zero.
pub fn parse_cost(input: &str) -> Result<f64, &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(0.0);
    }
    match input.parse::<f64>() {
        Ok(cost) if cost.is_finite() && cost >= 0.0 => Ok(cost),
        _ => Err(INVALID_COST),
    }
}

fn cost_validator() -> InputValidator {
    Box::new(|input| parse_cost(input).map(|_| ()).map_err(str::to_string))
}

/// Runs user gestures against the mutation proxy.
#[derive(Clone)]
pub struct ActionPipeline {
    transport: Arc<dyn MutationTransport>,
    refresher: Arc<dyn PageRefresher>,
    overlay: Overlay,
    in_flight: Arc<DashSet<ControlKey>>,
    reload_delay: Duration,
}

impl ActionPipeline {
    pub fn new(
        transport: Arc<dyn MutationTransport>,
        refresher: Arc<dyn PageRefresher>,
        overlay: Overlay,
    ) -> Self {
        Self {
            transport,
            refresher,
            overlay,
            in_flight: Arc::new(DashSet::new()),
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }

    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Controls with a run in progress.
    pub fn running(&self) -> HashSet<ControlKey> {
        self.in_flight.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Run one gesture to completion.
    pub async fn run(&self, action: UserAction) -> RunReport {
        let mut trail = vec![PipelineState::Idle];

        let Some(_claim) = Claim::take(&self.in_flight, action.control()) else {
            tracing::debug!(action = ?action, "Control busy, trigger ignored");
            return RunReport {
                settlement: Settlement::Ignored,
                trail,
            };
        };

        let messages = action.messages();

        if action.needs_consent() {
            trail.push(PipelineState::AwaitingConsent);
            let confirmed = self
                .overlay
                .modals
                .confirm(REMOVE_CONFIRM_TITLE, REMOVE_CONFIRM_MESSAGE)
                .await;
            if !confirmed {
                return cancelled(trail);
            }
        }

        let mut cost = None;
        if action.needs_cost() {
            trail.push(PipelineState::AwaitingInput);
            let answer = self
                .overlay
                .modals
                .prompt(COST_PROMPT_TITLE, COST_PROMPT_INITIAL, cost_validator())
                .await;
            match answer.as_deref().map(parse_cost) {
                Some(Ok(value)) => cost = Some(value),
                _ => return cancelled(trail),
            }
        }

        let intent = match action.to_intent(cost) {
            Ok(intent) => intent,
            Err(e) => {
                tracing::error!(action = ?action, error = %e, "Cannot build mutation");
                trail.push(PipelineState::Settled(Outcome::Failure));
                trail.push(PipelineState::Idle);
                return self.fail(messages.fault, trail);
            }
        };

        trail.push(PipelineState::Submitting);
        let result = {
            let _busy = self.overlay.busy.show(messages.busy);
            self.transport.submit(&intent).await
        };

        let settlement = match result {
            Ok(envelope) if envelope.success => {
                tracing::info!(kind = intent.action.kind(), team_id = %intent.team_id, player_id = %intent.player_id, "Mutation succeeded");
                self.overlay.toasts.show(Severity::Success, messages.success);
                self.schedule_refresh();
                trail.push(PipelineState::Settled(Outcome::Success));
                Settlement::Succeeded
            }
            Ok(envelope) => {
                let reason = envelope.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                let message = format!("{}: {}", messages.failure_prefix, reason);
                tracing::warn!(kind = intent.action.kind(), error = %reason, "Mutation rejected");
                self.overlay.toasts.show(Severity::Error, message.clone());
                trail.push(PipelineState::Settled(Outcome::Failure));
                Settlement::Failed(message)
            }
            Err(e) => {
                tracing::error!(kind = intent.action.kind(), error = %e, "Mutation transport failed");
                self.overlay.toasts.show(Severity::Error, messages.fault);
                trail.push(PipelineState::Settled(Outcome::Failure));
                Settlement::Failed(messages.fault.to_string())
            }
        };

        trail.push(PipelineState::Idle);
        RunReport { settlement, trail }
    }

    fn fail(&self, message: &str, trail: Vec<PipelineState>) -> RunReport {
        self.overlay.toasts.show(Severity::Error, message);
        RunReport {
            settlement: Settlement::Failed(message.to_string()),
            trail,
        }
    }

    fn schedule_refresh(&self) {
        let refresher = Arc::clone(&self.refresher);
        let delay = self.reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            refresher.refresh().await;
        });
    }
}

impl std::fmt::Debug for ActionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionPipeline")
            .field("overlay", &self.overlay)
            .field("running", &self.in_flight.len())
            .field("reload_delay", &self.reload_delay)
            .finish()
    }
}

fn cancelled(mut trail: Vec<PipelineState>) -> RunReport {
    trail.push(PipelineState::Idle);
    RunReport {
        settlement: Settlement::Cancelled,
        trail,
    }
}

/// Marks a control as running until dropped.
struct Claim {
    set: Arc<DashSet<ControlKey>>,
    key: ControlKey,
}

impl Claim {
    fn take(set: &Arc<DashSet<ControlKey>>, key: ControlKey) -> Option<Self> {
        set.insert(key.clone()).then(|| Self {
            set: Arc::clone(set),
            key,
        })
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.set.remove(&self.key);
    }
}
