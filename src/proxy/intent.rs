//! Write intents and their translation to upstream calls.

use reqwest::Method;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::TeamDefaults;
use crate::upstream::call::is_dot_segment;
use crate::upstream::UpstreamCallSpec;

/// Upstream query parameter carrying the roster slot.
///
/// The upstream controller binds `@RequestParam rosterPosition` for both
/// add and reposition; the browser-facing body calls it `positionOnTeam`.
pub const ROSTER_POSITION_PARAM: &str = "rosterPosition";
pub const COST_PARAM: &str = "cost";

/// Roster slot values the upstream uses for starter status.
pub const STARTER: &str = "STARTER";
pub const BENCH: &str = "BENCH";

/// The three roster mutations a user can request.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationAction {
    /// `cost` is passed through as received (number or numeric string).
    AddPlayer {
        position_on_team: Option<String>,
        cost: Option<Value>,
    },
    RemovePlayer,
    SetStarter { is_starter: bool },
}

impl MutationAction {
    pub fn kind(&self) -> &'static str {
        match self {
            MutationAction::AddPlayer { .. } => "add_player",
            MutationAction::RemovePlayer => "remove_player",
            MutationAction::SetStarter { .. } => "set_starter",
        }
    }

    /// Message returned to the browser when the upstream rejects or fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationAction::AddPlayer { .. } => "Failed to add player to team",
            MutationAction::RemovePlayer => "Failed to remove player from team",
            MutationAction::SetStarter { .. } => "Failed to update player status",
        }
    }
}

/// A single user mutation on one player of one team.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationIntent {
    pub team_id: String,
    pub player_id: String,
    pub action: MutationAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("missing {0}")]
    MissingId(&'static str),
    #[error("{0} is not a valid path segment")]
    InvalidId(&'static str),
}

impl MutationIntent {
    /// Build an intent, checking only that both ids are usable path segments.
    pub fn new(
        team_id: impl Into<String>,
        player_id: impl Into<String>,
        action: MutationAction,
    ) -> Result<Self, IntentError> {
        let team_id = path_id(team_id.into(), "team id")?;
        let player_id = path_id(player_id.into(), "player id")?;

        Ok(Self {
            team_id,
            player_id,
            action,
        })
    }

    /// The upstream request this intent maps to.
    pub fn to_upstream_call(&self) -> UpstreamCallSpec {
        let base = ["teams", self.team_id.as_str(), "players", self.player_id.as_str()];

        match &self.action {
            MutationAction::AddPlayer {
                position_on_team,
                cost,
            } => {
                let mut call = UpstreamCallSpec::new(Method::POST, base);
                if let Some(position) = position_on_team {
                    call = call.with_query(ROSTER_POSITION_PARAM, position.as_str());
                }
                call.with_query(COST_PARAM, cost_param(cost.as_ref()))
            }
            MutationAction::RemovePlayer => UpstreamCallSpec::new(Method::DELETE, base),
            MutationAction::SetStarter { is_starter } => {
                UpstreamCallSpec::new(Method::PUT, base.into_iter().chain(["roster-position"]))
                    .with_query(ROSTER_POSITION_PARAM, if *is_starter { STARTER } else { BENCH })
            }
        }
    }
}

fn path_id(raw: String, name: &'static str) -> Result<String, IntentError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(IntentError::MissingId(name));
    }
    if is_dot_segment(id) {
        return Err(IntentError::InvalidId(name));
    }
    Ok(id.to_string())
}

/// Render the cost unchanged; `0` only when it is entirely absent.
fn cost_param(cost: Option<&Value>) -> String {
    match cost {
        None | Some(Value::Null) => "0".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A team-creation form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTeamIntent {
    pub team_name: Option<String>,
    pub owner_id: Option<Value>,
}

impl CreateTeamIntent {
    pub fn to_upstream_call(&self, defaults: &TeamDefaults) -> UpstreamCallSpec {
        let owner_id = match &self.owner_id {
            None | Some(Value::Null) => json!(defaults.default_owner_id),
            Some(Value::String(s)) if s.trim().is_empty() => json!(defaults.default_owner_id),
            Some(other) => other.clone(),
        };

        UpstreamCallSpec::new(Method::POST, ["teams"]).with_json(json!({
            "name": self.team_name,
            "ownerId": owner_id,
            "budget": defaults.default_budget,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(action: MutationAction) -> MutationIntent {
        MutationIntent::new("12", "7", action).unwrap()
    }

    #[test]
    fn test_add_player_maps_position_and_cost() {
        let call = intent(MutationAction::AddPlayer {
            position_on_team: Some("FLEX".into()),
            cost: Some(json!(12.5)),
        })
        .to_upstream_call();

        assert_eq!(call.method(), &Method::POST);
        assert_eq!(call.display_path(), "/teams/12/players/7");
        assert_eq!(call.query_value("rosterPosition"), Some("FLEX"));
        assert_eq!(call.query_value("cost"), Some("12.5"));
    }

    #[test]
    fn test_cost_defaults_to_zero_only_when_absent() {
        let absent = intent(MutationAction::AddPlayer {
            position_on_team: Some("QB".into()),
            cost: None,
        })
        .to_upstream_call();
        assert_eq!(absent.query_value("cost"), Some("0"));

        // Negative and string costs are the upstream's problem.
        let negative = intent(MutationAction::AddPlayer {
            position_on_team: Some("QB".into()),
            cost: Some(json!(-4)),
        })
        .to_upstream_call();
        assert_eq!(negative.query_value("cost"), Some("-4"));

        let text = intent(MutationAction::AddPlayer {
            position_on_team: None,
            cost: Some(json!("7.25")),
        })
        .to_upstream_call();
        assert_eq!(text.query_value("cost"), Some("7.25"));
        assert_eq!(text.query_value("rosterPosition"), None);
    }

    #[test]
    fn test_remove_is_path_only() {
        let call = intent(MutationAction::RemovePlayer).to_upstream_call();
        assert_eq!(call.method(), &Method::DELETE);
        assert_eq!(call.display_path(), "/teams/12/players/7");
        assert!(call.query().is_empty());
    }

    #[test]
    fn test_starter_flag_maps_to_roster_enum() {
        let start = intent(MutationAction::SetStarter { is_starter: true }).to_upstream_call();
        assert_eq!(start.method(), &Method::PUT);
        assert_eq!(start.display_path(), "/teams/12/players/7/roster-position");
        assert_eq!(start.query_value("rosterPosition"), Some("STARTER"));

        let bench = intent(MutationAction::SetStarter { is_starter: false }).to_upstream_call();
        assert_eq!(bench.query_value("rosterPosition"), Some("BENCH"));
    }

    #[test]
    fn test_ids_must_be_present() {
        assert_eq!(
            MutationIntent::new(" ", "7", MutationAction::RemovePlayer),
            Err(IntentError::MissingId("team id"))
        );
        assert_eq!(
            MutationIntent::new("12", "", MutationAction::RemovePlayer),
            Err(IntentError::MissingId("player id"))
        );
    }

    #[test]
    fn test_dot_ids_are_rejected() {
        assert_eq!(
            MutationIntent::new("..", "7", MutationAction::RemovePlayer),
            Err(IntentError::InvalidId("team id"))
        );
        assert_eq!(
            MutationIntent::new("12", " . ", MutationAction::SetStarter { is_starter: true }),
            Err(IntentError::InvalidId("player id"))
        );
        assert_eq!(
            MutationIntent::new("12", "%2e%2E", MutationAction::RemovePlayer),
            Err(IntentError::InvalidId("player id"))
        );

        let dotted = MutationIntent::new("12", "a.b", MutationAction::RemovePlayer).unwrap();
        assert_eq!(dotted.to_upstream_call().display_path(), "/teams/12/players/a.b");
    }

    #[test]
    fn test_create_team_applies_defaults() {
        let call = CreateTeamIntent {
            team_name: Some("Gridiron Gang".into()),
            owner_id: None,
        }
        .to_upstream_call(&TeamDefaults::default());

        assert_eq!(call.display_path(), "/teams");
        assert_eq!(
            call.body(),
            Some(&json!({"name": "Gridiron Gang", "ownerId": 1, "budget": 100.0}))
        );
    }

    #[test]
    fn test_create_team_keeps_given_owner() {
        let call = CreateTeamIntent {
            team_name: Some("B".into()),
            owner_id: Some(json!("42")),
        }
        .to_upstream_call(&TeamDefaults::default());

        assert_eq!(call.body().unwrap()["ownerId"], json!("42"));
    }
}
