//! Mutation proxy handlers. Every reply is a `ResultEnvelope`.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::Deserialize;
use serde_json::Value;

use crate::http::body::SubmittedBody;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::proxy::{CreateTeamIntent, MutationAction, MutationIntent, ResultEnvelope};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddPlayerBody {
    pub position_on_team: Option<String>,
    pub cost: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StarterStatusBody {
    /// Absent means bench.
    pub is_starter: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTeamBody {
    pub team_name: Option<String>,
    pub owner_id: Option<Value>,
}

pub async fn add_player(
    State(state): State<AppState>,
    Path((team_id, player_id)): Path<(String, String)>,
    headers: HeaderMap,
    SubmittedBody(body): SubmittedBody<AddPlayerBody>,
) -> ResultEnvelope {
    let action = MutationAction::AddPlayer {
        position_on_team: body.position_on_team,
        cost: body.cost,
    };
    forward(&state, &headers, team_id, player_id, action).await
}

pub async fn remove_player(
    State(state): State<AppState>,
    Path((team_id, player_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> ResultEnvelope {
    forward(&state, &headers, team_id, player_id, MutationAction::RemovePlayer).await
}

pub async fn set_starter_status(
    State(state): State<AppState>,
    Path((team_id, player_id)): Path<(String, String)>,
    headers: HeaderMap,
    SubmittedBody(body): SubmittedBody<StarterStatusBody>,
) -> ResultEnvelope {
    let action = MutationAction::SetStarter {
        is_starter: body.is_starter.unwrap_or(false),
    };
    forward(&state, &headers, team_id, player_id, action).await
}

pub async fn create_team(
    State(state): State<AppState>,
    headers: HeaderMap,
    SubmittedBody(body): SubmittedBody<CreateTeamBody>,
) -> ResultEnvelope {
    let intent = CreateTeamIntent {
        team_name: body.team_name,
        owner_id: body.owner_id,
    };
    state.proxy.create_team(&intent, request_id(&headers)).await
}

async fn forward(
    state: &AppState,
    headers: &HeaderMap,
    team_id: String,
    player_id: String,
    action: MutationAction,
) -> ResultEnvelope {
    let request_id = request_id(headers);

    match MutationIntent::new(team_id, player_id, action) {
        Ok(intent) => state.proxy.execute(&intent, request_id).await,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected mutation");
            ResultEnvelope::failure(format!("Invalid request: {}", e))
        }
    }
}
