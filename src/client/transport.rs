//! Client-side transport to the gateway's mutation and page routes.

use futures_util::future::BoxFuture;
use reqwest::{header::ACCEPT, Method};
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::aggregator::ViewModel;
use crate::proxy::{MutationAction, MutationIntent, ResultEnvelope};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected {status} reply: {body}")]
    Decode {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid gateway URL: {0}")]
    InvalidUrl(String),
}

/// Sends one mutation and yields the gateway's envelope.
///
/// `Err` means no envelope came back at all (network fault, garbage reply).
pub trait MutationTransport: Send + Sync {
    fn submit<'a>(
        &'a self,
        intent: &'a MutationIntent,
    ) -> BoxFuture<'a, Result<ResultEnvelope, TransportError>>;
}

/// HTTP client for a running gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url =
            Url::parse(base_url).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Send a mutation. A 400 carrying an envelope is a normal reply.
    pub async fn send(&self, intent: &MutationIntent) -> Result<ResultEnvelope, TransportError> {
        let (method, segments, body) = gateway_route(intent);
        let url = self.url(&segments)?;

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|_| TransportError::Decode { status, body: text })
    }

    /// Fetch a page's view model as JSON, e.g. `/team/12`.
    pub async fn fetch_view(&self, path: &str) -> Result<ViewModel, TransportError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.url(&segments)?;

        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Decode { status, body: text });
        }
        serde_json::from_str(&text).map_err(|_| TransportError::Decode { status, body: text })
    }

    fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments.iter());
        Ok(url)
    }
}

impl MutationTransport for GatewayClient {
    fn submit<'a>(
        &'a self,
        intent: &'a MutationIntent,
    ) -> BoxFuture<'a, Result<ResultEnvelope, TransportError>> {
        Box::pin(self.send(intent))
    }
}

/// Gateway route and JSON body for an intent.
fn gateway_route(intent: &MutationIntent) -> (Method, Vec<&str>, Option<Value>) {
    let team = intent.team_id.as_str();
    let player = intent.player_id.as_str();

    match &intent.action {
        MutationAction::AddPlayer {
            position_on_team,
            cost,
        } => (
            Method::POST,
            vec!["api", "teams", team, "add-player", player],
            Some(json!({ "positionOnTeam": position_on_team, "cost": cost })),
        ),
        MutationAction::RemovePlayer => (
            Method::DELETE,
            vec!["api", "teams", team, "remove-player", player],
            None,
        ),
        MutationAction::SetStarter { is_starter } => (
            Method::PUT,
            vec!["api", "teams", team, "players", player, "starter-status"],
            Some(json!({ "isStarter": is_starter })),
        ),
    }
}
