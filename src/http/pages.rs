//! Page route handlers.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::aggregator::{routes::PARAM_ID, Page, RouteId, ViewRequest};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::render::render_html;

pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    show(&state, ViewRequest::new(RouteId::Home), &headers).await
}

pub async fn teams(State(state): State<AppState>, headers: HeaderMap) -> Response {
    show(&state, ViewRequest::new(RouteId::Teams), &headers).await
}

pub async fn team_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request = ViewRequest::new(RouteId::TeamDetail).with_param(PARAM_ID, id);
    show(&state, request, &headers).await
}

pub async fn team_lineup(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request = ViewRequest::new(RouteId::TeamLineup).with_param(PARAM_ID, id);
    show(&state, request, &headers).await
}

pub async fn players(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request = ViewRequest::new(RouteId::Players).with_params(params);
    show(&state, request, &headers).await
}

pub async fn player_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let request = ViewRequest::new(RouteId::PlayerDetail).with_param(PARAM_ID, id);
    show(&state, request, &headers).await
}

pub async fn health() -> Response {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

async fn show(state: &AppState, request: ViewRequest, headers: &HeaderMap) -> Response {
    let request_id = request_id(headers);
    tracing::debug!(request_id = %request_id, route = request.route.as_str(), "Building page");

    let page = state.aggregator.aggregate(&request, request_id).await;
    respond(page, headers)
}

fn respond(page: Page, headers: &HeaderMap) -> Response {
    if wants_json(headers) {
        Json(page.model).into_response()
    } else {
        match render_html(&page) {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!(
                    route = page.route.as_str(),
                    template = page.template.name(),
                    error = %e,
                    "Failed to render page"
                );
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// True when the client asks for JSON ahead of (or instead of) HTML.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    accept
        .split(',')
        .map(|part| part.split(';').next().unwrap_or_default().trim())
        .find(|media| *media == "application/json" || *media == "text/html")
        .is_some_and(|media| media == "application/json")
}
