// HTTP handlers for content intake and the admin alert dashboard.
//
// **Pattern:**
// 1. Extract primitive data from the request
// 2. Call the core service
// 3. Shape the JSON response
//
// This layer is THIN - no business logic, just translation. Malformed
// requests are turned into `SafetyError::Validation` so every error keeps the
// `{"error": ...}` shape.

use super::errors::ApiError;
use super::session::SessionActor;
use super::state::AppState;
use crate::core::safety::{Alert, AlertQuery, AlertState, ContentType, SafetyError};
use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Sent by the topic, reply and message handlers after they committed new content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEvent {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub ref_id: String,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub pending: Option<bool>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveBody {
    pub notes: Option<String>,
}

/// Alert as the moderator dashboard shows it: the stored record plus its
/// label, link, badge and preview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    #[serde(flatten)]
    pub alert: Alert,
    pub state: AlertState,
    pub type_label: &'static str,
    pub link: String,
    pub badge_class: &'static str,
    pub preview: String,
}

impl From<Alert> for AlertView {
    fn from(alert: Alert) -> Self {
        Self {
            state: alert.state(),
            type_label: alert.content_type.label(),
            link: alert.content_type.link_for(&alert.ref_id),
            badge_class: alert.risk_level.badge_class(),
            preview: alert.preview(),
            alert,
        }
    }
}

fn views(alerts: Vec<Alert>) -> Vec<AlertView> {
    alerts.into_iter().map(AlertView::from).collect()
}

fn bad_request(rejection: impl std::fmt::Display) -> ApiError {
    SafetyError::Validation(rejection.to_string()).into()
}

/// An empty body means "no notes"; anything else has to be a valid `ResolveBody`.
fn parse_resolve_notes(body: &[u8]) -> Result<Option<String>, SafetyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    serde_json::from_slice::<ResolveBody>(body)
        .map(|b| b.notes)
        .map_err(|e| SafetyError::Validation(format!("Invalid resolve body: {e}")))
}

/// POST /api/safety/content
/// Scans new content; 201 with the alert when one was raised, 200 with `null` otherwise.
/// Only signed-in callers may report content.
pub async fn submit_content(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<ContentEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if !actor.is_authenticated() {
        tracing::warn!(role = ?actor.role, "Anonymous content submission rejected");
        return Err(SafetyError::Unauthorized.into());
    }
    let Json(event) = payload.map_err(bad_request)?;

    let alert = state
        .issuer
        .issue(event.content_type, &event.ref_id, &event.content)
        .await?;

    let status = if alert.is_some() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(json!({ "alert": alert }))))
}

/// GET /api/admin/alerts?pending=true&limit=N
pub async fn list_alerts(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(bad_request)?;
    let query = AlertQuery {
        pending_only: params.pending.unwrap_or(false),
        limit: params.limit.unwrap_or(state.default_page_size),
    };

    let alerts = state.moderation.list_all(&actor, query).await?;
    Ok(Json(json!({ "alerts": views(alerts) })))
}

/// GET /api/admin/alerts/pending
pub async fn list_pending(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Value>, ApiError> {
    let alerts = state.moderation.list_pending(&actor).await?;
    Ok(Json(json!({ "alerts": views(alerts) })))
}

/// GET /api/admin/alerts/stats
pub async fn alert_stats(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
) -> Result<Json<Value>, ApiError> {
    let stats = state.moderation.stats(&actor).await?;
    Ok(Json(json!(stats)))
}

/// POST /api/admin/alerts/:id/resolve
///
/// The body is optional. When present it must parse, so a typo never
/// closes the alert without its notes.
pub async fn resolve_alert(
    State(state): State<AppState>,
    SessionActor(actor): SessionActor,
    Path(alert_id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let notes = parse_resolve_notes(&body)?;
    let alert = state.moderation.resolve(&actor, &alert_id, notes).await?;

    Ok(Json(json!({
        "success": true,
        "alert": AlertView::from(alert),
    })))
}
