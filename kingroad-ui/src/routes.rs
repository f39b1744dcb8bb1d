//! HTTP route handlers for the JSON API and the HTML fragments.
//!
//! Every handler takes the store lock, does its work synchronously and drops
//! the guard before returning; nothing awaits while holding it.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::{get, post};
use kingroad::core::types::{QuickDestination, Route, RouteId, StoreSnapshot};
use kingroad::error::RouteError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sse;
use crate::state::{AppState, ChangeEvent};

/// Full application router (API, fragments, events) with state attached.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .nest("/fragments", fragment_router())
        .route("/events", get(sse::events_handler))
        .with_state(state)
}

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/navigation", get(get_navigation))
        .route("/history", get(get_history).delete(clear_history))
        .route("/routes", post(start_route))
        .route("/routes/quick", post(start_quick_route))
        .route("/routes/cancel", post(cancel_route))
        .route("/routes/{id}/reactivate", post(reactivate_route))
}

/// Build the HTML fragment router.
pub fn fragment_router() -> Router<AppState> {
    Router::new()
        .route("/navigation", get(navigation_fragment))
        .route("/history", get(history_fragment))
        .route("/quick-destinations", get(quick_destinations_fragment))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn rejected(err: RouteError) -> ApiError {
    debug!(error = %err, "route operation rejected");
    let status = match err {
        RouteError::NoActiveRoute => StatusCode::CONFLICT,
        RouteError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        RouteError::InvalidDestination => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/navigation - current route plus recent history.
async fn get_navigation(State(state): State<AppState>) -> Json<StoreSnapshot> {
    let snapshot = state.lock_store().snapshot(state.config.recent_limit);
    Json(snapshot)
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

/// GET /api/history?limit=N - most recent first.
async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<Route>> {
    let limit = query.limit.unwrap_or(state.config.recent_limit);
    let recent = state
        .lock_store()
        .recent_history(limit)
        .into_iter()
        .cloned()
        .collect();
    Json(recent)
}

#[derive(Debug, Deserialize)]
struct StartRouteRequest {
    destination: String,
    #[serde(default)]
    origin: Option<String>,
}

/// POST /api/routes - start navigating to a typed destination.
async fn start_route(
    State(state): State<AppState>,
    Json(request): Json<StartRouteRequest>,
) -> Result<(StatusCode, Json<Route>), ApiError> {
    let result = state
        .lock_store()
        .start_route(&request.destination, request.origin.as_deref());
    let route = result.map_err(rejected)?;
    announce_started(&state);
    Ok((StatusCode::CREATED, Json(route)))
}

#[derive(Debug, Deserialize)]
struct QuickRouteRequest {
    destination: QuickDestination,
}

/// POST /api/routes/quick - start navigating to a catalogue destination.
async fn start_quick_route(
    State(state): State<AppState>,
    Json(request): Json<QuickRouteRequest>,
) -> Result<(StatusCode, Json<Route>), ApiError> {
    let result = state.lock_store().start_quick_route(request.destination);
    let route = result.map_err(rejected)?;
    announce_started(&state);
    Ok((StatusCode::CREATED, Json(route)))
}

/// POST /api/routes/cancel - cancel the active route.
async fn cancel_route(State(state): State<AppState>) -> Result<Json<Route>, ApiError> {
    let result = state.lock_store().cancel_route();
    let route = result.map_err(rejected)?;
    state.broadcast(ChangeEvent::NavigationChanged);
    state.broadcast(ChangeEvent::HistoryChanged);
    Ok(Json(route))
}

/// POST /api/routes/:id/reactivate - start a new attempt from a history entry.
async fn reactivate_route(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Route>, ApiError> {
    let result = state.lock_store().reactivate_route(RouteId(id));
    let route = result.map_err(rejected)?;
    announce_started(&state);
    Ok(Json(route))
}

/// DELETE /api/history - discard the history log.
async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.lock_store().clear_history();
    state.broadcast(ChangeEvent::HistoryChanged);
    StatusCode::NO_CONTENT
}

fn announce_started(state: &AppState) {
    state.broadcast(ChangeEvent::NavigationChanged);
    state.broadcast(ChangeEvent::HistoryChanged);
}

/// GET /fragments/navigation - active route card or idle panel.
async fn navigation_fragment(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let current = state.lock_store().current_route().cloned();
    render(state.renderer.render_navigation(current.as_ref()))
}

/// GET /fragments/history - recent destinations list.
async fn history_fragment(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let snapshot = state.lock_store().snapshot(state.config.recent_limit);
    render(state.renderer.render_history(&snapshot.recent))
}

/// GET /fragments/quick-destinations - quick destination picker.
async fn quick_destinations_fragment(
    State(state): State<AppState>,
) -> Result<Html<String>, StatusCode> {
    render(state.renderer.render_quick_destinations())
}

fn render(result: anyhow::Result<String>) -> Result<Html<String>, StatusCode> {
    result.map(Html).map_err(|err| {
        warn!(error = %format!("{err:#}"), "fragment rendering failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use kingroad::io::config::KingroadConfig;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app() -> (tempfile::TempDir, Router) {
        let temp = tempfile::tempdir().expect("tempdir");
        let state =
            AppState::new(temp.path().to_path_buf(), KingroadConfig::default()).expect("state");
        (temp, build_app(state))
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn empty(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn start_then_cancel_round_trip() {
        let (_temp, app) = test_app();

        let (status, body) = call(&app, post_json("/api/routes", json!({"destination": "Salvador"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let route: Value = serde_json::from_str(&body).expect("route json");
        assert_eq!(route["destination"], "Salvador");
        assert_eq!(route["status"], "active");

        let (status, body) = call(&app, empty("GET", "/api/navigation")).await;
        assert_eq!(status, StatusCode::OK);
        let snapshot: Value = serde_json::from_str(&body).expect("snapshot json");
        assert_eq!(snapshot["current"]["destination"], "Salvador");

        let (status, body) = call(&app, empty("POST", "/api/routes/cancel")).await;
        assert_eq!(status, StatusCode::OK);
        let canceled: Value = serde_json::from_str(&body).expect("canceled json");
        assert_eq!(canceled["status"], "canceled");
        assert_eq!(canceled["id"], route["id"]);
    }

    #[tokio::test]
    async fn domain_rejections_map_to_status_codes() {
        let (_temp, app) = test_app();

        let (status, body) = call(&app, empty("POST", "/api/routes/cancel")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("no active route"));

        let (status, _) = call(&app, empty("POST", "/api/routes/9999999/reactivate")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, post_json("/api/routes", json!({"destination": "  "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn quick_route_and_history_fragment() {
        let (_temp, app) = test_app();

        let (status, _) = call(
            &app,
            post_json("/api/routes/quick", json!({"destination": "gas_station"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, html) = call(&app, empty("GET", "/fragments/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("⛽ Nearest gas station"));

        let (status, html) = call(&app, empty("GET", "/fragments/navigation")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("cancel-route"));
    }

    #[tokio::test]
    async fn clear_history_empties_list() {
        let (_temp, app) = test_app();
        call(&app, post_json("/api/routes", json!({"destination": "Natal"}))).await;
        call(&app, empty("POST", "/api/routes/cancel")).await;

        let (status, _) = call(&app, empty("DELETE", "/api/history")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = call(&app, empty("GET", "/api/history?limit=5")).await;
        assert_eq!(body, "[]");
    }
}
