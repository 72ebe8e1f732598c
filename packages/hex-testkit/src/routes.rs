use std::collections::BTreeMap;

use axum::{
	Json, Router,
	extract::{Query, State},
	http::{Method, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;

use crate::{RecordedRequest, SharedState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionBody {
	concat_lastfm: String,
	plex_id: i64,
}

pub fn router(state: SharedState) -> Router {
	Router::new()
		.route("/api/inspect_matches", get(inspect_matches))
		.route("/api/get_scrobble_date_range", get(scrobble_date_range))
		.route("/api/handle_delete_matches", post(delete_matches))
		.route("/api/new_tracks", get(new_tracks))
		.route("/api/delete_new_track", post(delete_new_track))
		.route("/api/get_next_unreviewed", get(next_unreviewed))
		.route("/api/query", get(query_catalog))
		.route("/api/handle_match", post(handle_match))
		.route("/api/handle_no_match", post(handle_no_match))
		.with_state(state)
}

async fn inspect_matches(
	State(state): State<SharedState>,
	Query(params): Query<BTreeMap<String, String>>,
) -> Response {
	let mut inner = state.lock();

	if let Some(status) = inner.record(Method::GET, "/api/inspect_matches", params.clone(), None) {
		return status.into_response();
	}

	Json(inner.fixture.inspect(&params)).into_response()
}

async fn scrobble_date_range(State(state): State<SharedState>) -> Response {
	let mut inner = state.lock();

	if let Some(status) =
		inner.record(Method::GET, "/api/get_scrobble_date_range", BTreeMap::new(), None)
	{
		return status.into_response();
	}

	Json(inner.fixture.date_range()).into_response()
}

async fn delete_matches(State(state): State<SharedState>, Json(ids): Json<Vec<i64>>) -> Response {
	let mut inner = state.lock();
	let body = serde_json::json!(ids);

	if let Some(status) =
		inner.record(Method::POST, "/api/handle_delete_matches", BTreeMap::new(), Some(body))
	{
		return status.into_response();
	}

	match inner.fixture.delete_matches(&ids) {
		Ok(()) => StatusCode::NO_CONTENT.into_response(),
		Err(id) => {
			tracing::debug!(id, "Unknown match id in delete batch.");

			StatusCode::INTERNAL_SERVER_ERROR.into_response()
		},
	}
}

async fn new_tracks(State(state): State<SharedState>) -> Response {
	let mut inner = state.lock();

	if let Some(status) = inner.record(Method::GET, "/api/new_tracks", BTreeMap::new(), None) {
		return status.into_response();
	}

	Json(inner.fixture.new_tracks()).into_response()
}

async fn delete_new_track(
	State(state): State<SharedState>,
	Json(ids): Json<Vec<i64>>,
) -> Response {
	let mut inner = state.lock();
	let body = serde_json::json!(ids);

	if let Some(status) =
		inner.record(Method::POST, "/api/delete_new_track", BTreeMap::new(), Some(body))
	{
		return status.into_response();
	}

	match inner.fixture.delete_added(&ids) {
		Ok(()) => StatusCode::NO_CONTENT.into_response(),
		Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
	}
}

async fn next_unreviewed(State(state): State<SharedState>) -> Response {
	let mut inner = state.lock();

	if let Some(status) =
		inner.record(Method::GET, "/api/get_next_unreviewed", BTreeMap::new(), None)
	{
		return status.into_response();
	}

	Json(inner.fixture.next_unreviewed()).into_response()
}

// The real backend serialises this list by hand and serves it without a JSON content type.
async fn query_catalog(
	State(state): State<SharedState>,
	Query(params): Query<BTreeMap<String, String>>,
) -> Response {
	let mut inner = state.lock();

	if let Some(status) = inner.record(Method::GET, "/api/query", params.clone(), None) {
		return status.into_response();
	}

	let filter = params.get("filter").map(String::as_str).unwrap_or("");

	inner.fixture.query_catalog(filter).to_string().into_response()
}

async fn handle_match(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
	decide(&state, "/api/handle_match", body)
}

async fn handle_no_match(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
	decide(&state, "/api/handle_no_match", body)
}

fn decide(state: &SharedState, path: &'static str, body: Value) -> Response {
	let mut inner = state.lock();

	if let Some(status) = inner.record(Method::POST, path, BTreeMap::new(), Some(body.clone())) {
		return status.into_response();
	}

	let Ok(decision) = serde_json::from_value::<DecisionBody>(body) else {
		return StatusCode::BAD_REQUEST.into_response();
	};
	let plex_id = if path == "/api/handle_no_match" { 0 } else { decision.plex_id };

	inner.fixture.record_decision(&decision.concat_lastfm, plex_id);

	StatusCode::NO_CONTENT.into_response()
}

impl crate::MockState {
	/// Logs the request and returns the injected failure for `path`, if one is armed.
	fn record(
		&mut self,
		method: Method,
		path: &'static str,
		query: BTreeMap<String, String>,
		body: Option<Value>,
	) -> Option<StatusCode> {
		self.requests.push(RecordedRequest { method: method.to_string(), path, query, body });

		self.failures.remove(path)
	}
}
