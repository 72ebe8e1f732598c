mod error;
mod fixture;
mod routes;

pub use error::{Error, Result};
pub use fixture::{AddedRow, Fixture, MatchRow, PAGE_SIZE, ScrobbleRow, TrackRow};
pub use routes::router;

use std::{
	collections::{BTreeMap, HashMap},
	net::SocketAddr,
	sync::{Arc, Mutex, MutexGuard},
};

use axum::http::StatusCode;
use serde_json::Value;
use tokio::{net::TcpListener, task::JoinHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
	pub method: String,
	pub path: &'static str,
	pub query: BTreeMap<String, String>,
	pub body: Option<Value>,
}

#[derive(Debug, Default)]
pub struct MockState {
	pub fixture: Fixture,
	requests: Vec<RecordedRequest>,
	failures: HashMap<&'static str, StatusCode>,
}

#[derive(Debug, Clone, Default)]
pub struct SharedState(Arc<Mutex<MockState>>);
impl SharedState {
	pub fn new(fixture: Fixture) -> Self {
		Self(Arc::new(Mutex::new(MockState { fixture, ..Default::default() })))
	}

	pub fn lock(&self) -> MutexGuard<'_, MockState> {
		self.0.lock().unwrap_or_else(|err| err.into_inner())
	}
}

/// The hex.fm HTTP contract served from an in-memory [`Fixture`] on a loopback port.
pub struct MockBackend {
	addr: SocketAddr,
	state: SharedState,
	server: JoinHandle<()>,
}
impl MockBackend {
	pub async fn spawn(fixture: Fixture) -> Result<Self> {
		let state = SharedState::new(fixture);
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let app = router(state.clone());
		let server = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, app).await {
				tracing::error!(error = %err, "Mock backend stopped.");
			}
		});

		Ok(Self { addr, state, server })
	}

	pub fn base_url(&self) -> String {
		format!("http://{}", self.addr)
	}

	pub fn state(&self) -> &SharedState {
		&self.state
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.lock().requests.clone()
	}

	pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
		self.requests().into_iter().filter(|request| request.path == path).collect()
	}

	/// The next request to `path` answers `status` without touching the fixture.
	pub fn fail_next(&self, path: &'static str, status: u16) -> Result<()> {
		let status = StatusCode::from_u16(status)
			.map_err(|err| Error::Message(format!("Invalid status code: {err}.")))?;

		self.state.lock().failures.insert(path, status);

		Ok(())
	}

	pub fn unreviewed_count(&self) -> usize {
		self.state.lock().fixture.unreviewed().count()
	}
}
impl Drop for MockBackend {
	fn drop(&mut self) {
		self.server.abort();
	}
}
