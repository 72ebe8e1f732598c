mod client;
mod error;
mod models;

pub use client::{
	DELETE_MATCHES_PATH, DELETE_NEW_TRACK_PATH, HANDLE_MATCH_PATH, HANDLE_NO_MATCH_PATH,
	HexClient, INSPECT_MATCHES_PATH, InspectQuery, NEW_TRACKS_PATH, NEXT_UNREVIEWED_PATH,
	QUERY_PATH, SCROBBLE_DATE_RANGE_PATH,
};
pub use error::{Error, Result};
pub use models::{
	DateEnvelope, InspectMatch, InspectResponse, MatchDecision, MatchResponse, NewTrack,
	NewTracksResponse, PlexTrack, Scrobble, ScrobbleStatus, SortColumn, SortOrder, Subset,
	Suggestion,
};

use reqwest::header::{HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn default_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
