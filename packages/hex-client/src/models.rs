use serde::{Deserialize, Serialize};

/// Review outcome recorded on a scrobble. Unknown values survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ScrobbleStatus {
	Matched,
	Unmatched,
	NoMatch,
	Processed,
	Other(String),
}
impl ScrobbleStatus {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Matched => "matched",
			Self::Unmatched => "unmatched",
			Self::NoMatch => "no-match",
			Self::Processed => "processed",
			Self::Other(raw) => raw.as_str(),
		}
	}
}
impl From<String> for ScrobbleStatus {
	fn from(raw: String) -> Self {
		match raw.as_str() {
			"matched" => Self::Matched,
			"unmatched" => Self::Unmatched,
			"no-match" => Self::NoMatch,
			"processed" => Self::Processed,
			_ => Self::Other(raw),
		}
	}
}
impl From<ScrobbleStatus> for String {
	fn from(status: ScrobbleStatus) -> Self {
		match status {
			ScrobbleStatus::Other(raw) => raw,
			known => known.as_str().to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scrobble {
	pub id: i64,
	pub artist: String,
	#[serde(default)]
	pub album: Option<String>,
	pub track: String,
	pub concat_lastfm: String,
	/// Unix seconds.
	pub played_at: i64,
	pub hash: String,
	#[serde(default)]
	pub status: Option<ScrobbleStatus>,
	#[serde(default)]
	pub match_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexTrack {
	pub id: i64,
	pub concat_plex: String,
	#[serde(default)]
	pub artist: Option<String>,
	#[serde(default)]
	pub album: Option<String>,
	#[serde(default)]
	pub track: Option<String>,
	#[serde(default)]
	pub artist_feat: Option<String>,
	#[serde(default)]
	pub rating_key: Option<i64>,
	#[serde(default)]
	pub track_index: Option<i64>,
	#[serde(default)]
	pub parent_index: Option<i64>,
	#[serde(default)]
	pub guid: Option<String>,
	#[serde(default)]
	pub parent_guid: Option<String>,
	#[serde(default)]
	pub grandparent_guid: Option<String>,
}

/// One pairing row of the listing. `plex_track` is `None` until the pairing is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectMatch {
	pub id: i64,
	pub concat_lastfm: String,
	pub playcount: u64,
	#[serde(default)]
	pub plex_track: Option<PlexTrack>,
	#[serde(default)]
	pub scrobbles: Vec<i64>,
}
impl InspectMatch {
	pub fn is_resolved(&self) -> bool {
		self.plex_track.is_some()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectResponse {
	pub count: u64,
	pub matches: Vec<InspectMatch>,
	pub page: u32,
}

/// Min/max `played_at` over all scrobbles, in unix seconds. Both are null on an empty library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEnvelope {
	pub start: Option<i64>,
	pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
	pub added_id: i64,
	pub concat_plex: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTracksResponse {
	#[serde(default)]
	pub new_tracks: Vec<NewTrack>,
	pub new_tracks_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
	pub concat_plex: String,
	pub id: i64,
}

/// `status == false` means the review queue is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
	pub status: bool,
	#[serde(default)]
	pub scrobble: Option<Scrobble>,
	#[serde(default)]
	pub suggestions: Vec<Suggestion>,
	#[serde(default)]
	pub unreviewed_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDecision {
	pub concat_lastfm: String,
	pub plex_id: i64,
}
impl MatchDecision {
	/// Catalog identity the server reads as "no match".
	pub const NO_MATCH_ID: i64 = 0;

	pub fn matched(concat_lastfm: impl Into<String>, plex_id: i64) -> Self {
		Self { concat_lastfm: concat_lastfm.into(), plex_id }
	}

	pub fn no_match(concat_lastfm: impl Into<String>) -> Self {
		Self { concat_lastfm: concat_lastfm.into(), plex_id: Self::NO_MATCH_ID }
	}
}

/// Sortable listing columns, numbered as the `activeCol` parameter expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortColumn {
	Scrobble,
	PlexTrack,
	Plays,
}
impl SortColumn {
	pub const ALL: [Self; 3] = [Self::Scrobble, Self::PlexTrack, Self::Plays];

	pub fn wire_index(self) -> u8 {
		match self {
			Self::Scrobble => 1,
			Self::PlexTrack => 2,
			Self::Plays => 3,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortOrder {
	#[default]
	Asc,
	Desc,
}
impl SortOrder {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// The {all, matched, unmatched} subset dimension of the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subset {
	#[default]
	All,
	Matched,
	Unmatched,
}
impl Subset {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::All => "all",
			Self::Matched => "matched",
			Self::Unmatched => "unmatched",
		}
	}
}
