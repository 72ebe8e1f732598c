use std::collections::BTreeMap;

use serde_json::{Value, json};

pub const PAGE_SIZE: usize = 20;
const MAX_CATALOG_RESULTS: usize = 30;
const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct TrackRow {
	pub id: i64,
	pub rating_key: i64,
	pub artist: String,
	pub album: String,
	pub track: String,
}
impl TrackRow {
	pub fn concat_plex(&self) -> String {
		format!("{} - {} - {}", self.artist, self.album, self.track)
	}

	fn to_json(&self) -> Value {
		json!({
			"id": self.id,
			"ratingKey": self.rating_key,
			"artist": self.artist,
			"album": self.album,
			"track": self.track,
			"artistFeat": null,
			"concatPlex": self.concat_plex(),
		})
	}
}

#[derive(Debug, Clone)]
pub struct ScrobbleRow {
	pub id: i64,
	pub artist: String,
	pub album: String,
	pub track: String,
	pub played_at: i64,
	pub match_id: Option<i64>,
	pub status: Option<String>,
}
impl ScrobbleRow {
	pub fn concat_lastfm(&self) -> String {
		format!("{} - {}", self.artist, self.track)
	}

	fn to_json(&self) -> Value {
		json!({
			"id": self.id,
			"artist": self.artist,
			"album": self.album,
			"track": self.track,
			"concatLastfm": self.concat_lastfm(),
			"playedAt": self.played_at,
			"hash": format!("{:x}", self.id * 7_919 + self.played_at),
			"matchId": self.match_id,
			"status": self.status,
		})
	}
}

#[derive(Debug, Clone)]
pub struct MatchRow {
	pub id: i64,
	pub concat_lastfm: String,
	/// Zero records an explicit "no match".
	pub plex_id: i64,
}

#[derive(Debug, Clone)]
pub struct AddedRow {
	pub id: i64,
	pub rating_key: i64,
}

/// In-memory stand-in for the hex.fm database behind the mock backend.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
	pub tracks: Vec<TrackRow>,
	pub scrobbles: Vec<ScrobbleRow>,
	pub matches: Vec<MatchRow>,
	pub added: Vec<AddedRow>,
}
impl Fixture {
	pub fn new() -> Self {
		Self::default()
	}

	/// A small library: four catalog tracks, five distinct scrobbled songs, one already paired
	/// and one already declared unmatched.
	pub fn sample() -> Self {
		Self::new()
			.with_track(1, "Low", "Things We Lost in the Fire", "Sunflower")
			.with_track(2, "Low", "The Great Destroyer", "Monkey")
			.with_track(3, "Can", "Ege Bamyasi", "Vitamin C")
			.with_track(4, "Stereolab", "Dots and Loops", "Miss Modular")
			.with_scrobble(10, "Low", "Sunflower", 1_709_942_400)
			.with_scrobble(11, "Low", "Sunflower", 1_710_028_800)
			.with_scrobble(12, "Can", "Vitamin C", 1_710_115_200)
			.with_scrobble(13, "Low", "Monkey", 1_710_201_600)
			.with_scrobble(14, "Stereolab", "Miss Modular", 1_710_288_000)
			.with_scrobble(15, "Broadcast", "Pendulum", 1_710_374_400)
			.with_match(100, "Low - Sunflower", 1)
			.with_match(101, "Broadcast - Pendulum", 0)
			.with_added(500, 4)
	}

	pub fn with_track(mut self, id: i64, artist: &str, album: &str, track: &str) -> Self {
		self.tracks.push(TrackRow {
			id,
			rating_key: id * 10,
			artist: artist.to_string(),
			album: album.to_string(),
			track: track.to_string(),
		});

		self
	}

	pub fn with_scrobble(mut self, id: i64, artist: &str, track: &str, played_at: i64) -> Self {
		self.scrobbles.push(ScrobbleRow {
			id,
			artist: artist.to_string(),
			album: String::new(),
			track: track.to_string(),
			played_at,
			match_id: None,
			status: None,
		});

		self
	}

	/// Pairs every scrobble whose display string equals `concat_lastfm`.
	pub fn with_match(mut self, id: i64, concat_lastfm: &str, plex_id: i64) -> Self {
		self.insert_match(id, concat_lastfm, plex_id);

		self
	}

	/// Records a catalog track as recently added; `track_id` must already exist.
	pub fn with_added(mut self, id: i64, track_id: i64) -> Self {
		self.added.push(AddedRow { id, rating_key: track_id * 10 });

		self
	}

	pub fn unreviewed(&self) -> impl Iterator<Item = &ScrobbleRow> {
		self.scrobbles.iter().filter(|row| row.match_id.is_none())
	}

	pub fn date_range(&self) -> Value {
		let start = self.scrobbles.iter().map(|row| row.played_at).min();
		let end = self.scrobbles.iter().map(|row| row.played_at).max();

		json!({ "start": start, "end": end })
	}

	pub fn next_unreviewed(&self) -> Value {
		let Some(next) = self.unreviewed().next() else {
			return json!({ "status": false });
		};
		let needle = words(&next.concat_lastfm());
		let suggestions: Vec<Value> = self
			.tracks
			.iter()
			.filter(|track| {
				let haystack = words(&track.concat_plex());

				needle.iter().filter(|word| haystack.contains(word)).count() >= 2
			})
			.take(MAX_SUGGESTIONS)
			.map(|track| json!({ "concatPlex": track.concat_plex(), "id": track.id }))
			.collect();

		json!({
			"scrobble": next.to_json(),
			"status": true,
			"suggestions": suggestions,
			"unreviewedCount": self.unreviewed().count(),
		})
	}

	pub fn query_catalog(&self, filter: &str) -> Value {
		let terms = words(filter);
		let rows: Vec<Value> = self
			.tracks
			.iter()
			.filter(|track| like_all(&track.concat_plex(), &terms))
			.take(MAX_CATALOG_RESULTS)
			.map(TrackRow::to_json)
			.collect();

		Value::Array(rows)
	}

	pub fn record_decision(&mut self, concat_lastfm: &str, plex_id: i64) {
		let id = self.matches.iter().map(|row| row.id).max().unwrap_or(0) + 1;

		self.insert_match(id, concat_lastfm, plex_id);
	}

	/// Removes pairings in order; stops at the first unknown id and returns it.
	pub fn delete_matches(&mut self, ids: &[i64]) -> Result<(), i64> {
		for id in ids {
			let Some(index) = self.matches.iter().position(|row| row.id == *id) else {
				return Err(*id);
			};

			self.matches.remove(index);

			for scrobble in self.scrobbles.iter_mut().filter(|row| row.match_id == Some(*id)) {
				scrobble.match_id = None;
				scrobble.status = None;
			}
		}

		Ok(())
	}

	pub fn new_tracks(&self) -> Value {
		let rows: Vec<Value> = self
			.added
			.iter()
			.filter_map(|added| {
				self.tracks
					.iter()
					.find(|track| track.rating_key == added.rating_key)
					.map(|track| json!({ "addedId": added.id, "concatPlex": track.concat_plex() }))
			})
			.collect();

		json!({ "newTracks": rows, "newTracksCount": self.added.len() })
	}

	pub fn delete_added(&mut self, ids: &[i64]) -> Result<(), i64> {
		for id in ids {
			let Some(index) = self.added.iter().position(|row| row.id == *id) else {
				return Err(*id);
			};

			self.added.remove(index);
		}

		Ok(())
	}

	pub fn inspect(&self, params: &BTreeMap<String, String>) -> Value {
		let terms = words(params.get("filter").map(String::as_str).unwrap_or(""));
		let show = params.get("show").map(String::as_str).unwrap_or("all");
		let start = params.get("start").and_then(|raw| parse_timestamp(raw));
		let end = params.get("end").and_then(|raw| parse_timestamp(raw));
		let active_col = params.get("activeCol").and_then(|raw| raw.parse::<u8>().ok()).unwrap_or(0);
		let descending = params.get("order").map(String::as_str) == Some("desc");
		let page = params
			.get("page")
			.and_then(|raw| raw.parse::<usize>().ok())
			.filter(|page| *page > 0)
			.unwrap_or(1);
		let mut rows: Vec<(&MatchRow, Vec<i64>)> = self
			.matches
			.iter()
			.filter(|row| like_all(&row.concat_lastfm, &terms))
			.filter(|row| match show {
				"matched" => row.plex_id != 0,
				"unmatched" => row.plex_id == 0,
				_ => true,
			})
			.map(|row| {
				let scrobbles = self
					.scrobbles
					.iter()
					.filter(|scrobble| scrobble.match_id == Some(row.id))
					.filter(|scrobble| start.is_none_or(|start| scrobble.played_at >= start))
					.filter(|scrobble| end.is_none_or(|end| scrobble.played_at <= end))
					.map(|scrobble| scrobble.id)
					.collect::<Vec<_>>();

				(row, scrobbles)
			})
			.filter(|(_, scrobbles)| !scrobbles.is_empty())
			.collect();

		match active_col {
			1 => rows.sort_by(|a, b| a.0.concat_lastfm.cmp(&b.0.concat_lastfm)),
			2 => rows.sort_by_key(|(row, _)| self.track(row.plex_id).map(TrackRow::concat_plex)),
			3 => rows.sort_by_key(|(_, scrobbles)| scrobbles.len()),
			_ => {},
		}
		if active_col != 0 && descending {
			rows.reverse();
		}

		let count = rows.len();
		let matches: Vec<Value> = rows
			.into_iter()
			.skip((page - 1) * PAGE_SIZE)
			.take(PAGE_SIZE)
			.map(|(row, scrobbles)| {
				json!({
					"id": row.id,
					"concatLastfm": row.concat_lastfm,
					"playcount": scrobbles.len(),
					"plexTrack": self.track(row.plex_id).map(TrackRow::to_json),
					"scrobbles": scrobbles,
				})
			})
			.collect();

		json!({ "count": count, "matches": matches, "page": page })
	}

	fn track(&self, id: i64) -> Option<&TrackRow> {
		self.tracks.iter().find(|track| track.id == id)
	}

	fn insert_match(&mut self, id: i64, concat_lastfm: &str, plex_id: i64) {
		let status = if plex_id == 0 { "unmatched" } else { "matched" };

		self.matches.push(MatchRow { id, concat_lastfm: concat_lastfm.to_string(), plex_id });

		for scrobble in
			self.scrobbles.iter_mut().filter(|row| row.concat_lastfm() == concat_lastfm)
		{
			scrobble.match_id = Some(id);
			scrobble.status = Some(status.to_string());
		}
	}
}

fn words(raw: &str) -> Vec<String> {
	raw.split_whitespace().map(str::to_lowercase).collect()
}

// Mirrors SQL `LIKE '%term%'` for every term, case-insensitively.
fn like_all(haystack: &str, terms: &[String]) -> bool {
	let haystack = haystack.to_lowercase();

	terms.iter().all(|term| haystack.contains(term.as_str()))
}

fn parse_timestamp(raw: &str) -> Option<i64> {
	time::OffsetDateTime::parse(raw, &time::format_description::well_known::Rfc3339)
		.ok()
		.map(time::OffsetDateTime::unix_timestamp)
}
