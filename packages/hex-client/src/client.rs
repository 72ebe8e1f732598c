use std::time::Duration as StdDuration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
	DateEnvelope, Error, InspectResponse, MatchDecision, MatchResponse, NewTracksResponse,
	PlexTrack, Result, SortColumn, SortOrder, Subset,
};

pub const INSPECT_MATCHES_PATH: &str = "/api/inspect_matches";
pub const SCROBBLE_DATE_RANGE_PATH: &str = "/api/get_scrobble_date_range";
pub const DELETE_MATCHES_PATH: &str = "/api/handle_delete_matches";
pub const NEW_TRACKS_PATH: &str = "/api/new_tracks";
pub const DELETE_NEW_TRACK_PATH: &str = "/api/delete_new_track";
pub const NEXT_UNREVIEWED_PATH: &str = "/api/get_next_unreviewed";
pub const QUERY_PATH: &str = "/api/query";
pub const HANDLE_MATCH_PATH: &str = "/api/handle_match";
pub const HANDLE_NO_MATCH_PATH: &str = "/api/handle_no_match";

/// Parameters of one listing request. `start`/`end` are only present when overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectQuery {
	pub active_col: Option<SortColumn>,
	pub order: SortOrder,
	pub filter: String,
	pub page: u32,
	pub show: Subset,
	pub start: Option<OffsetDateTime>,
	pub end: Option<OffsetDateTime>,
}
impl InspectQuery {
	pub fn to_pairs(&self) -> Result<Vec<(&'static str, String)>> {
		let mut pairs = vec![
			("activeCol", self.active_col.map(SortColumn::wire_index).unwrap_or(0).to_string()),
			("filter", self.filter.clone()),
			("order", self.order.as_str().to_string()),
			("page", self.page.to_string()),
			("show", self.show.as_str().to_string()),
		];

		if let Some(start) = self.start {
			pairs.push(("start", start.format(&Rfc3339)?));
		}
		if let Some(end) = self.end {
			pairs.push(("end", end.format(&Rfc3339)?));
		}

		Ok(pairs)
	}
}

#[derive(Debug, Clone)]
pub struct HexClient {
	http: Client,
	api_base: String,
}
impl HexClient {
	pub fn new(cfg: &hex_config::Backend) -> Result<Self> {
		let headers = crate::default_headers(&cfg.default_headers)?;
		let mut builder = Client::builder().default_headers(headers);

		if cfg.timeout_ms > 0 {
			builder = builder.timeout(StdDuration::from_millis(cfg.timeout_ms));
		}

		let api_base = cfg.api_base.trim_end_matches('/').to_string();

		if api_base.is_empty() {
			return Err(Error::InvalidConfig { message: "api_base must be non-empty.".to_string() });
		}

		Ok(Self { http: builder.build()?, api_base })
	}

	pub fn api_base(&self) -> &str {
		&self.api_base
	}

	pub async fn inspect_matches(&self, query: &InspectQuery) -> Result<InspectResponse> {
		let pairs = query.to_pairs()?;
		let res = self.http.get(self.url(INSPECT_MATCHES_PATH)).query(&pairs).send().await?;

		decode(INSPECT_MATCHES_PATH, res).await
	}

	pub async fn scrobble_date_range(&self) -> Result<DateEnvelope> {
		let res = self.http.get(self.url(SCROBBLE_DATE_RANGE_PATH)).send().await?;

		decode(SCROBBLE_DATE_RANGE_PATH, res).await
	}

	pub async fn delete_matches(&self, match_ids: &[i64]) -> Result<()> {
		let res = self.http.post(self.url(DELETE_MATCHES_PATH)).json(match_ids).send().await?;

		expect_success(DELETE_MATCHES_PATH, &res)
	}

	pub async fn new_tracks(&self) -> Result<NewTracksResponse> {
		let res = self.http.get(self.url(NEW_TRACKS_PATH)).send().await?;

		decode(NEW_TRACKS_PATH, res).await
	}

	pub async fn delete_new_tracks(&self, added_ids: &[i64]) -> Result<()> {
		let res = self.http.post(self.url(DELETE_NEW_TRACK_PATH)).json(added_ids).send().await?;

		expect_success(DELETE_NEW_TRACK_PATH, &res)
	}

	pub async fn next_unreviewed(&self) -> Result<MatchResponse> {
		let res = self.http.get(self.url(NEXT_UNREVIEWED_PATH)).send().await?;

		decode(NEXT_UNREVIEWED_PATH, res).await
	}

	pub async fn query_catalog(&self, filter: &str) -> Result<Vec<PlexTrack>> {
		let res =
			self.http.get(self.url(QUERY_PATH)).query(&[("filter", filter)]).send().await?;

		decode(QUERY_PATH, res).await
	}

	pub async fn handle_match(&self, decision: &MatchDecision) -> Result<()> {
		let res = self.http.post(self.url(HANDLE_MATCH_PATH)).json(decision).send().await?;

		expect_success(HANDLE_MATCH_PATH, &res)
	}

	pub async fn handle_no_match(&self, concat_lastfm: &str) -> Result<()> {
		let decision = MatchDecision::no_match(concat_lastfm);
		let res = self.http.post(self.url(HANDLE_NO_MATCH_PATH)).json(&decision).send().await?;

		expect_success(HANDLE_NO_MATCH_PATH, &res)
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.api_base, path)
	}
}

fn expect_success(path: &'static str, res: &Response) -> Result<()> {
	let status = res.status();

	if !status.is_success() {
		tracing::warn!(path, status = status.as_u16(), "Backend rejected request.");

		return Err(Error::Status { path, status: status.as_u16() });
	}

	Ok(())
}

// The catalog search endpoint answers with a JSON body but no JSON content type, so bodies are
// decoded from raw bytes rather than through `Response::json`.
async fn decode<T>(path: &'static str, res: Response) -> Result<T>
where
	T: DeserializeOwned,
{
	expect_success(path, &res)?;

	let body = res.bytes().await?;

	serde_json::from_slice(&body).map_err(|err| Error::InvalidResponse {
		message: format!("{path} returned an unexpected body: {err}"),
	})
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	fn base_query() -> InspectQuery {
		InspectQuery {
			active_col: None,
			order: SortOrder::Asc,
			filter: String::new(),
			page: 1,
			show: Subset::All,
			start: None,
			end: None,
		}
	}

	#[test]
	fn default_query_omits_date_bounds() {
		let pairs = base_query().to_pairs().expect("pairs failed");
		let names: Vec<_> = pairs.iter().map(|(name, _)| *name).collect();

		assert_eq!(names, vec!["activeCol", "filter", "order", "page", "show"]);
		assert_eq!(pairs[0].1, "0");
	}

	#[test]
	fn overridden_dates_are_sent_as_rfc3339() {
		let query = InspectQuery {
			active_col: Some(SortColumn::Plays),
			order: SortOrder::Desc,
			start: Some(datetime!(2024-03-09 00:00:00 UTC)),
			end: Some(datetime!(2024-03-10 23:59:59 UTC)),
			..base_query()
		};
		let pairs = query.to_pairs().expect("pairs failed");

		assert!(pairs.contains(&("activeCol", "3".to_string())));
		assert!(pairs.contains(&("order", "desc".to_string())));
		assert!(pairs.contains(&("start", "2024-03-09T00:00:00Z".to_string())));
		assert!(pairs.contains(&("end", "2024-03-10T23:59:59Z".to_string())));
	}
}
