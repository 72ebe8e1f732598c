pub mod cache;
pub mod date_range;
pub mod debounce;
pub mod listing;
pub mod new_tracks;
pub mod observer;
pub mod pagination;
pub mod review;
pub mod selection;
pub mod shell;
pub mod sort;

mod error;

pub use cache::{CacheEntry, CacheKey, QueryCache};
pub use date_range::{DateRange, DateRangeNegotiator};
pub use debounce::DebounceBuffer;
pub use error::{Error, Result};
pub use listing::{ListingCoordinator, ListingEvent, ListingView, PendingFetch};
pub use new_tracks::{NewTracksEvent, NewTracksList};
pub use observer::Observers;
pub use pagination::{PageRequest, Pager};
pub use review::{Candidate, CatalogSearch, ReviewEvent, ReviewPhase, ReviewWalker};
pub use selection::SelectionSet;
pub use shell::Shell;
pub use sort::SortState;

use std::{future::Future, pin::Pin};

use hex_client::{
	DateEnvelope, HexClient, InspectQuery, InspectResponse, MatchDecision, MatchResponse,
	NewTracksResponse, PlexTrack,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The remote source of truth. [`HexClient`] is the production implementation.
pub trait Backend
where
	Self: Send + Sync,
{
	fn inspect_matches<'a>(
		&'a self,
		query: &'a InspectQuery,
	) -> BoxFuture<'a, hex_client::Result<InspectResponse>>;

	fn scrobble_date_range(&self) -> BoxFuture<'_, hex_client::Result<DateEnvelope>>;

	fn delete_matches<'a>(&'a self, match_ids: &'a [i64]) -> BoxFuture<'a, hex_client::Result<()>>;

	fn new_tracks(&self) -> BoxFuture<'_, hex_client::Result<NewTracksResponse>>;

	fn delete_new_tracks<'a>(
		&'a self,
		added_ids: &'a [i64],
	) -> BoxFuture<'a, hex_client::Result<()>>;

	fn next_unreviewed(&self) -> BoxFuture<'_, hex_client::Result<MatchResponse>>;

	fn query_catalog<'a>(
		&'a self,
		filter: &'a str,
	) -> BoxFuture<'a, hex_client::Result<Vec<PlexTrack>>>;

	fn handle_match<'a>(
		&'a self,
		decision: &'a MatchDecision,
	) -> BoxFuture<'a, hex_client::Result<()>>;

	fn handle_no_match<'a>(
		&'a self,
		concat_lastfm: &'a str,
	) -> BoxFuture<'a, hex_client::Result<()>>;
}

impl Backend for HexClient {
	fn inspect_matches<'a>(
		&'a self,
		query: &'a InspectQuery,
	) -> BoxFuture<'a, hex_client::Result<InspectResponse>> {
		Box::pin(HexClient::inspect_matches(self, query))
	}

	fn scrobble_date_range(&self) -> BoxFuture<'_, hex_client::Result<DateEnvelope>> {
		Box::pin(HexClient::scrobble_date_range(self))
	}

	fn delete_matches<'a>(&'a self, match_ids: &'a [i64]) -> BoxFuture<'a, hex_client::Result<()>> {
		Box::pin(HexClient::delete_matches(self, match_ids))
	}

	fn new_tracks(&self) -> BoxFuture<'_, hex_client::Result<NewTracksResponse>> {
		Box::pin(HexClient::new_tracks(self))
	}

	fn delete_new_tracks<'a>(
		&'a self,
		added_ids: &'a [i64],
	) -> BoxFuture<'a, hex_client::Result<()>> {
		Box::pin(HexClient::delete_new_tracks(self, added_ids))
	}

	fn next_unreviewed(&self) -> BoxFuture<'_, hex_client::Result<MatchResponse>> {
		Box::pin(HexClient::next_unreviewed(self))
	}

	fn query_catalog<'a>(
		&'a self,
		filter: &'a str,
	) -> BoxFuture<'a, hex_client::Result<Vec<PlexTrack>>> {
		Box::pin(HexClient::query_catalog(self, filter))
	}

	fn handle_match<'a>(
		&'a self,
		decision: &'a MatchDecision,
	) -> BoxFuture<'a, hex_client::Result<()>> {
		Box::pin(HexClient::handle_match(self, decision))
	}

	fn handle_no_match<'a>(
		&'a self,
		concat_lastfm: &'a str,
	) -> BoxFuture<'a, hex_client::Result<()>> {
		Box::pin(HexClient::handle_no_match(self, concat_lastfm))
	}
}
