use std::time::Duration;

use time::Date;
use tokio::time::Instant;

use hex_client::{InspectQuery, InspectResponse, SortColumn, SortOrder, Subset};

use crate::{
	Backend, CacheKey, DateRangeNegotiator, DebounceBuffer, Error, Observers, PageRequest, Pager,
	QueryCache, Result, SelectionSet, Shell, SortState,
};

pub const LISTING_SCOPE: &str = "matches";
pub const LISTING_TITLE: &str = "Inspect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEvent {
	/// The derived key moved; a fetch may be due.
	QueryChanged { key: String },
	Loaded { key: String, count: u64 },
	SelectionChanged { selected: usize },
	DateRangeChanged,
	Failed { error: Error },
}

/// A listing request that has been marked in flight and must be handed back to
/// [`ListingCoordinator::complete_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFetch {
	key: String,
	query: InspectQuery,
}
impl PendingFetch {
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn query(&self) -> &InspectQuery {
		&self.query
	}
}

/// What the listing should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingView<'a> {
	pub response: Option<&'a InspectResponse>,
	/// The rows belong to an earlier key or have been invalidated.
	pub stale: bool,
	/// A request for the current key is in flight.
	pub loading: bool,
}

/// Folds filter, sort, subset, page, and date range into one listing query and keeps its cache
/// consistent with the backend.
#[derive(Debug)]
pub struct ListingCoordinator {
	filter: DebounceBuffer,
	min_filter_chars: usize,
	sort: SortState,
	subset: Subset,
	pager: Pager,
	dates: DateRangeNegotiator,
	selection: SelectionSet<i64>,
	cache: QueryCache<InspectResponse>,
	shown: Option<String>,
	observers: Observers<ListingEvent>,
	last_error: Option<Error>,
}
impl ListingCoordinator {
	pub fn new(cfg: &hex_config::Listing) -> Self {
		Self {
			filter: DebounceBuffer::new(Duration::from_millis(cfg.debounce_ms)),
			min_filter_chars: cfg.min_filter_chars,
			sort: SortState::new(),
			subset: Subset::All,
			pager: Pager::new(cfg.page_size),
			dates: DateRangeNegotiator::new(),
			selection: SelectionSet::new(),
			cache: QueryCache::new(),
			shown: None,
			observers: Observers::default(),
			last_error: None,
		}
	}

	pub fn subscribe<F>(&mut self, listener: F)
	where
		F: FnMut(&ListingEvent) + Send + 'static,
	{
		self.observers.subscribe(listener);
	}

	pub fn activate(&mut self, shell: &mut Shell) {
		shell.set_title(LISTING_TITLE);
	}

	/// Leaving the listing drops the selection.
	pub fn deactivate(&mut self) {
		if !self.selection.is_empty() {
			self.selection.clear();
			self.notify_selection();
		}
	}

	pub fn filter_input(&self) -> &str {
		self.filter.raw()
	}

	pub fn committed_filter(&self) -> &str {
		self.filter.committed()
	}

	pub fn filter_deadline(&self) -> Option<Instant> {
		self.filter.deadline()
	}

	pub fn sort(&self) -> SortState {
		self.sort
	}

	pub fn subset(&self) -> Subset {
		self.subset
	}

	pub fn pager(&self) -> &Pager {
		&self.pager
	}

	pub fn dates(&self) -> &DateRangeNegotiator {
		&self.dates
	}

	pub fn selection(&self) -> &SelectionSet<i64> {
		&self.selection
	}

	pub fn cache(&self) -> &QueryCache<InspectResponse> {
		&self.cache
	}

	pub fn last_error(&self) -> Option<&Error> {
		self.last_error.as_ref()
	}

	pub fn key(&self) -> CacheKey {
		let mut key = CacheKey::new(LISTING_SCOPE)
			.with("activeCol", self.sort.active().map(SortColumn::wire_index).unwrap_or(0))
			.with("filter", self.filter.committed())
			.with("order", self.sort.order().as_str())
			.with("page", self.pager.page())
			.with("show", self.subset.as_str());

		if let Some(range) = self.dates.override_range() {
			key = key
				.with("start", range.start.unix_timestamp())
				.with("end", range.end.unix_timestamp());
		}

		key
	}

	pub fn query(&self) -> InspectQuery {
		let range = self.dates.override_range();

		InspectQuery {
			active_col: self.sort.active(),
			order: self.sort.order(),
			filter: self.filter.committed().to_string(),
			page: self.pager.page(),
			show: self.subset,
			start: range.map(|range| range.start),
			end: range.map(|range| range.end),
		}
	}

	/// One or two committed characters are not yet a meaningful filter.
	pub fn fetch_enabled(&self) -> bool {
		let chars = self.filter.committed().chars().count();

		chars == 0 || chars >= self.min_filter_chars
	}

	/// Marks the current key in flight and returns the request to issue, or `None` when the key
	/// is already cached, already in flight, or fetching is suppressed.
	pub fn begin_fetch(&mut self) -> Option<PendingFetch> {
		if !self.fetch_enabled() {
			return None;
		}

		let key = self.key().to_string();

		if !self.cache.needs_fetch(&key) {
			return None;
		}

		self.cache.mark_in_flight(&key);

		Some(PendingFetch { key, query: self.query() })
	}

	/// Applies a response. A response whose key is no longer current is dropped. Returns true
	/// when the response was stored.
	pub fn complete_fetch(
		&mut self,
		pending: PendingFetch,
		result: hex_client::Result<InspectResponse>,
	) -> Result<bool> {
		let current = self.key().to_string();

		if pending.key != current {
			tracing::debug!(key = %pending.key, current = %current, "Discarding stale listing response.");

			self.cache.abandon(&pending.key);

			return Ok(false);
		}

		let response = match result {
			Ok(response) => response,
			Err(err) => {
				let error = Error::from_fetch(err);

				tracing::warn!(key = %pending.key, error = %error, "Listing fetch failed.");

				self.cache.abandon(&pending.key);
				self.fail(error.clone());

				return Err(error);
			},
		};
		let count = response.count;

		self.cache.store(&pending.key, response);
		self.shown = Some(pending.key.clone());
		self.last_error = None;
		self.observers.notify(&ListingEvent::Loaded { key: pending.key, count });

		if self.pager.set_total(count) {
			tracing::debug!(page = self.pager.page(), count, "Listing page out of range; clamped.");

			self.notify_query();
		}

		Ok(true)
	}

	/// Fetches until the current key has a fresh value or fetching is suppressed.
	pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<()> {
		while let Some(pending) = self.begin_fetch() {
			let result = backend.inspect_matches(pending.query()).await;

			self.complete_fetch(pending, result)?;
		}

		Ok(())
	}

	/// The current key's value when cached, otherwise the last value shown.
	pub fn view(&self) -> ListingView<'_> {
		let key = self.key().to_string();
		let loading = self.cache.is_in_flight(&key);

		if let Some(entry) = self.cache.entry(&key)
			&& let Some(response) = entry.value.as_ref()
		{
			return ListingView { response: Some(response), stale: entry.stale, loading };
		}

		let response = self.shown.as_deref().and_then(|shown| self.cache.get(shown));

		ListingView { response, stale: response.is_some(), loading }
	}

	pub fn set_filter_input(&mut self, text: impl Into<String>, now: Instant) {
		self.filter.input(text, now);
	}

	/// Commits the filter if its quiet period has passed. Returns true when the committed
	/// value changed.
	pub fn poll_filter(&mut self, now: Instant) -> bool {
		let changed = self.filter.poll(now);

		if changed {
			self.query_changed();
		}

		changed
	}

	pub async fn settle_filter(&mut self) -> bool {
		let changed = self.filter.settle().await;

		if changed {
			self.query_changed();
		}

		changed
	}

	pub fn click_sort(&mut self, column: SortColumn) {
		self.sort.click(column);
		self.query_changed();
	}

	/// Chip semantics: picking the active `matched`/`unmatched` chip again returns to `all`.
	pub fn toggle_subset(&mut self, subset: Subset) {
		let next = match subset {
			Subset::All => Subset::All,
			chosen if chosen == self.subset => Subset::All,
			chosen => chosen,
		};

		if next != self.subset {
			self.subset = next;
			self.query_changed();
		}
	}

	pub fn go_to_page(&mut self, request: PageRequest) {
		if self.pager.go_to(request) {
			self.notify_query();
		}
	}

	pub fn apply_dates(&mut self, start: Date, end: Date) -> Result<()> {
		let before = self.dates.override_range();

		if let Err(err) = self.dates.submit(start, end) {
			self.observers.notify(&ListingEvent::Failed { error: err.clone() });

			return Err(err);
		}

		self.observers.notify(&ListingEvent::DateRangeChanged);

		if self.dates.override_range() != before {
			self.query_changed();
		}

		Ok(())
	}

	/// Negotiates the default range on first use.
	pub async fn load_dates(&mut self, backend: &dyn Backend) -> Result<()> {
		if self.dates.is_negotiated() {
			return Ok(());
		}

		let before = self.dates.override_range();

		if let Err(err) = self.dates.negotiate(backend).await {
			self.fail(err.clone());

			return Err(err);
		}

		self.observers.notify(&ListingEvent::DateRangeChanged);

		if self.dates.override_range() != before {
			self.query_changed();
		}

		Ok(())
	}

	pub async fn reset_dates(&mut self, backend: &dyn Backend) -> Result<()> {
		let before = self.dates.override_range();

		if let Err(err) = self.dates.reset(backend).await {
			self.fail(err.clone());

			return Err(err);
		}

		self.observers.notify(&ListingEvent::DateRangeChanged);

		if self.dates.override_range() != before {
			self.query_changed();
		}

		Ok(())
	}

	pub fn toggle_selected(&mut self, match_id: i64) -> bool {
		let selected = self.selection.toggle(match_id);

		self.notify_selection();

		selected
	}

	pub fn clear_selection(&mut self) {
		self.selection.clear();
		self.notify_selection();
	}

	/// Deletes every selected pairing in one batch. The selection survives a failure.
	pub async fn delete_selected(&mut self, backend: &dyn Backend) -> Result<()> {
		if self.selection.is_empty() {
			return Err(Error::validation("No matches selected."));
		}

		let payload = self.selection.to_payload();

		if let Err(err) = backend.delete_matches(&payload).await {
			let error = Error::from_mutation(err);

			tracing::warn!(selected = payload.len(), error = %error, "Bulk delete failed.");

			self.fail(error.clone());

			return Err(error);
		}

		tracing::info!(deleted = payload.len(), "Deleted matches.");

		self.selection.clear();
		self.last_error = None;
		self.notify_selection();
		self.cache.invalidate(LISTING_SCOPE);

		self.refresh(backend).await
	}

	/// Sort direction displayed for `column`.
	pub fn sort_direction(&self, column: SortColumn) -> Option<SortOrder> {
		self.sort.direction_of(column)
	}

	fn query_changed(&mut self) {
		self.pager.reset();
		self.notify_query();
	}

	fn notify_query(&mut self) {
		let key = self.key().to_string();

		self.observers.notify(&ListingEvent::QueryChanged { key });
	}

	fn notify_selection(&mut self) {
		let selected = self.selection.len();

		self.observers.notify(&ListingEvent::SelectionChanged { selected });
	}

	fn fail(&mut self, error: Error) {
		self.last_error = Some(error.clone());
		self.observers.notify(&ListingEvent::Failed { error });
	}
}
