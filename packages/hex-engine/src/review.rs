use hex_client::{MatchDecision, MatchResponse, PlexTrack, Scrobble, Suggestion};

use crate::{Backend, CacheKey, Error, Observers, QueryCache, Result, Shell};

pub const UNREVIEWED_SCOPE: &str = "unreviewed";
pub const SEARCH_SCOPE: &str = "options";
pub const REVIEW_TITLE: &str = "Match";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewPhase {
	#[default]
	Idle,
	Fetching,
	Presented,
	Deciding,
	Submitting,
	Exhausted,
}

/// What the current scrobble would be paired with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Candidate {
	#[default]
	None,
	BySuggestion(Suggestion),
	BySearch(PlexTrack),
}
impl Candidate {
	pub fn plex_id(&self) -> Option<i64> {
		match self {
			Self::None => None,
			Self::BySuggestion(suggestion) => Some(suggestion.id),
			Self::BySearch(track) => Some(track.id),
		}
	}

	pub fn label(&self) -> Option<&str> {
		match self {
			Self::None => None,
			Self::BySuggestion(suggestion) => Some(&suggestion.concat_plex),
			Self::BySearch(track) => Some(&track.concat_plex),
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewEvent {
	PhaseChanged { phase: ReviewPhase },
	ItemLoaded { concat_lastfm: Option<String> },
	CandidateChanged { plex_id: Option<i64> },
	SearchLoaded { results: usize },
	Decided { decision: MatchDecision },
	Failed { error: Error },
}

/// Free-text catalog lookup, independent of the ranked suggestions.
#[derive(Debug)]
pub struct CatalogSearch {
	input: String,
	min_chars: usize,
	results: QueryCache<Vec<PlexTrack>>,
}
impl CatalogSearch {
	pub fn new(min_chars: usize) -> Self {
		Self { input: String::new(), min_chars, results: QueryCache::new() }
	}

	pub fn input(&self) -> &str {
		&self.input
	}

	pub fn min_chars(&self) -> usize {
		self.min_chars
	}

	pub fn set_input(&mut self, text: impl Into<String>) {
		self.input = text.into();
	}

	pub fn clear(&mut self) {
		self.input.clear();
	}

	/// Counts the input as typed, surrounding whitespace included.
	pub fn enabled(&self) -> bool {
		self.input.chars().count() >= self.min_chars
	}

	pub fn key(&self) -> CacheKey {
		CacheKey::new(SEARCH_SCOPE).with("filter", &self.input)
	}

	/// Results for the current input, if they have been fetched.
	pub fn results(&self) -> Option<&[PlexTrack]> {
		if !self.enabled() {
			return None;
		}

		self.results.get(&self.key().to_string()).map(Vec::as_slice)
	}

	/// Fetches results for the current input. Returns false when the input is too short or
	/// the results are already cached.
	pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<bool> {
		if !self.enabled() {
			return Ok(false);
		}

		let key = self.key().to_string();

		if !self.results.needs_fetch(&key) {
			return Ok(false);
		}

		self.results.mark_in_flight(&key);

		match backend.query_catalog(&self.input).await {
			Ok(tracks) => {
				self.results.store(&key, tracks);

				Ok(true)
			},
			Err(err) => {
				self.results.abandon(&key);

				Err(Error::from_fetch(err))
			},
		}
	}
}

/// Walks the unreviewed queue one scrobble at a time.
#[derive(Debug)]
pub struct ReviewWalker {
	phase: ReviewPhase,
	candidate: Candidate,
	search: CatalogSearch,
	queue: QueryCache<MatchResponse>,
	initial_total: Option<u64>,
	remaining: Option<u64>,
	observers: Observers<ReviewEvent>,
	last_error: Option<Error>,
}
impl ReviewWalker {
	pub fn new(cfg: &hex_config::Review) -> Self {
		Self {
			phase: ReviewPhase::Idle,
			candidate: Candidate::None,
			search: CatalogSearch::new(cfg.min_search_chars),
			queue: QueryCache::new(),
			initial_total: None,
			remaining: None,
			observers: Observers::default(),
			last_error: None,
		}
	}

	pub fn subscribe<F>(&mut self, listener: F)
	where
		F: FnMut(&ReviewEvent) + Send + 'static,
	{
		self.observers.subscribe(listener);
	}

	pub fn activate(&mut self, shell: &mut Shell) {
		shell.set_title(REVIEW_TITLE);
	}

	pub fn phase(&self) -> ReviewPhase {
		self.phase
	}

	pub fn candidate(&self) -> &Candidate {
		&self.candidate
	}

	pub fn search(&self) -> &CatalogSearch {
		&self.search
	}

	pub fn last_error(&self) -> Option<&Error> {
		self.last_error.as_ref()
	}

	pub fn initial_total(&self) -> Option<u64> {
		self.initial_total
	}

	pub fn remaining(&self) -> Option<u64> {
		self.remaining
	}

	pub fn item(&self) -> Option<&MatchResponse> {
		self.queue.get(&Self::key().to_string())
	}

	pub fn scrobble(&self) -> Option<&Scrobble> {
		self.item().filter(|item| item.status).and_then(|item| item.scrobble.as_ref())
	}

	pub fn suggestions(&self) -> &[Suggestion] {
		match self.scrobble() {
			Some(_) => self.item().map(|item| item.suggestions.as_slice()).unwrap_or_default(),
			None => &[],
		}
	}

	/// Share of the queue decided since the first item was presented, in `[0, 1]`.
	pub fn progress(&self) -> Option<f64> {
		if self.phase == ReviewPhase::Exhausted {
			return Some(1.0);
		}

		let total = self.initial_total?;
		let remaining = self.remaining?;

		if total == 0 {
			return Some(1.0);
		}

		let done = total.saturating_sub(remaining) as f64;

		Some((done / total as f64).clamp(0.0, 1.0))
	}

	/// Loads the next unreviewed scrobble unless a fresh one is already held.
	pub async fn fetch_next(&mut self, backend: &dyn Backend) -> Result<()> {
		let key = Self::key().to_string();

		if !self.queue.needs_fetch(&key) {
			return Ok(());
		}

		let previous = self.phase;

		self.queue.mark_in_flight(&key);
		self.set_phase(ReviewPhase::Fetching);

		match backend.next_unreviewed().await {
			Ok(response) => {
				self.queue.store(&key, response);
				self.presented();
				self.last_error = None;

				Ok(())
			},
			Err(err) => {
				let error = Error::from_fetch(err);

				tracing::warn!(error = %error, "Next unreviewed fetch failed.");

				self.queue.abandon(&key);
				self.set_phase(match previous {
					ReviewPhase::Fetching => ReviewPhase::Idle,
					phase => phase,
				});
				self.fail(error.clone());

				Err(error)
			},
		}
	}

	pub fn select_suggestion(&mut self, id: i64) -> Result<()> {
		self.ensure_idle_inputs()?;

		let Some(suggestion) = self.suggestions().iter().find(|suggestion| suggestion.id == id)
		else {
			return Err(Error::validation(format!("No suggestion with id {id}.")));
		};
		let candidate = Candidate::BySuggestion(suggestion.clone());

		self.set_candidate(candidate);

		Ok(())
	}

	pub fn set_search_input(&mut self, text: impl Into<String>) {
		self.search.set_input(text);
	}

	pub async fn refresh_search(&mut self, backend: &dyn Backend) -> Result<()> {
		match self.search.refresh(backend).await {
			Ok(true) => {
				let results = self.search.results().map(<[PlexTrack]>::len).unwrap_or(0);

				self.observers.notify(&ReviewEvent::SearchLoaded { results });

				Ok(())
			},
			Ok(false) => Ok(()),
			Err(err) => {
				tracing::warn!(error = %err, "Catalog search failed.");

				self.fail(err.clone());

				Err(err)
			},
		}
	}

	pub fn search_results(&self) -> &[PlexTrack] {
		self.search.results().unwrap_or_default()
	}

	pub fn select_search_result(&mut self, id: i64) -> Result<()> {
		self.ensure_idle_inputs()?;

		let Some(track) = self.search_results().iter().find(|track| track.id == id) else {
			return Err(Error::validation(format!("No search result with id {id}.")));
		};
		let candidate = Candidate::BySearch(track.clone());

		self.set_candidate(candidate);

		Ok(())
	}

	pub fn clear_candidate(&mut self) {
		if self.phase == ReviewPhase::Submitting {
			return;
		}

		self.set_candidate(Candidate::None);
	}

	pub fn can_match(&self) -> bool {
		!self.candidate.is_none()
			&& self.phase != ReviewPhase::Submitting
			&& self.scrobble().is_some()
	}

	/// Pairs the scrobble under review with the candidate.
	pub async fn submit_match(&mut self, backend: &dyn Backend) -> Result<()> {
		if !self.can_match() {
			return Err(Error::validation("No candidate selected."));
		}

		let (Some(plex_id), Some(scrobble)) = (self.candidate.plex_id(), self.scrobble()) else {
			return Err(Error::validation("No candidate selected."));
		};
		let decision = MatchDecision::matched(scrobble.concat_lastfm.clone(), plex_id);

		self.decide(backend, decision).await
	}

	/// Records that the scrobble has no catalog counterpart, whatever the candidate is.
	pub async fn submit_no_match(&mut self, backend: &dyn Backend) -> Result<()> {
		if self.phase == ReviewPhase::Submitting {
			return Err(Error::validation("A decision is already being submitted."));
		}

		let Some(scrobble) = self.scrobble() else {
			return Err(Error::validation("Nothing is under review."));
		};
		let decision = MatchDecision::no_match(scrobble.concat_lastfm.clone());

		self.decide(backend, decision).await
	}

	fn key() -> CacheKey {
		CacheKey::new(UNREVIEWED_SCOPE)
	}

	async fn decide(&mut self, backend: &dyn Backend, decision: MatchDecision) -> Result<()> {
		let previous = self.phase;

		self.set_phase(ReviewPhase::Submitting);

		let outcome = if decision.plex_id == MatchDecision::NO_MATCH_ID {
			backend.handle_no_match(&decision.concat_lastfm).await
		} else {
			backend.handle_match(&decision).await
		};

		if let Err(err) = outcome {
			let error = Error::from_mutation(err);

			tracing::warn!(
				concat_lastfm = %decision.concat_lastfm,
				plex_id = decision.plex_id,
				error = %error,
				"Review decision failed."
			);

			self.set_phase(previous);
			self.fail(error.clone());

			return Err(error);
		}

		tracing::info!(
			concat_lastfm = %decision.concat_lastfm,
			plex_id = decision.plex_id,
			"Recorded review decision."
		);

		// The decided item is gone for good. A failed refetch leaves nothing to decide on.
		self.queue.remove(&Self::key().to_string());
		self.observers.notify(&ReviewEvent::Decided { decision });
		self.search.clear();
		self.set_candidate(Candidate::None);
		self.set_phase(ReviewPhase::Idle);

		self.fetch_next(backend).await
	}

	fn presented(&mut self) {
		let concat_lastfm = self.scrobble().map(|scrobble| scrobble.concat_lastfm.clone());

		match concat_lastfm {
			Some(_) => {
				self.remaining = self.item().and_then(|item| item.unreviewed_count);

				if self.initial_total.is_none() {
					self.initial_total = self.remaining;
				}

				self.set_phase(if self.candidate.is_none() {
					ReviewPhase::Presented
				} else {
					ReviewPhase::Deciding
				});
			},
			None => {
				self.remaining = Some(0);
				self.set_phase(ReviewPhase::Exhausted);
			},
		}

		self.observers.notify(&ReviewEvent::ItemLoaded { concat_lastfm });
	}

	fn ensure_idle_inputs(&self) -> Result<()> {
		if self.phase == ReviewPhase::Submitting {
			return Err(Error::validation("A decision is already being submitted."));
		}

		Ok(())
	}

	fn set_candidate(&mut self, candidate: Candidate) {
		self.candidate = candidate;

		if self.scrobble().is_some() {
			self.set_phase(if self.candidate.is_none() {
				ReviewPhase::Presented
			} else {
				ReviewPhase::Deciding
			});
		}

		let plex_id = self.candidate.plex_id();

		self.observers.notify(&ReviewEvent::CandidateChanged { plex_id });
	}

	fn set_phase(&mut self, phase: ReviewPhase) {
		if self.phase != phase {
			self.phase = phase;
			self.observers.notify(&ReviewEvent::PhaseChanged { phase });
		}
	}

	fn fail(&mut self, error: Error) {
		self.last_error = Some(error.clone());
		self.observers.notify(&ReviewEvent::Failed { error });
	}
}
