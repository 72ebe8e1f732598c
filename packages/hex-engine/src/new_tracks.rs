use hex_client::NewTracksResponse;

use crate::{Backend, CacheKey, Error, Observers, QueryCache, Result, SelectionSet};

pub const NEW_TRACKS_SCOPE: &str = "new-tracks";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewTracksEvent {
	Loaded { count: u64 },
	SelectionChanged { selected: usize },
	Confirmed { confirmed: usize },
	Failed { error: Error },
}

/// Recently added catalog tracks awaiting acknowledgement.
#[derive(Debug, Default)]
pub struct NewTracksList {
	cache: QueryCache<NewTracksResponse>,
	selection: SelectionSet<i64>,
	observers: Observers<NewTracksEvent>,
	last_error: Option<Error>,
}
impl NewTracksList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn subscribe<F>(&mut self, listener: F)
	where
		F: FnMut(&NewTracksEvent) + Send + 'static,
	{
		self.observers.subscribe(listener);
	}

	pub fn key(&self) -> CacheKey {
		CacheKey::new(NEW_TRACKS_SCOPE)
	}

	pub fn selection(&self) -> &SelectionSet<i64> {
		&self.selection
	}

	pub fn last_error(&self) -> Option<&Error> {
		self.last_error.as_ref()
	}

	pub fn view(&self) -> Option<&NewTracksResponse> {
		self.cache.get(&self.key().to_string())
	}

	pub async fn refresh(&mut self, backend: &dyn Backend) -> Result<()> {
		let key = self.key().to_string();

		if !self.cache.needs_fetch(&key) {
			return Ok(());
		}

		self.cache.mark_in_flight(&key);

		match backend.new_tracks().await {
			Ok(response) => {
				let count = response.new_tracks_count;

				self.cache.store(&key, response);
				self.last_error = None;
				self.observers.notify(&NewTracksEvent::Loaded { count });

				Ok(())
			},
			Err(err) => {
				let error = Error::from_fetch(err);

				tracing::warn!(error = %error, "New tracks fetch failed.");

				self.cache.abandon(&key);
				self.fail(error.clone());

				Err(error)
			},
		}
	}

	pub fn toggle(&mut self, added_id: i64) -> bool {
		let selected = self.selection.toggle(added_id);

		self.notify_selection();

		selected
	}

	/// Acknowledges the selected tracks in one batch, then re-fetches the list.
	pub async fn confirm_selected(&mut self, backend: &dyn Backend) -> Result<()> {
		if self.selection.is_empty() {
			return Err(Error::validation("No new tracks selected."));
		}

		let payload = self.selection.to_payload();

		if let Err(err) = backend.delete_new_tracks(&payload).await {
			let error = Error::from_mutation(err);

			tracing::warn!(selected = payload.len(), error = %error, "New track confirmation failed.");

			self.fail(error.clone());

			return Err(error);
		}

		tracing::info!(confirmed = payload.len(), "Confirmed new tracks.");

		self.selection.clear();
		self.last_error = None;
		self.notify_selection();
		self.observers.notify(&NewTracksEvent::Confirmed { confirmed: payload.len() });
		self.cache.invalidate(NEW_TRACKS_SCOPE);

		self.refresh(backend).await
	}

	fn notify_selection(&mut self) {
		let selected = self.selection.len();

		self.observers.notify(&NewTracksEvent::SelectionChanged { selected });
	}

	fn fail(&mut self, error: Error) {
		self.last_error = Some(error.clone());
		self.observers.notify(&NewTracksEvent::Failed { error });
	}
}
