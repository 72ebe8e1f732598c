use std::time::Duration;

use tokio::time::{self, Instant};

/// Raw text input with a committed value that trails it by a quiet period.
///
/// Every call to [`DebounceBuffer::input`] restarts the timer. The committed value only moves
/// once the input has been left alone for the whole delay.
#[derive(Debug, Clone)]
pub struct DebounceBuffer {
	delay: Duration,
	raw: String,
	committed: String,
	deadline: Option<Instant>,
}
impl DebounceBuffer {
	pub fn new(delay: Duration) -> Self {
		Self { delay, raw: String::new(), committed: String::new(), deadline: None }
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}

	pub fn committed(&self) -> &str {
		&self.committed
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	pub fn input(&mut self, text: impl Into<String>, now: Instant) {
		self.raw = text.into();
		self.deadline = Some(now + self.delay);
	}

	/// Commits the raw value if the deadline has passed. Returns true when the committed value
	/// changed.
	pub fn poll(&mut self, now: Instant) -> bool {
		let Some(deadline) = self.deadline else {
			return false;
		};

		if now < deadline {
			return false;
		}

		self.deadline = None;

		if self.committed == self.raw {
			return false;
		}

		self.committed = self.raw.clone();

		true
	}

	/// Waits out the pending deadline, if any, and commits.
	pub async fn settle(&mut self) -> bool {
		let Some(deadline) = self.deadline else {
			return false;
		};

		time::sleep_until(deadline).await;

		self.poll(Instant::now())
	}
}
