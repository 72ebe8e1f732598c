use time::{Date, OffsetDateTime, Time};

use hex_client::DateEnvelope;

use crate::{Backend, Error, Result};

/// Inclusive window over scrobble timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
	pub start: OffsetDateTime,
	pub end: OffsetDateTime,
}
impl DateRange {
	/// Normalises to `start 00:00:00` and `end 23:59:59` (UTC) and requires `start < end`.
	pub fn from_days(start: Date, end: Date) -> Result<Self> {
		let start = start.with_time(Time::MIDNIGHT).assume_utc();
		let end = end
			.with_hms(23, 59, 59)
			.map_err(|err| Error::validation(format!("Invalid end date: {err}.")))?
			.assume_utc();

		if start >= end {
			return Err(Error::validation("Start date must be before end date."));
		}

		Ok(Self { start, end })
	}

	/// The server's envelope, or `None` for an empty library.
	pub fn from_envelope(envelope: DateEnvelope) -> Result<Option<Self>> {
		let (Some(start), Some(end)) = (envelope.start, envelope.end) else {
			return Ok(None);
		};
		let start = OffsetDateTime::from_unix_timestamp(start)
			.map_err(|err| Error::validation(format!("Invalid envelope start: {err}.")))?;
		let end = OffsetDateTime::from_unix_timestamp(end)
			.map_err(|err| Error::validation(format!("Invalid envelope end: {err}.")))?;

		Ok(Some(Self { start, end }))
	}
}

/// Tracks the server default range and the user's override of it.
#[derive(Debug, Clone, Default)]
pub struct DateRangeNegotiator {
	default: Option<DateRange>,
	current: Option<DateRange>,
	negotiated: bool,
	input_error: bool,
}
impl DateRangeNegotiator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn default_range(&self) -> Option<DateRange> {
		self.default
	}

	pub fn current(&self) -> Option<DateRange> {
		self.current
	}

	pub fn is_negotiated(&self) -> bool {
		self.negotiated
	}

	pub fn has_input_error(&self) -> bool {
		self.input_error
	}

	/// The range to send with a listing request; `None` while the default is in effect.
	pub fn override_range(&self) -> Option<DateRange> {
		match self.current {
			Some(current) if Some(current) != self.default => Some(current),
			_ => None,
		}
	}

	/// Makes `envelope` the default and the working range.
	pub fn adopt(&mut self, envelope: DateEnvelope) -> Result<()> {
		let range = DateRange::from_envelope(envelope)?;

		self.default = range;
		self.current = range;
		self.negotiated = true;
		self.input_error = false;

		Ok(())
	}

	/// Fetches the default envelope on first activation only.
	pub async fn negotiate(&mut self, backend: &dyn Backend) -> Result<()> {
		if self.negotiated {
			return Ok(());
		}

		self.reset(backend).await
	}

	/// Re-requests the default envelope and restores it as current.
	pub async fn reset(&mut self, backend: &dyn Backend) -> Result<()> {
		let envelope = backend.scrobble_date_range().await.map_err(Error::from_fetch)?;

		tracing::debug!(start = ?envelope.start, end = ?envelope.end, "Adopted scrobble date range.");

		self.adopt(envelope)
	}

	/// Applies a user-selected range. An invalid pair flags an input error and leaves the
	/// working range untouched.
	pub fn submit(&mut self, start: Date, end: Date) -> Result<DateRange> {
		match DateRange::from_days(start, end) {
			Ok(range) => {
				self.current = Some(range);
				self.input_error = false;

				Ok(range)
			},
			Err(err) => {
				self.input_error = true;

				Err(err)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use time::macros::{date, datetime};

	use super::*;

	fn envelope() -> DateEnvelope {
		DateEnvelope { start: Some(1_709_942_400), end: Some(1_710_374_400) }
	}

	#[test]
	fn reversed_days_are_rejected() {
		let err = DateRange::from_days(date!(2024 - 03 - 10), date!(2024 - 03 - 09))
			.expect_err("Expected validation error.");

		assert!(matches!(err, Error::Validation { .. }));
	}

	#[test]
	fn ordered_days_are_normalised_to_day_bounds() {
		let range = DateRange::from_days(date!(2024 - 03 - 09), date!(2024 - 03 - 10))
			.expect("Range should be valid.");

		assert_eq!(range.start, datetime!(2024-03-09 00:00:00 UTC));
		assert_eq!(range.end, datetime!(2024-03-10 23:59:59 UTC));
	}

	#[test]
	fn single_day_is_a_valid_range() {
		let day = date!(2024 - 03 - 09);

		assert!(DateRange::from_days(day, day).is_ok());
	}

	#[test]
	fn default_range_is_not_an_override() {
		let mut negotiator = DateRangeNegotiator::new();

		negotiator.adopt(envelope()).expect("Envelope should be valid.");

		assert!(negotiator.current().is_some());
		assert_eq!(negotiator.override_range(), None);
	}

	#[test]
	fn invalid_submission_flags_error_and_keeps_state() {
		let mut negotiator = DateRangeNegotiator::new();

		negotiator.adopt(envelope()).expect("Envelope should be valid.");

		let before = negotiator.current();

		assert!(negotiator.submit(date!(2024 - 03 - 10), date!(2024 - 03 - 09)).is_err());
		assert!(negotiator.has_input_error());
		assert_eq!(negotiator.current(), before);

		let applied = negotiator
			.submit(date!(2024 - 03 - 09), date!(2024 - 03 - 10))
			.expect("Range should be valid.");

		assert!(!negotiator.has_input_error());
		assert_eq!(negotiator.override_range(), Some(applied));
	}

	#[test]
	fn empty_library_has_no_range() {
		let mut negotiator = DateRangeNegotiator::new();

		negotiator.adopt(DateEnvelope { start: None, end: None }).expect("Envelope should parse.");

		assert!(negotiator.is_negotiated());
		assert_eq!(negotiator.current(), None);
	}
}
