pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced to the interaction layer. None of them is fatal; the listing and the
/// review queue report them independently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// Retryable; previously cached data stays on screen.
	#[error("Network error: {message}")]
	TransientNetwork { message: String },
	/// Rejected locally and never sent.
	#[error("Invalid input: {message}")]
	Validation { message: String },
	/// A mutation the server refused. Selection and candidate state are left intact.
	#[error("Server rejected request: {message}")]
	ServerRejection { message: String },
}
impl Error {
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation { message: message.into() }
	}

	pub fn from_fetch(err: hex_client::Error) -> Self {
		Self::TransientNetwork { message: err.to_string() }
	}

	pub fn from_mutation(err: hex_client::Error) -> Self {
		if err.is_rejection() {
			Self::ServerRejection { message: err.to_string() }
		} else {
			Self::TransientNetwork { message: err.to_string() }
		}
	}

	pub fn is_retryable(&self) -> bool {
		!matches!(self, Self::Validation { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejected_mutation_maps_to_server_rejection() {
		let err = hex_client::Error::Status { path: "/api/handle_match", status: 500 };

		assert!(matches!(Error::from_mutation(err), Error::ServerRejection { .. }));
	}

	#[test]
	fn rejected_fetch_is_transient() {
		let err = hex_client::Error::Status { path: "/api/new_tracks", status: 503 };
		let mapped = Error::from_fetch(err);

		assert!(matches!(mapped, Error::TransientNetwork { .. }));
		assert!(mapped.is_retryable());
	}

	#[test]
	fn validation_is_not_retryable() {
		assert!(!Error::validation("bad range").is_retryable());
	}
}
