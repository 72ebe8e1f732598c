pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error(transparent)]
	TimeFormat(#[from] time::error::Format),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{path} returned HTTP {status}.")]
	Status { path: &'static str, status: u16 },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// True when the server answered with a non-success status.
	pub fn is_rejection(&self) -> bool {
		matches!(self, Self::Status { .. })
	}
}
