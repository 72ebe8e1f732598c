mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, Listing, Review, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let api_base = cfg.backend.api_base.as_str();

	if api_base.is_empty() {
		return Err(Error::Validation {
			message: "backend.api_base must be non-empty.".to_string(),
		});
	}
	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "backend.api_base must start with http:// or https://.".to_string(),
		});
	}

	for (key, value) in &cfg.backend.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("backend.default_headers.{key} must be a string."),
			});
		}
	}

	if cfg.listing.debounce_ms == 0 {
		return Err(Error::Validation {
			message: "listing.debounce_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.listing.page_size == 0 {
		return Err(Error::Validation {
			message: "listing.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.listing.min_filter_chars == 0 {
		return Err(Error::Validation {
			message: "listing.min_filter_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.review.min_search_chars == 0 {
		return Err(Error::Validation {
			message: "review.min_search_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.backend.api_base.trim().trim_end_matches('/').to_string();

	cfg.backend.api_base = trimmed;
}
