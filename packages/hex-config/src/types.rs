use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub backend: Backend,
	#[serde(default)]
	pub listing: Listing,
	#[serde(default)]
	pub review: Review,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	/// Base URL of the hex.fm API, without the `/api` suffix.
	pub api_base: String,
	/// Zero disables the request timeout.
	#[serde(default)]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
	/// Mirrors the server's fixed page size; only used to derive the last page.
	#[serde(default = "default_page_size")]
	pub page_size: u32,
	/// Committed filters shorter than this (but non-empty) never reach the server.
	#[serde(default = "default_min_filter_chars")]
	pub min_filter_chars: usize,
}
impl Default for Listing {
	fn default() -> Self {
		Self {
			debounce_ms: default_debounce_ms(),
			page_size: default_page_size(),
			min_filter_chars: default_min_filter_chars(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
	#[serde(default = "default_min_search_chars")]
	pub min_search_chars: usize,
}
impl Default for Review {
	fn default() -> Self {
		Self { min_search_chars: default_min_search_chars() }
	}
}

fn default_debounce_ms() -> u64 {
	300
}

fn default_page_size() -> u32 {
	20
}

fn default_min_filter_chars() -> usize {
	3
}

fn default_min_search_chars() -> usize {
	3
}
