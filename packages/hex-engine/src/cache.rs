use std::{
	collections::BTreeMap,
	fmt::{Display, Formatter},
};

use serde_json::Value;

/// Canonical identity of a fetch: a scope plus name-sorted parameters.
///
/// Parameters are kept in a `BTreeMap`, so the order in which they are added never affects
/// equality, hashing, or the rendered string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
	scope: &'static str,
	params: BTreeMap<&'static str, String>,
}
impl CacheKey {
	pub fn new(scope: &'static str) -> Self {
		Self { scope, params: BTreeMap::new() }
	}

	pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
		self.params.insert(name, value.to_string());

		self
	}

}
impl Display for CacheKey {
	// Values are JSON-quoted so that `&` or `=` inside filter text cannot alias another key.
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.scope)?;

		for (index, (name, value)) in self.params.iter().enumerate() {
			let separator = if index == 0 { '?' } else { '&' };

			write!(f, "{separator}{name}={}", Value::String(value.clone()))?;
		}

		Ok(())
	}
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
	pub value: Option<T>,
	pub in_flight: bool,
	pub stale: bool,
}
impl<T> Default for CacheEntry<T> {
	fn default() -> Self {
		Self { value: None, in_flight: false, stale: false }
	}
}

/// Map from rendered [`CacheKey`] to the last value fetched for it.
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
	entries: BTreeMap<String, CacheEntry<T>>,
}
impl<T> QueryCache<T> {
	pub fn new() -> Self {
		Self { entries: BTreeMap::new() }
	}

	pub fn entry(&self, key: &str) -> Option<&CacheEntry<T>> {
		self.entries.get(key)
	}

	pub fn get(&self, key: &str) -> Option<&T> {
		self.entries.get(key).and_then(|entry| entry.value.as_ref())
	}

	pub fn is_in_flight(&self, key: &str) -> bool {
		self.entries.get(key).is_some_and(|entry| entry.in_flight)
	}

	/// True when nothing is in flight for `key` and there is no fresh value.
	pub fn needs_fetch(&self, key: &str) -> bool {
		match self.entries.get(key) {
			None => true,
			Some(entry) if entry.in_flight => false,
			Some(entry) => entry.value.is_none() || entry.stale,
		}
	}

	pub fn mark_in_flight(&mut self, key: &str) {
		self.entries.entry(key.to_string()).or_default().in_flight = true;
	}

	pub fn store(&mut self, key: &str, value: T) {
		let entry = self.entries.entry(key.to_string()).or_default();

		entry.value = Some(value);
		entry.in_flight = false;
		entry.stale = false;
	}

	/// Drops the entry for `key`, value and flags alike.
	pub fn remove(&mut self, key: &str) -> Option<T> {
		self.entries.remove(key).and_then(|entry| entry.value)
	}

	/// Clears the in-flight flag without touching any cached value.
	pub fn abandon(&mut self, key: &str) {
		if let Some(entry) = self.entries.get_mut(key) {
			entry.in_flight = false;
		}
	}

	/// Marks every entry whose key starts with `prefix` stale and returns how many matched.
	pub fn invalidate(&mut self, prefix: &str) -> usize {
		let mut count = 0;

		for (_, entry) in self.entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
			entry.stale = true;
			count += 1;
		}

		count
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
impl<T> Default for QueryCache<T> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use std::{
		collections::hash_map::DefaultHasher,
		hash::{Hash, Hasher},
	};

	use super::*;

	fn hash_of(key: &CacheKey) -> u64 {
		let mut hasher = DefaultHasher::new();

		key.hash(&mut hasher);

		hasher.finish()
	}

	#[test]
	fn parameter_order_does_not_change_identity() {
		let a = CacheKey::new("matches").with("page", 2).with("filter", "low").with("show", "all");
		let b = CacheKey::new("matches").with("show", "all").with("page", 2).with("filter", "low");

		assert_eq!(a, b);
		assert_eq!(hash_of(&a), hash_of(&b));
		assert_eq!(a.to_string(), b.to_string());
		assert_eq!(a.to_string(), r#"matches?filter="low"&page="2"&show="all""#);
	}

	#[test]
	fn filter_text_cannot_alias_other_parameters() {
		let injected = CacheKey::new("matches").with("filter", "a\"&page=\"3");
		let honest = CacheKey::new("matches").with("filter", "a").with("page", 3);

		assert_ne!(injected.to_string(), honest.to_string());
	}

	#[test]
	fn in_flight_and_fresh_entries_are_not_refetched() {
		let mut cache = QueryCache::new();

		assert!(cache.needs_fetch("k"));

		cache.mark_in_flight("k");

		assert!(!cache.needs_fetch("k"));

		cache.store("k", 1);

		assert!(!cache.needs_fetch("k"));
		assert_eq!(cache.get("k"), Some(&1));
	}

	#[test]
	fn invalidate_marks_prefix_stale_and_keeps_values() {
		let mut cache = QueryCache::new();

		cache.store("matches?page=\"1\"", 1);
		cache.store("matches?page=\"2\"", 2);
		cache.store("new-tracks", 3);

		assert_eq!(cache.invalidate("matches"), 2);
		assert!(cache.needs_fetch("matches?page=\"1\""));
		assert!(!cache.needs_fetch("new-tracks"));
		assert_eq!(cache.get("matches?page=\"2\""), Some(&2));
	}

	#[test]
	fn abandon_allows_retry() {
		let mut cache: QueryCache<u8> = QueryCache::new();

		cache.mark_in_flight("k");
		cache.abandon("k");

		assert!(cache.needs_fetch("k"));
	}

	#[test]
	fn removed_entry_is_gone_and_refetched() {
		let mut cache = QueryCache::new();

		cache.store("unreviewed", 1);

		assert_eq!(cache.remove("unreviewed"), Some(1));
		assert_eq!(cache.get("unreviewed"), None);
		assert!(cache.needs_fetch("unreviewed"));
		assert!(cache.is_empty());
	}
}
