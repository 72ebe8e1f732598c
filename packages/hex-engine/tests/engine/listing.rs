use std::time::Duration;

use time::macros::date;
use tokio::time::Instant;

use hex_client::{DELETE_MATCHES_PATH, INSPECT_MATCHES_PATH, SortColumn, Subset};
use hex_engine::{Backend, Error, ListingCoordinator, Shell};
use hex_testkit::Fixture;

use super::harness;

fn listing() -> ListingCoordinator {
	ListingCoordinator::new(&hex_config::Listing::default())
}

fn count_of(listing: &ListingCoordinator) -> Option<u64> {
	listing.view().response.map(|response| response.count)
}

#[tokio::test]
async fn activation_sets_title_and_loads_first_page() {
	let harness = harness(Fixture::sample()).await;
	let mut shell = Shell::new();
	let mut listing = listing();

	listing.activate(&mut shell);
	listing.load_dates(&harness.client).await.expect("Date negotiation failed.");
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	assert_eq!(shell.title(), "Inspect");
	assert_eq!(count_of(&listing), Some(2));

	let recorded = harness.backend.requests_to(INSPECT_MATCHES_PATH);

	assert_eq!(recorded.len(), 1);
	assert!(!recorded[0].query.contains_key("start"));
	assert!(!recorded[0].query.contains_key("end"));
}

#[tokio::test]
async fn cached_key_is_not_fetched_again() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();

	listing.refresh(&harness.client).await.expect("Listing refresh failed.");
	listing.click_sort(SortColumn::Plays);
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");
	listing.click_sort(SortColumn::Plays);
	listing.click_sort(SortColumn::Plays);
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	// Three clicks brought the sort back to the first key.
	assert_eq!(harness.backend.requests_to(INSPECT_MATCHES_PATH).len(), 2);

	listing.click_sort(SortColumn::Plays);
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	assert_eq!(harness.backend.requests_to(INSPECT_MATCHES_PATH).len(), 2);
}

#[tokio::test]
async fn short_filter_keeps_previous_rows_without_fetching() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();
	let t0 = Instant::now();

	listing.refresh(&harness.client).await.expect("Listing refresh failed.");
	listing.set_filter_input("lo", t0);
	assert!(listing.poll_filter(t0 + Duration::from_millis(300)));
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	assert_eq!(harness.backend.requests_to(INSPECT_MATCHES_PATH).len(), 1);
	assert_eq!(count_of(&listing), Some(2));
	assert!(listing.view().stale);

	listing.set_filter_input("low", t0 + Duration::from_millis(400));
	assert!(!listing.poll_filter(t0 + Duration::from_millis(600)));
	assert!(listing.poll_filter(t0 + Duration::from_millis(700)));
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	let recorded = harness.backend.requests_to(INSPECT_MATCHES_PATH);

	assert_eq!(recorded.len(), 2);
	assert_eq!(recorded[1].query.get("filter").map(String::as_str), Some("low"));
	assert_eq!(count_of(&listing), Some(1));
}

#[tokio::test]
async fn late_response_does_not_overwrite_newer_key() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();
	let first = listing.begin_fetch().expect("First fetch should start.");

	listing.toggle_subset(Subset::Unmatched);

	let second = listing.begin_fetch().expect("Second fetch should start.");
	let second_result = harness.client.inspect_matches(second.query()).await;

	assert_eq!(listing.complete_fetch(second, second_result), Ok(true));

	let first_result = harness.client.inspect_matches(first.query()).await;

	assert_eq!(listing.complete_fetch(first, first_result), Ok(false));

	let view = listing.view();
	let response = view.response.expect("Listing should have rows.");

	assert_eq!(response.count, 1);
	assert!(response.matches.iter().all(|row| !row.is_resolved()));
	assert!(!view.stale);
}

#[tokio::test]
async fn overridden_dates_are_sent_and_reset_restores_default() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();

	listing.load_dates(&harness.client).await.expect("Date negotiation failed.");
	listing.apply_dates(date!(2024 - 03 - 09), date!(2024 - 03 - 09)).expect("Range should be valid.");
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	let recorded = harness.backend.requests_to(INSPECT_MATCHES_PATH);

	assert_eq!(recorded[0].query.get("start").map(String::as_str), Some("2024-03-09T00:00:00Z"));
	assert_eq!(recorded[0].query.get("end").map(String::as_str), Some("2024-03-09T23:59:59Z"));
	assert_eq!(count_of(&listing), Some(1));

	let rejected = listing.apply_dates(date!(2024 - 03 - 10), date!(2024 - 03 - 09));

	assert!(matches!(rejected, Err(Error::Validation { .. })));
	assert!(listing.dates().has_input_error());

	listing.reset_dates(&harness.client).await.expect("Date reset failed.");
	listing.refresh(&harness.client).await.expect("Listing refresh failed.");

	let recorded = harness.backend.requests_to(INSPECT_MATCHES_PATH);

	assert_eq!(recorded.len(), 2);
	assert!(!recorded[1].query.contains_key("start"));
	assert_eq!(harness.backend.requests_to(hex_client::SCROBBLE_DATE_RANGE_PATH).len(), 2);
}

#[tokio::test]
async fn bulk_delete_clears_selection_and_refetches() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();

	listing.refresh(&harness.client).await.expect("Listing refresh failed.");
	listing.toggle_selected(100);
	listing.delete_selected(&harness.client).await.expect("Bulk delete failed.");

	let deletes = harness.backend.requests_to(DELETE_MATCHES_PATH);

	assert_eq!(deletes.len(), 1);
	assert_eq!(deletes[0].body, Some(serde_json::json!([100])));
	assert!(listing.selection().is_empty());
	assert_eq!(harness.backend.requests_to(INSPECT_MATCHES_PATH).len(), 2);
	assert_eq!(count_of(&listing), Some(1));
	assert!(listing.last_error().is_none());
}

#[tokio::test]
async fn rejected_bulk_delete_keeps_selection() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();

	listing.refresh(&harness.client).await.expect("Listing refresh failed.");
	listing.toggle_selected(101);
	harness.backend.fail_next(DELETE_MATCHES_PATH, 500).expect("Failed to arm failure.");

	let result = listing.delete_selected(&harness.client).await;

	assert!(matches!(result, Err(Error::ServerRejection { .. })));
	assert!(listing.selection().contains(101));
	assert!(matches!(listing.last_error(), Some(Error::ServerRejection { .. })));
	assert_eq!(count_of(&listing), Some(2));

	listing.delete_selected(&harness.client).await.expect("Retry should succeed.");

	assert!(listing.selection().is_empty());
	assert!(listing.last_error().is_none());
}

#[tokio::test]
async fn empty_selection_is_never_sent() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();
	let result = listing.delete_selected(&harness.client).await;

	assert!(matches!(result, Err(Error::Validation { .. })));
	assert!(harness.backend.requests_to(DELETE_MATCHES_PATH).is_empty());
}

#[tokio::test]
async fn failed_listing_fetch_is_retryable() {
	let harness = harness(Fixture::sample()).await;
	let mut listing = listing();

	harness.backend.fail_next(INSPECT_MATCHES_PATH, 503).expect("Failed to arm failure.");

	let result = listing.refresh(&harness.client).await;

	assert!(matches!(result, Err(Error::TransientNetwork { .. })));
	assert!(listing.view().response.is_none());

	listing.refresh(&harness.client).await.expect("Retry should succeed.");

	assert_eq!(count_of(&listing), Some(2));
	assert!(listing.last_error().is_none());
}

#[tokio::test]
async fn backend_trait_object_drives_the_listing() {
	let harness = harness(Fixture::sample()).await;
	let backend: &dyn Backend = &harness.client;
	let mut listing = listing();

	listing.refresh(backend).await.expect("Listing refresh failed.");

	assert_eq!(count_of(&listing), Some(2));
}
