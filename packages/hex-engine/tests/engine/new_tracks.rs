use hex_client::{DELETE_NEW_TRACK_PATH, NEW_TRACKS_PATH};
use hex_engine::{Error, NewTracksList};
use hex_testkit::Fixture;

use super::harness;

#[tokio::test]
async fn confirming_selection_acknowledges_and_refetches() {
	let harness = harness(Fixture::sample()).await;
	let mut list = NewTracksList::new();

	list.refresh(&harness.client).await.expect("New tracks fetch failed.");

	let view = list.view().expect("New tracks should be loaded.");

	assert_eq!(view.new_tracks_count, 1);
	assert_eq!(view.new_tracks[0].concat_plex, "Stereolab - Dots and Loops - Miss Modular");

	list.toggle(500);
	list.confirm_selected(&harness.client).await.expect("Confirmation failed.");

	let confirms = harness.backend.requests_to(DELETE_NEW_TRACK_PATH);

	assert_eq!(confirms[0].body, Some(serde_json::json!([500])));
	assert!(list.selection().is_empty());
	assert_eq!(harness.backend.requests_to(NEW_TRACKS_PATH).len(), 2);
	assert_eq!(list.view().map(|view| view.new_tracks_count), Some(0));
}

#[tokio::test]
async fn rejected_confirmation_keeps_selection() {
	let harness = harness(Fixture::sample()).await;
	let mut list = NewTracksList::new();

	list.refresh(&harness.client).await.expect("New tracks fetch failed.");
	list.toggle(500);
	harness.backend.fail_next(DELETE_NEW_TRACK_PATH, 500).expect("Failed to arm failure.");

	let result = list.confirm_selected(&harness.client).await;

	assert!(matches!(result, Err(Error::ServerRejection { .. })));
	assert!(list.selection().contains(500));
	assert_eq!(list.view().map(|view| view.new_tracks_count), Some(1));
}

#[tokio::test]
async fn nothing_selected_is_a_validation_error() {
	let harness = harness(Fixture::sample()).await;
	let mut list = NewTracksList::new();

	assert!(matches!(list.confirm_selected(&harness.client).await, Err(Error::Validation { .. })));
	assert!(harness.backend.requests_to(DELETE_NEW_TRACK_PATH).is_empty());
}
