use serde_json::json;

use hex_client::{HANDLE_MATCH_PATH, HANDLE_NO_MATCH_PATH, NEXT_UNREVIEWED_PATH, QUERY_PATH};
use hex_engine::{Candidate, Error, ReviewPhase, ReviewWalker, Shell};
use hex_testkit::Fixture;

use super::harness;

fn walker() -> ReviewWalker {
	ReviewWalker::new(&hex_config::Review::default())
}

fn current(walker: &ReviewWalker) -> Option<String> {
	walker.scrobble().map(|scrobble| scrobble.concat_lastfm.clone())
}

#[tokio::test]
async fn match_advances_queue_and_resets_candidate() {
	let harness = harness(Fixture::sample()).await;
	let mut shell = Shell::new();
	let mut walker = walker();

	walker.activate(&mut shell);
	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");

	assert_eq!(shell.title(), "Match");
	assert_eq!(walker.phase(), ReviewPhase::Presented);
	assert_eq!(current(&walker).as_deref(), Some("Can - Vitamin C"));
	assert_eq!(walker.suggestions().iter().map(|s| s.id).collect::<Vec<_>>(), vec![3]);
	assert_eq!(walker.progress(), Some(0.0));

	walker.set_search_input("vitamin");
	walker.select_suggestion(3).expect("Suggestion should exist.");
	walker.submit_match(&harness.client).await.expect("Match failed.");

	let decisions = harness.backend.requests_to(HANDLE_MATCH_PATH);

	assert_eq!(decisions.len(), 1);
	assert_eq!(decisions[0].body, Some(json!({ "concatLastfm": "Can - Vitamin C", "plexId": 3 })));
	assert_eq!(harness.backend.requests_to(NEXT_UNREVIEWED_PATH).len(), 2);
	assert_eq!(current(&walker).as_deref(), Some("Low - Monkey"));
	assert_eq!(walker.candidate(), &Candidate::None);
	assert_eq!(walker.search().input(), "");
	assert_eq!(walker.phase(), ReviewPhase::Presented);
	assert_eq!(walker.initial_total(), Some(3));
	assert_eq!(walker.remaining(), Some(2));
}

#[tokio::test]
async fn no_match_posts_zero_whatever_the_candidate() {
	let harness = harness(Fixture::sample()).await;
	let mut walker = walker();

	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");
	walker.select_suggestion(3).expect("Suggestion should exist.");
	walker.submit_no_match(&harness.client).await.expect("No match failed.");

	let decisions = harness.backend.requests_to(HANDLE_NO_MATCH_PATH);

	assert_eq!(decisions.len(), 1);
	assert_eq!(decisions[0].body, Some(json!({ "concatLastfm": "Can - Vitamin C", "plexId": 0 })));
	assert!(harness.backend.requests_to(HANDLE_MATCH_PATH).is_empty());
	assert!(walker.candidate().is_none());
}

#[tokio::test]
async fn rejected_decision_keeps_candidate_for_retry() {
	let harness = harness(Fixture::sample()).await;
	let mut walker = walker();

	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");
	walker.select_suggestion(3).expect("Suggestion should exist.");
	harness.backend.fail_next(HANDLE_MATCH_PATH, 500).expect("Failed to arm failure.");

	let result = walker.submit_match(&harness.client).await;

	assert!(matches!(result, Err(Error::ServerRejection { .. })));
	assert_eq!(walker.candidate().plex_id(), Some(3));
	assert_eq!(walker.phase(), ReviewPhase::Deciding);
	assert_eq!(current(&walker).as_deref(), Some("Can - Vitamin C"));
	assert!(walker.can_match());
	assert_eq!(harness.backend.unreviewed_count(), 3);

	walker.submit_match(&harness.client).await.expect("Retry should succeed.");

	assert_eq!(harness.backend.unreviewed_count(), 2);
	assert!(walker.last_error().is_none());
}

#[tokio::test]
async fn search_result_replaces_suggestion_candidate() {
	let harness = harness(Fixture::sample()).await;
	let mut walker = walker();

	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");
	walker.select_suggestion(3).expect("Suggestion should exist.");

	walker.set_search_input("lo");
	walker.refresh_search(&harness.client).await.expect("Search failed.");
	assert!(harness.backend.requests_to(QUERY_PATH).is_empty());

	walker.set_search_input("low monkey");
	walker.refresh_search(&harness.client).await.expect("Search failed.");
	walker.refresh_search(&harness.client).await.expect("Search failed.");

	assert_eq!(harness.backend.requests_to(QUERY_PATH).len(), 1);
	assert_eq!(walker.search_results().iter().map(|track| track.id).collect::<Vec<_>>(), vec![2]);

	walker.select_search_result(2).expect("Result should exist.");

	assert!(matches!(walker.candidate(), Candidate::BySearch(track) if track.id == 2));

	walker.submit_match(&harness.client).await.expect("Match failed.");

	let decisions = harness.backend.requests_to(HANDLE_MATCH_PATH);

	assert_eq!(decisions[0].body, Some(json!({ "concatLastfm": "Can - Vitamin C", "plexId": 2 })));
}

#[tokio::test]
async fn walking_the_whole_queue_ends_exhausted() {
	let harness = harness(Fixture::sample()).await;
	let mut walker = walker();
	let mut seen = Vec::new();

	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");

	while let Some(concat_lastfm) = current(&walker) {
		assert!(!seen.contains(&concat_lastfm), "{concat_lastfm} presented twice");

		seen.push(concat_lastfm);
		walker.submit_no_match(&harness.client).await.expect("No match failed.");
	}

	assert_eq!(seen, vec!["Can - Vitamin C", "Low - Monkey", "Stereolab - Miss Modular"]);
	assert_eq!(walker.phase(), ReviewPhase::Exhausted);
	assert_eq!(walker.progress(), Some(1.0));
	assert!(!walker.can_match());
}

#[tokio::test]
async fn empty_queue_is_exhausted_immediately() {
	let harness = harness(Fixture::new()).await;
	let mut walker = walker();

	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");

	assert_eq!(walker.phase(), ReviewPhase::Exhausted);
	assert!(matches!(walker.submit_no_match(&harness.client).await, Err(Error::Validation { .. })));
}

#[tokio::test]
async fn failed_queue_fetch_is_reported_and_retryable() {
	let harness = harness(Fixture::sample()).await;
	let mut walker = walker();

	harness.backend.fail_next(NEXT_UNREVIEWED_PATH, 502).expect("Failed to arm failure.");

	let result = walker.fetch_next(&harness.client).await;

	assert!(matches!(result, Err(Error::TransientNetwork { .. })));
	assert_eq!(walker.phase(), ReviewPhase::Idle);
	assert!(walker.last_error().is_some());

	walker.fetch_next(&harness.client).await.expect("Retry should succeed.");

	assert_eq!(walker.phase(), ReviewPhase::Presented);
	assert!(walker.last_error().is_none());
}

#[tokio::test]
async fn failed_refetch_after_decision_drops_the_decided_item() {
	let harness = harness(Fixture::sample()).await;
	let mut walker = walker();

	walker.fetch_next(&harness.client).await.expect("Queue fetch failed.");
	walker.select_suggestion(3).expect("Suggestion should exist.");
	harness.backend.fail_next(NEXT_UNREVIEWED_PATH, 502).expect("Failed to arm failure.");

	let result = walker.submit_match(&harness.client).await;

	assert!(matches!(result, Err(Error::TransientNetwork { .. })));
	assert_eq!(harness.backend.requests_to(HANDLE_MATCH_PATH).len(), 1);
	assert_eq!(current(&walker), None);
	assert!(walker.item().is_none());
	assert!(walker.candidate().is_none());
	assert_eq!(walker.phase(), ReviewPhase::Idle);
	assert!(walker.last_error().is_some());
	assert!(!walker.can_match());
	assert!(matches!(walker.submit_no_match(&harness.client).await, Err(Error::Validation { .. })));
	assert!(harness.backend.requests_to(HANDLE_NO_MATCH_PATH).is_empty());

	walker.fetch_next(&harness.client).await.expect("Retry should succeed.");

	assert_eq!(current(&walker).as_deref(), Some("Low - Monkey"));
	assert_eq!(walker.phase(), ReviewPhase::Presented);
	assert!(walker.last_error().is_none());
	assert_eq!(walker.remaining(), Some(2));
	assert_eq!(walker.initial_total(), Some(3));
}
