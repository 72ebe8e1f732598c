use std::io::{Result, Write};

use hex_engine::{Candidate, ListingCoordinator, NewTracksList, ReviewWalker};

const NO_MATCH: &str = "(no match)";

pub fn listing(out: &mut impl Write, listing: &ListingCoordinator) -> Result<()> {
	let view = listing.view();
	let Some(response) = view.response else {
		return writeln!(out, "No matches loaded.");
	};

	if let Some(error) = listing.last_error() {
		writeln!(out, "! {error}")?;
	}

	for row in &response.matches {
		let selected = if listing.selection().contains(row.id) { '*' } else { ' ' };
		let plex = row.plex_track.as_ref().map(|track| track.concat_plex.as_str());

		writeln!(
			out,
			"{selected}{:>6}  {:>5}  {}  ->  {}",
			row.id,
			row.playcount,
			row.concat_lastfm,
			plex.unwrap_or(NO_MATCH)
		)?;
	}

	writeln!(
		out,
		"Page {} of {} ({} matches)",
		listing.pager().page(),
		listing.pager().page_count().unwrap_or(1),
		response.count
	)
}

pub fn new_tracks(out: &mut impl Write, list: &NewTracksList) -> Result<()> {
	let Some(response) = list.view() else {
		return writeln!(out, "No new tracks loaded.");
	};

	for track in &response.new_tracks {
		writeln!(out, "{:>6}  {}", track.added_id, track.concat_plex)?;
	}

	writeln!(out, "{} new track(s)", response.new_tracks_count)
}

pub fn review_item(out: &mut impl Write, walker: &ReviewWalker) -> Result<()> {
	let Some(scrobble) = walker.scrobble() else {
		return writeln!(out, "Nothing to review. Enter r to reload the queue.");
	};
	let progress = walker.progress().map(|progress| progress * 100.0).unwrap_or(0.0);

	writeln!(out)?;
	writeln!(out, "[{progress:.0}%] {}", scrobble.concat_lastfm)?;

	for (index, suggestion) in walker.suggestions().iter().enumerate() {
		let marker = match walker.candidate() {
			Candidate::BySuggestion(picked) if picked.id == suggestion.id => '*',
			_ => ' ',
		};

		writeln!(out, " {marker}{}) {}", index + 1, suggestion.concat_plex)?;
	}

	match walker.candidate().label() {
		Some(label) => writeln!(out, "Candidate: {label}"),
		None => writeln!(out, "Candidate: none"),
	}
}

pub fn search_results(out: &mut impl Write, walker: &ReviewWalker) -> Result<()> {
	if !walker.search().enabled() {
		return writeln!(out, "Search needs at least {} characters.", walker.search().min_chars());
	}

	let results = walker.search_results();

	if results.is_empty() {
		return writeln!(out, "No catalog tracks found.");
	}

	for (index, track) in results.iter().enumerate() {
		writeln!(out, "  s {}) {}", index + 1, track.concat_plex)?;
	}

	Ok(())
}

pub fn help(out: &mut impl Write) -> Result<()> {
	writeln!(
		out,
		"Commands: <n> pick suggestion, /<text> search, s <n> pick result, m match, n no match, c clear, r reload, q quit"
	)
}
