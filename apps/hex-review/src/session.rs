use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use hex_engine::{Backend, Error, ReviewPhase, ReviewWalker, Shell};

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
	/// One-based suggestion number.
	Pick(usize),
	Search(String),
	/// One-based search result number.
	PickResult(usize),
	Match,
	NoMatch,
	Clear,
	/// Reloads the queue after a failed fetch.
	Retry,
	Quit,
	Unknown(String),
}

pub fn parse_command(line: &str) -> ReviewCommand {
	let line = line.trim();

	if let Some(text) = line.strip_prefix('/') {
		return ReviewCommand::Search(text.trim().to_string());
	}
	if let Ok(number) = line.parse::<usize>() {
		return ReviewCommand::Pick(number);
	}
	if let Some(rest) = line.strip_prefix("s ")
		&& let Ok(number) = rest.trim().parse::<usize>()
	{
		return ReviewCommand::PickResult(number);
	}

	match line {
		"m" => ReviewCommand::Match,
		"n" => ReviewCommand::NoMatch,
		"c" => ReviewCommand::Clear,
		"r" => ReviewCommand::Retry,
		"q" => ReviewCommand::Quit,
		other => ReviewCommand::Unknown(other.to_string()),
	}
}

/// Runs the interactive queue walk until the queue is exhausted, the user quits, or input ends.
/// Engine errors are printed and the session carries on.
pub async fn review<R>(
	cfg: &hex_config::Review,
	backend: &dyn Backend,
	input: R,
	out: &mut impl Write,
) -> color_eyre::Result<()>
where
	R: AsyncBufRead + Unpin,
{
	let mut shell = Shell::new();
	let mut walker = ReviewWalker::new(cfg);
	let mut lines = input.lines();

	walker.activate(&mut shell);

	writeln!(out, "== {} ==", shell.title())?;
	render::help(out)?;

	if let Err(err) = walker.fetch_next(backend).await {
		report(out, &err)?;
	}

	loop {
		if walker.phase() == ReviewPhase::Exhausted {
			writeln!(out, "All scrobbles reviewed.")?;

			break;
		}

		render::review_item(out, &walker)?;
		write!(out, "> ")?;
		out.flush()?;

		let Some(line) = lines.next_line().await? else {
			break;
		};
		let outcome = match parse_command(&line) {
			ReviewCommand::Pick(number) => {
				let id = number
					.checked_sub(1)
					.and_then(|index| walker.suggestions().get(index))
					.map(|suggestion| suggestion.id);

				match id {
					Some(id) => walker.select_suggestion(id),
					None => Err(Error::validation(format!("No suggestion {number}."))),
				}
			},
			ReviewCommand::Search(text) => {
				walker.set_search_input(text);

				let refreshed = walker.refresh_search(backend).await;

				if refreshed.is_ok() {
					render::search_results(out, &walker)?;
				}

				refreshed
			},
			ReviewCommand::PickResult(number) => {
				let id = number
					.checked_sub(1)
					.and_then(|index| walker.search_results().get(index))
					.map(|track| track.id);

				match id {
					Some(id) => walker.select_search_result(id),
					None => Err(Error::validation(format!("No search result {number}."))),
				}
			},
			ReviewCommand::Match => walker.submit_match(backend).await,
			ReviewCommand::NoMatch => walker.submit_no_match(backend).await,
			ReviewCommand::Clear => {
				walker.clear_candidate();

				Ok(())
			},
			ReviewCommand::Retry => walker.fetch_next(backend).await,
			ReviewCommand::Quit => break,
			ReviewCommand::Unknown(raw) => {
				tracing::debug!(input = %raw, "Unrecognised review command.");

				render::help(out)?;

				Ok(())
			},
		};

		if let Err(err) = outcome {
			report(out, &err)?;
		}
	}

	tracing::info!(
		decided = walker.initial_total().unwrap_or(0).saturating_sub(walker.remaining().unwrap_or(0)),
		"Review session ended."
	);

	Ok(())
}

fn report(out: &mut impl Write, err: &Error) -> std::io::Result<()> {
	writeln!(out, "error: {err}")?;

	if err.is_retryable() {
		writeln!(out, "Enter r to retry.")?;
	}

	Ok(())
}
