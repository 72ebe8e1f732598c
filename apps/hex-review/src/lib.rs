pub mod render;
pub mod session;

use std::{collections::BTreeSet, io::Write, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre;
use time::Date;
use tokio::{io::BufReader, time::Instant};
use tracing_subscriber::EnvFilter;

use hex_client::{HexClient, SortColumn, Subset};
use hex_engine::{Backend, ListingCoordinator, NewTracksList, PageRequest};

#[derive(Debug, Parser)]
#[command(
	version = hex_cli::VERSION,
	rename_all = "kebab",
	styles = hex_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Print one page of scrobble/track pairings.
	Inspect(InspectArgs),
	/// Delete pairings so their scrobbles return to the review queue.
	Unmatch {
		#[arg(required = true, value_name = "ID")]
		ids: Vec<i64>,
	},
	/// List recently added catalog tracks.
	NewTracks,
	/// Acknowledge recently added catalog tracks.
	ConfirmNewTracks {
		#[arg(required = true, value_name = "ID")]
		ids: Vec<i64>,
	},
	/// Walk the unreviewed queue interactively.
	Review,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct InspectArgs {
	#[arg(long, default_value = "")]
	pub filter: String,
	#[arg(long, value_enum)]
	pub sort: Option<SortArg>,
	#[arg(long, requires = "sort")]
	pub desc: bool,
	#[arg(long, value_enum, default_value_t = ShowArg::All)]
	pub show: ShowArg,
	#[arg(long, default_value_t = 1)]
	pub page: u32,
	#[arg(long, value_parser = hex_cli::parse_day, requires = "end", value_name = "YYYY-MM-DD")]
	pub start: Option<Date>,
	#[arg(long, value_parser = hex_cli::parse_day, requires = "start", value_name = "YYYY-MM-DD")]
	pub end: Option<Date>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
	Scrobble,
	Plex,
	Plays,
}
impl From<SortArg> for SortColumn {
	fn from(arg: SortArg) -> Self {
		match arg {
			SortArg::Scrobble => Self::Scrobble,
			SortArg::Plex => Self::PlexTrack,
			SortArg::Plays => Self::Plays,
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ShowArg {
	#[default]
	All,
	Matched,
	Unmatched,
}
impl From<ShowArg> for Subset {
	fn from(arg: ShowArg) -> Self {
		match arg {
			ShowArg::All => Self::All,
			ShowArg::Matched => Self::Matched,
			ShowArg::Unmatched => Self::Unmatched,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = hex_config::load(&args.config)?;

	init_tracing(&config)?;

	let client = HexClient::new(&config.backend)?;
	let mut out = std::io::stdout().lock();

	tracing::debug!(api_base = %client.api_base(), "Backend client ready.");

	match args.command {
		Command::Inspect(inspect) => inspect_page(&config.listing, &client, &inspect, &mut out).await,
		Command::Unmatch { ids } => unmatch(&config.listing, &client, &ids, &mut out).await,
		Command::NewTracks => new_tracks(&client, &mut out).await,
		Command::ConfirmNewTracks { ids } => confirm_new_tracks(&client, &ids, &mut out).await,
		Command::Review => {
			let input = BufReader::new(tokio::io::stdin());

			session::review(&config.review, &client, input, &mut out).await
		},
	}
}

pub async fn inspect_page(
	cfg: &hex_config::Listing,
	backend: &dyn Backend,
	args: &InspectArgs,
	out: &mut impl Write,
) -> color_eyre::Result<()> {
	let mut listing = ListingCoordinator::new(cfg);
	let now = Instant::now();

	listing.load_dates(backend).await?;
	// There are no keystrokes to wait for, so the filter commits at once.
	listing.set_filter_input(args.filter.trim(), now);
	listing.poll_filter(now + Duration::from_millis(cfg.debounce_ms));

	if !listing.fetch_enabled() {
		return Err(eyre::eyre!(
			"--filter needs at least {} characters or none at all.",
			cfg.min_filter_chars
		));
	}

	if let Some(sort) = args.sort {
		let column = SortColumn::from(sort);

		listing.click_sort(column);

		if args.desc {
			listing.click_sort(column);
		}
	}

	listing.toggle_subset(args.show.into());

	if let (Some(start), Some(end)) = (args.start, args.end) {
		listing.apply_dates(start, end)?;
	}

	listing.go_to_page(PageRequest::Jump(args.page));
	listing.refresh(backend).await?;

	render::listing(out, &listing)?;

	Ok(())
}

pub async fn unmatch(
	cfg: &hex_config::Listing,
	backend: &dyn Backend,
	ids: &[i64],
	out: &mut impl Write,
) -> color_eyre::Result<()> {
	let mut listing = ListingCoordinator::new(cfg);
	let ids: BTreeSet<i64> = ids.iter().copied().collect();

	for id in &ids {
		listing.toggle_selected(*id);
	}

	listing.delete_selected(backend).await?;

	writeln!(out, "Unmatched {} pairing(s).", ids.len())?;
	render::listing(out, &listing)?;

	Ok(())
}

pub async fn new_tracks(backend: &dyn Backend, out: &mut impl Write) -> color_eyre::Result<()> {
	let mut list = NewTracksList::new();

	list.refresh(backend).await?;

	render::new_tracks(out, &list)?;

	Ok(())
}

pub async fn confirm_new_tracks(
	backend: &dyn Backend,
	ids: &[i64],
	out: &mut impl Write,
) -> color_eyre::Result<()> {
	let mut list = NewTracksList::new();
	let ids: BTreeSet<i64> = ids.iter().copied().collect();

	for id in &ids {
		list.toggle(*id);
	}

	list.confirm_selected(backend).await?;

	writeln!(out, "Confirmed {} new track(s).", ids.len())?;
	render::new_tracks(out, &list)?;

	Ok(())
}

fn init_tracing(config: &hex_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
