use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use time::{Date, macros::format_description};

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.usage(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}

/// Value parser for `YYYY-MM-DD` day arguments.
pub fn parse_day(raw: &str) -> Result<Date, String> {
	Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
		.map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}
