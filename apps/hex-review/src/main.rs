use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = hex_review::Args::parse();

	hex_review::run(args).await
}
