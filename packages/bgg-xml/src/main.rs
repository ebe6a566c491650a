//! CLI entry point.

use bgg_xml::{cli, Settings};
use tracing_subscriber::EnvFilter;

fn main() {
    let settings = Settings::from_env();

    // RUST_LOG wins over BGG_LOG_LEVEL; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(&settings) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
