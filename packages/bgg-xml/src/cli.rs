//! Command-line interface.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::cache::ResponseCache;
use crate::client::BggClient;
use crate::config::{validate_thing_id, Settings};
use crate::error::Result;
use crate::models::{parse_search, parse_things, Game, SearchResponse};

/// bgg-xml - Map BoardGameGeek XML API responses onto typed records.
#[derive(Parser)]
#[command(name = "bgg-xml")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a saved API response from disk.
    Parse {
        /// Path to the XML file
        file: PathBuf,

        /// Kind of document
        #[arg(short, long, value_enum, default_value_t = DocumentKind::Thing)]
        kind: DocumentKind,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Fetch games by ID from the API.
    Fetch {
        /// Thing IDs (e.g., 174430)
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip community statistics
        #[arg(long)]
        no_stats: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Search games by name.
    Search {
        /// Search query
        query: String,

        /// Only return exact name matches
        #[arg(long)]
        exact: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// Delete cached API responses.
    ClearCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocumentKind {
    /// `/thing` response
    Thing,
    /// `/search` response
    Search,
}

/// Run the CLI.
pub fn run(settings: &Settings) -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file, kind, format } => parse_command(&file, kind, format),
        Commands::Fetch {
            ids,
            no_stats,
            format,
        } => fetch_command(settings, &ids, !no_stats, format),
        Commands::Search {
            query,
            exact,
            format,
        } => search_command(settings, &query, exact, format),
        Commands::ClearCache => clear_cache_command(settings),
    }
}

fn parse_command(file: &Path, kind: DocumentKind, format: OutputFormat) -> Result<()> {
    let xml = std::fs::read_to_string(file)?;

    match kind {
        DocumentKind::Thing => {
            let games = parse_things(&xml)?;
            print_games_summary(&games);
            println!("{}", render(&games, format)?);
        }
        DocumentKind::Search => {
            let response = parse_search(&xml)?;
            print_search_summary(&response);
            println!("{}", render(&response, format)?);
        }
    }
    Ok(())
}

fn fetch_command(
    settings: &Settings,
    ids: &[String],
    include_stats: bool,
    format: OutputFormat,
) -> Result<()> {
    // Validate inputs before making HTTP requests
    let ids = ids
        .iter()
        .map(|id| validate_thing_id(id))
        .collect::<Result<Vec<_>>>()?;

    let client = BggClient::new(settings.clone())?;
    let pb = spinner(format!("Fetching {} game(s)...", ids.len()));
    let games = client.get_things(&ids, include_stats);
    pb.finish_and_clear();
    let games = games?;

    print_games_summary(&games);
    println!("{}", render(&games, format)?);
    Ok(())
}

fn search_command(
    settings: &Settings,
    query: &str,
    exact: bool,
    format: OutputFormat,
) -> Result<()> {
    let client = BggClient::new(settings.clone())?;
    let pb = spinner(format!("Searching for '{query}'..."));
    let response = client.search(query, exact);
    pb.finish_and_clear();
    let response = response?;

    print_search_summary(&response);
    println!("{}", render(&response, format)?);
    Ok(())
}

fn clear_cache_command(settings: &Settings) -> Result<()> {
    // Clearing works even when caching is switched off
    let cache = ResponseCache::new(&settings.cache_dir, settings.cache_ttl);
    let removed = cache.clear()?;

    eprintln!(
        "{} {} from {}",
        style("Removed:").bold(),
        removed,
        style(cache.dir().display()).dim()
    );
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_games_summary(games: &[Game]) {
    for game in games {
        let year = game
            .year_published
            .map_or_else(String::new, |y| format!(" ({y})"));
        let rank = game
            .bgg_rank()
            .map_or_else(String::new, |r| format!("  rank #{r}"));
        eprintln!(
            "{} {}{}{}",
            style(game.id).dim(),
            style(game.primary_name()).green().bold(),
            year,
            style(rank).cyan()
        );
    }
    eprintln!("{} {}", style("Games:").bold(), games.len());
}

fn print_search_summary(response: &SearchResponse) {
    eprintln!(
        "{} {} of {}",
        style("Results:").bold(),
        response.results.len(),
        style(response.total).cyan()
    );
}

/// Serialize records in the requested format.
fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(value)?,
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
    })
}
