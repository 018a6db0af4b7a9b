//! Fetch command implementation

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{CliError, RegionsCommand};
use crate::api::http::RiotHttpClient;
use crate::api::{profile_icon_url, RiotApi};
use crate::downloader::{FetchConfig, MatchHistorySession, SessionOutcome};
use crate::region::Region;
use crate::shutdown::SharedShutdown;
use crate::QueueType;

/// The Riot API caps match-ID listing at 100 entries per request.
const MAX_COUNT: usize = 100;

/// Parse and validate the match count argument.
fn parse_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value == 0 {
        return Err("count must be at least 1".to_string());
    }
    if value > MAX_COUNT {
        return Err(format!("count {value} exceeds maximum of {MAX_COUNT}"));
    }
    Ok(value)
}

/// Split a Riot ID of the form `GameName#TagLine`.
fn parse_riot_id(input: &str) -> Result<(String, String), CliError> {
    let trimmed = input.trim();
    let (game_name, tag_line) = trimmed.split_once('#').ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "'{trimmed}' is not a Riot ID; expected GameName#TagLine (e.g. Berserk#KNG0)"
        ))
    })?;

    if game_name.is_empty() || tag_line.is_empty() {
        return Err(CliError::InvalidArgument(
            "both the game name and the tag line must be non-empty".to_string(),
        ));
    }

    Ok((game_name.to_string(), tag_line.to_string()))
}

/// Riot Match Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "riot-match-downloader")]
#[command(about = "Download League of Legends match history from the Riot API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Bind a Prometheus scrape endpoint at this address (e.g. 0.0.0.0:9090)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,

    /// Maximum fetch attempts per match (default: 5, range: 1-20)
    #[arg(long, global = true, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub max_attempts: u32,

    /// Maximum concurrent in-flight requests (default: 20)
    #[arg(long, global = true, default_value = "20", value_parser = clap::value_parser!(u16).range(1..))]
    pub burst_limit: u16,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a player's recent ranked match history
    Fetch(FetchArgs),
    /// List supported region shards and their API hosts
    Regions(RegionsCommand),
}

/// Fetch command arguments
#[derive(Debug, clap::Args)]
pub struct FetchArgs {
    /// Riot ID in GameName#TagLine form (e.g. Berserk#KNG0)
    pub riot_id: String,

    /// Region shard the player is on
    #[arg(long, short)]
    pub region: Region,

    /// Number of recent ranked matches to fetch (max: 100)
    #[arg(long, short, default_value = "20", value_parser = parse_count)]
    pub count: usize,

    /// Write the fetched match records to this JSON file
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also fetch and print ranked standings
    #[arg(long, default_value_t = false)]
    pub ranks: bool,
}

impl FetchArgs {
    /// Execute the fetch command.
    pub async fn execute(&self, cli: &Cli, shutdown: SharedShutdown) -> Result<(), CliError> {
        let (game_name, tag_line) = parse_riot_id(&self.riot_id)?;

        let api: Arc<dyn RiotApi> = Arc::new(RiotHttpClient::from_env()?);
        let config = FetchConfig::default()
            .with_max_attempts(cli.max_attempts)
            .with_burst_limit(cli.burst_limit as usize);

        let session = MatchHistorySession::new(api.clone())
            .with_config(config)
            .with_shutdown(shutdown);

        let spinner = create_spinner(&format!(
            "Fetching up to {} matches for {}#{} ({})...",
            self.count, game_name, tag_line, self.region
        ));

        let outcome = session
            .run(&game_name, &tag_line, self.region, self.count)
            .await;
        spinner.finish_and_clear();
        let outcome = outcome?;

        print_summary(&outcome);

        if self.ranks {
            self.print_ranks(api.as_ref(), &outcome).await?;
        }

        if let Some(path) = &self.output {
            write_records(path, &outcome.matches)?;
            info!(path = %path.display(), records = outcome.matches.len(), "Wrote match records");
            println!("Wrote {} records to {}", outcome.matches.len(), path.display());
        }

        Ok(())
    }

    async fn print_ranks(
        &self,
        api: &dyn RiotApi,
        outcome: &SessionOutcome,
    ) -> Result<(), CliError> {
        let summoner = api
            .summoner_by_puuid(self.region, &outcome.account.puuid)
            .await?;
        let ranks = api
            .league_entries_by_puuid(self.region, &outcome.account.puuid)
            .await?;

        println!();
        println!(
            "Summoner level {} (icon: {})",
            summoner.summoner_level,
            profile_icon_url(summoner.profile_icon_id)
        );
        match &ranks.solo {
            Some(entry) => println!(
                "  Solo/Duo: {} {} {} LP ({}W/{}L)",
                entry.tier, entry.rank, entry.lp, entry.wins, entry.losses
            ),
            None => println!("  Solo/Duo: unranked"),
        }
        match &ranks.flex {
            Some(entry) => println!(
                "  Flex:     {} {} {} LP ({}W/{}L)",
                entry.tier, entry.rank, entry.lp, entry.wins, entry.losses
            ),
            None => println!("  Flex:     unranked"),
        }

        Ok(())
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("hardcoded template is valid"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Write fetched records to a JSON file.
fn write_records(path: &Path, records: &[crate::MatchRecord]) -> Result<(), CliError> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

fn format_game_time(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn print_summary(outcome: &SessionOutcome) {
    let solo = outcome
        .matches
        .iter()
        .filter(|m| m.queue == QueueType::SoloDuo)
        .count();
    let flex = outcome
        .matches
        .iter()
        .filter(|m| m.queue == QueueType::Flex)
        .count();
    let wins = outcome.matches.iter().filter(|m| m.player.win).count();

    println!(
        "Fetched {} matches in {} round(s): {} Solo/Duo, {} Flex, {}W/{}L",
        outcome.matches.len(),
        outcome.rounds,
        solo,
        flex,
        wins,
        outcome.matches.len() - wins
    );

    // Retried matches append out of order, so pick the newest explicitly.
    if let Some(newest) = outcome.matches.iter().max_by_key(|m| m.game_creation) {
        println!("Most recent game: {}", format_game_time(newest.game_creation));
    }

    if !outcome.failed.is_empty() {
        println!(
            "Abandoned {} match(es) after exhausting retries:",
            outcome.failed.len()
        );
        for id in &outcome.failed {
            println!("  {id}");
        }
    }
}
