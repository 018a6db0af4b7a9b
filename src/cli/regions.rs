//! CLI command for listing supported region shards

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::region::Region;

/// Regions subcommand
#[derive(Debug, Args)]
pub struct RegionsCommand {
    /// Output format
    #[arg(long, default_value = "human")]
    format: OutputFormat,
}

/// Output format for the regions command
#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl RegionsCommand {
    /// Execute the regions command.
    pub async fn execute(&self) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("{:<6} {:<26} {}", "SHARD", "MATCH ROUTING", "PLATFORM HOST");
                for region in Region::ALL {
                    println!(
                        "{:<6} {:<26} {}",
                        region.to_string(),
                        region.routing().host(),
                        region.platform_host()
                    );
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = Region::ALL
                    .iter()
                    .map(|region| {
                        json!({
                            "shard": region.to_string(),
                            "routing_host": region.routing().host(),
                            "platform_host": region.platform_host(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        Ok(())
    }
}
