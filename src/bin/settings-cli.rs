use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use vrp_control_plane::backend::HttpDocumentSource;
use vrp_control_plane::settings::constraints::{
    ClinicalUrgencyConfig, OpportunityCostConstraintConfig, WorkDistributionConstraintConfig,
};
use vrp_control_plane::settings::document::{fetch_all_settings, parse_all_settings};
use vrp_control_plane::settings::jitter::next_poll_interval;
use vrp_control_plane::settings::AllSettings;

#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(about = "Inspect and check VRP region settings documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and cross-validate two local settings documents
    Check {
        #[arg(long)]
        optimizer: PathBuf,
        #[arg(long)]
        availability: PathBuf,
    },
    /// Fetch and cross-validate the documents from an HTTP backend
    Fetch {
        #[arg(short, long, default_value = "http://localhost:8080/documents")]
        url: String,
        #[arg(long, default_value_t = 5)]
        timeout_secs: u64,
    },
    /// Sample jittered poll intervals
    PollInterval {
        #[arg(long)]
        sec: i64,
        #[arg(long, default_value_t = 0.0)]
        jitter_ratio: f64,
        #[arg(long, default_value_t = 10)]
        samples: usize,
    },
}

/// Resolved view of one enabled region.
#[derive(Serialize)]
struct RegionSummary {
    service_region_id: i64,
    optimizer_config_id: i64,
    optimize_horizon_days: i64,
    poll_interval_sec: i64,
    availability_enabled: bool,
    clinical_urgency: Option<ClinicalUrgencyConfig>,
    work_distribution: Option<WorkDistributionConstraintConfig>,
    opportunity_cost: Option<OpportunityCostConstraintConfig>,
}

fn summarize(all: &AllSettings) -> Vec<RegionSummary> {
    let mut summaries: Vec<_> = all
        .optimizer_region_settings_map
        .iter()
        .map(|(&service_region_id, settings)| RegionSummary {
            service_region_id,
            optimizer_config_id: settings.optimizer_config_id,
            optimize_horizon_days: settings.optimize_horizon_days,
            poll_interval_sec: settings.poll_interval_sec,
            availability_enabled: all
                .availability_region_settings_map
                .contains_key(&service_region_id),
            clinical_urgency: settings.clinical_urgency_config(),
            work_distribution: settings.work_distribution_config(),
            opportunity_cost: settings.opportunity_cost_config(),
        })
        .collect();
    summaries.sort_by_key(|s| s.service_region_id);
    summaries
}

fn print_summary(all: &AllSettings) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(&summarize(all))?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { optimizer, availability } => {
            let optimizer = std::fs::read_to_string(&optimizer)?;
            let availability = std::fs::read_to_string(&availability)?;
            let all = parse_all_settings(&optimizer, &availability)?;
            print_summary(&all)?;
        }
        Commands::Fetch { url, timeout_secs } => {
            let source = HttpDocumentSource::new(&url, Duration::from_secs(timeout_secs))?;
            let all = fetch_all_settings(&source).await?;
            print_summary(&all)?;
        }
        Commands::PollInterval { sec, jitter_ratio, samples } => {
            for _ in 0..samples {
                println!("{:?}", next_poll_interval(sec, jitter_ratio));
            }
        }
    }

    Ok(())
}
