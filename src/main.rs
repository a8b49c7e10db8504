use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use io_registered_bot::cli::{Cli, Commands};
use io_registered_bot::config::Config;
use io_registered_bot::error::Result;
use io_registered_bot::io::IoServiceClient;
use io_registered_bot::reconcile::{
    DateRange, ReconcileEngine, ReconcileOutcome, RetryPolicy, Strategy,
};
use io_registered_bot::{files, utils};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("io_registered_bot=debug,info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // CLI flags win over file and environment.
    if let Some(token) = cli.token {
        config.io.token = Some(token);
    }
    if let Some(base_url) = cli.base_url {
        config.io.base_url = base_url;
    }

    let result = match cli.command {
        Commands::RegisteredFast {
            input,
            registered,
            unregistered,
            start_date,
            end_date,
            sleep_ms,
        } => {
            registered_fast(
                &config,
                &input,
                &registered,
                &unregistered,
                start_date,
                end_date,
                sleep_ms,
            )
            .await
        }

        Commands::RegisteredSlow {
            input,
            registered,
            unregistered,
            sleep_ms,
        } => registered_slow(&config, &input, &registered, &unregistered, sleep_ms).await,
    };

    if let Err(e) = result {
        error!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn registered_fast(
    config: &Config,
    input: &Path,
    registered: &Path,
    unregistered: &Path,
    start_date: Option<chrono::NaiveDate>,
    end_date: Option<chrono::NaiveDate>,
    sleep_ms: Option<u64>,
) -> Result<()> {
    let codes = files::read_fiscal_codes(input)?;
    println!(
        "Read {} fiscal codes from {}",
        codes.len().to_string().cyan(),
        input.display()
    );

    let today = chrono::Utc::now().date_naive();
    let range = DateRange::new(start_date.unwrap_or(today), end_date.unwrap_or(today));
    info!(start = %range.start, end = %range.end, "retrieving subscription feeds");

    let engine = ReconcileEngine::new(build_client(config)?, retry_policy(config, sleep_ms));

    let bar = utils::progress_bar(range.day_count(), "Retrieving subscription feeds");
    let outcome = engine
        .reconcile(&codes, Strategy::Fast(range), |n, m| {
            bar.set_length(m);
            bar.set_position(n);
        })
        .await?;
    bar.finish_and_clear();

    write_outcome(&outcome, registered, unregistered)?;
    print_summary(&outcome);
    Ok(())
}

async fn registered_slow(
    config: &Config,
    input: &Path,
    registered: &Path,
    unregistered: &Path,
    sleep_ms: Option<u64>,
) -> Result<()> {
    let codes = files::read_fiscal_codes(input)?;
    println!(
        "Read {} fiscal codes from {}",
        codes.len().to_string().cyan(),
        input.display()
    );

    let engine = ReconcileEngine::new(build_client(config)?, retry_policy(config, sleep_ms));

    let bar = utils::progress_bar(codes.len() as u64, "Checking profiles");
    let outcome = engine
        .reconcile(&codes, Strategy::Slow, |n, m| {
            bar.set_length(m);
            bar.set_position(n);
        })
        .await?;
    bar.finish_and_clear();

    write_outcome(&outcome, registered, unregistered)?;
    print_summary(&outcome);
    Ok(())
}

fn build_client(config: &Config) -> Result<IoServiceClient> {
    let token = match &config.io.token {
        Some(token) => token.clone(),
        None => utils::prompt_token()?,
    };
    IoServiceClient::new(&config.io.base_url, &token)
}

fn retry_policy(config: &Config, sleep_ms: Option<u64>) -> RetryPolicy {
    let pacing = sleep_ms.map_or_else(|| config.pacing(), Duration::from_millis);
    RetryPolicy::new(pacing).with_max_rate_limit_retries(config.reconcile.max_rate_limit_retries)
}

fn write_outcome(outcome: &ReconcileOutcome, registered: &Path, unregistered: &Path) -> Result<()> {
    files::write_fiscal_codes(registered, &outcome.registered)?;
    files::write_fiscal_codes(unregistered, &outcome.unregistered)?;
    Ok(())
}

fn print_summary(outcome: &ReconcileOutcome) {
    println!("\n{}", "=== Reconciliation Summary ===".cyan().bold());
    println!("Total codes:   {}", outcome.total());
    println!(
        "Registered:    {}",
        outcome.registered.len().to_string().green()
    );
    println!(
        "Unregistered:  {}",
        outcome.unregistered.len().to_string().yellow()
    );
}
