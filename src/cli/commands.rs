use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "io-registered")]
#[command(about = "Check which fiscal codes are registered with the IO app")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/default")]
    pub config: String,

    /// IO App API token (overrides configuration)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Base URL of the IO App API (overrides configuration)
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify codes by diffing the daily subscriptions feed (one API call per day)
    RegisteredFast {
        /// File with one fiscal code per line
        #[arg(short, long, default_value = "./input.txt")]
        input: PathBuf,

        /// Output file for registered codes
        #[arg(long, default_value = "./registered.txt")]
        registered: PathBuf,

        /// Output file for unregistered codes
        #[arg(long, default_value = "./unregistered.txt")]
        unregistered: PathBuf,

        /// First feed date to retrieve (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last feed date to retrieve (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Milliseconds to sleep between requests (overrides configuration)
        #[arg(long)]
        sleep_ms: Option<u64>,
    },

    /// Classify codes by probing each profile individually (one API call per code)
    RegisteredSlow {
        /// File with one fiscal code per line
        #[arg(short, long, default_value = "./input.txt")]
        input: PathBuf,

        /// Output file for registered codes
        #[arg(long, default_value = "./registered.txt")]
        registered: PathBuf,

        /// Output file for unregistered codes
        #[arg(long, default_value = "./unregistered.txt")]
        unregistered: PathBuf,

        /// Milliseconds to sleep between requests (overrides configuration)
        #[arg(long)]
        sleep_ms: Option<u64>,
    },
}
