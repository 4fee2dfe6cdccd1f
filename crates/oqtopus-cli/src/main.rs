//! OQTOPUS Command-Line Interface
//!
//! Submit OpenQASM 3 programs to OQTOPUS Cloud, wait for them and inspect
//! past jobs.
//!
//! ```text
//! oqtopus sample bell.qasm --device Kawasaki --shots 1000 --wait
//! oqtopus estimate ansatz.qasm --device Kawasaki --shots 1000 \
//!     --term "Z0 Z1=1.0" --term "X0 X1=0.5" --wait
//! oqtopus result 7af020f6-2e7f-4f05-b3f8-7f59be0a5e31
//! oqtopus jobs
//! oqtopus devices
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{Connection, JobArgs};
use commands::{devices, estimate, jobs, result, sample};

/// OQTOPUS - sampling and estimation on OQTOPUS Cloud
#[derive(Parser)]
#[command(name = "oqtopus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Section of the credentials file to use
    #[arg(long, global = true, env = "OQTOPUS_PROFILE")]
    profile: Option<String>,

    /// Credentials file (defaults to ~/.oqtopus)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a sampling job
    Sample {
        /// OpenQASM 3 program
        input: PathBuf,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Submit an expectation value estimation job
    Estimate {
        /// OpenQASM 3 program preparing the state
        input: PathBuf,

        /// Pauli term as "<label>=<coefficient>", e.g. "X0 X1=0.5" or "Z0=1-0.5i"
        #[arg(short = 'T', long = "term", required = true)]
        terms: Vec<String>,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Wait for a job and print its result
    Result {
        /// Job ID
        job_id: String,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List jobs
    Jobs,

    /// List devices, or show one in detail
    Devices {
        /// Device ID
        device_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let connection = Connection {
        profile: cli.profile,
        config: cli.config,
    };

    // Execute command
    let result = match cli.command {
        Commands::Sample { input, job } => sample::execute(&connection, &input, &job).await,
        Commands::Estimate { input, terms, job } => {
            estimate::execute(&connection, &input, &terms, &job).await
        }
        Commands::Result { job_id, timeout } => {
            result::execute(&connection, &job_id, timeout).await
        }
        Commands::Jobs => jobs::execute(&connection).await,
        Commands::Devices { device_id } => {
            devices::execute(&connection, device_id.as_deref()).await
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
