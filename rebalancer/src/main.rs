//! CLI entry point for the topup rebalancer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use topup::HoldingDraft;
use topup_rebalancer::config::Config;
use topup_rebalancer::error::Error;
use topup_rebalancer::workflow::{self, PlanOptions};

#[derive(Parser)]
#[command(name = "rebalancer")]
#[command(about = "Monthly top-up planner: how many units of each holding to buy")]
#[command(version)]
struct Cli {
    /// Path to rebalancer.toml (defaults apply if the file is absent)
    #[arg(long, default_value = "rebalancer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a starter worksheet with the preset holdings
    Init {
        /// Worksheet file (default: portfolio-<today>.json)
        file: Option<PathBuf>,

        /// Overwrite an existing file without asking
        #[arg(long)]
        force: bool,
    },

    /// Append a holding to a worksheet
    Add {
        file: PathBuf,

        #[arg(long)]
        name: String,

        /// Unit price, e.g. 35,000
        #[arg(long)]
        price: String,

        /// Units already held
        #[arg(long, default_value = "")]
        qty: String,

        /// Target ratio in percent
        #[arg(long)]
        ratio: String,
    },

    /// Remove a holding by name
    Remove { file: PathBuf, name: String },

    /// Validate a worksheet and report the ratio sum
    Check { file: PathBuf },

    /// Compute the purchase plan
    Plan {
        file: PathBuf,

        /// Budget for this month (overrides the worksheet's)
        #[arg(long)]
        budget: Option<String>,

        /// Compute through a topup-server at this URL
        #[arg(long)]
        remote: Option<String>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a portable file into a worksheet
    Import { src: PathBuf, dest: PathBuf },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init { file, force } => {
            let file = file.unwrap_or_else(|| PathBuf::from(workflow::default_worksheet_path()));
            workflow::run_init(&config, &file, force)
        }
        Command::Add {
            file,
            name,
            price,
            qty,
            ratio,
        } => workflow::run_add(&config, &file, HoldingDraft::new(name, price, qty, ratio)),
        Command::Remove { file, name } => workflow::run_remove(&config, &file, &name),
        Command::Check { file } => workflow::run_check(&config, &file).map(|_| ()),
        Command::Plan {
            file,
            budget,
            remote,
            json,
        } => {
            let opts = PlanOptions {
                budget,
                remote,
                json,
            };
            workflow::run_plan(&config, &file, &opts).map(|_| ())
        }
        Command::Import { src, dest } => workflow::run_import(&config, &src, &dest).map(|_| ()),
    };

    if let Err(e) = result {
        match &e {
            Error::Validation(_) => {
                eprintln!("Invalid worksheet: {e}");
                process::exit(2);
            }
            Error::Aborted(msg) => {
                eprintln!("Aborted: {msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
