//! prop-coach: PropReports trade exports, cleaning and AI coaching
//! from one CLI.
//!
//! Three batch commands share one exports tree:
//! 1. `export` pulls a period's trades from the reporting portal and
//!    writes a JSON export document
//! 2. `clean` re-validates persisted documents and strips the subtotal
//!    rows older exports let through
//! 3. `coach` turns a period's statistics into an LLM coaching review

mod cleaner;
mod coach;
mod config;
mod exporter;
mod store;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::coach::{CoachArgs, CoachKind};
use crate::config::AppConfig;
use crate::exporter::ExportKind;
use crate::store::ExportStore;

#[derive(Parser)]
#[command(
    name = "prop-coach",
    version,
    about = "PropReports export, cleaning and coaching toolkit"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one period's trades from the portal and write its export
    /// document.
    Export {
        #[arg(value_enum)]
        kind: ExportKind,

        /// Anchor date (YYYY-MM-DD) inside the period; defaults to
        /// today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Re-validate persisted exports and strip subtotal rows.
    Clean,

    /// Generate a coaching review for a period's export.
    Coach {
        #[arg(value_enum)]
        kind: CoachKind,

        /// Year of the period; defaults to the current one.
        #[arg(long)]
        year: Option<i32>,

        /// Month (1-12), monthly reviews only.
        #[arg(long)]
        month: Option<u32>,

        /// ISO week (1-53), weekly reviews only.
        #[arg(long)]
        week: Option<u32>,

        /// Review the previous period while the current one is young.
        #[arg(long)]
        auto: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "prop_coach=info,export_engine=info,propreports_client=info,coach_client=info"
                    .into()
            }),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = AppConfig::load(&cli.config)?;
    let store = ExportStore::new(&cfg.export.root);

    match cli.command {
        Command::Export { kind, date } => {
            let period = exporter::resolve_period(kind, date);
            exporter::run_export(&cfg, &store, period).await?;
        }
        Command::Clean => {
            cleaner::run_clean(&store)?;
        }
        Command::Coach {
            kind,
            year,
            month,
            week,
            auto,
        } => {
            let args = CoachArgs {
                kind,
                year,
                month,
                week,
                auto,
            };
            coach::run_coach(&cfg, &store, args).await?;
        }
    }

    Ok(())
}
