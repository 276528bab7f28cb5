//! Edubox import CLI
//!
//! Sends an attendance roster to the Edubox academic portal from the command
//! line, using the URL encoded in the portal's "Importar" QR code.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use edubox_import::{
    error::{AppError, Delivery, Result},
    models::{Config, Roster, SubmissionResult},
    services::{Importer, SubmissionAbort, TokenParser},
};

/// edubox-import - Attendance roster importer
#[derive(Parser, Debug)]
#[command(
    name = "edubox-import",
    version,
    about = "Send attendance rosters to the Edubox academic portal"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration file
    Validate,

    /// Check a scanned QR code without sending anything
    Parse {
        /// Text decoded from the QR code
        scan: String,
    },

    /// Print the upload body for a roster
    Encode {
        #[command(flatten)]
        roster: RosterArgs,
    },

    /// Write the upload body to a CSV file named after the roster
    Export {
        #[command(flatten)]
        roster: RosterArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Upload and confirm a roster on the portal
    Submit {
        #[command(flatten)]
        roster: RosterArgs,

        /// Text decoded from the portal's QR code
        #[arg(long)]
        scan: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where the roster comes from: a JSON export or inline identifiers.
#[derive(Args, Debug)]
struct RosterArgs {
    /// Roster JSON file ({"date", "shift", "ubsName", "ras"})
    #[arg(short, long, conflicts_with = "ra")]
    roster: Option<PathBuf>,

    /// Student identifier (repeatable)
    #[arg(long)]
    ra: Vec<String>,

    /// Session date (YYYY-MM-DD) for inline identifiers; defaults to today
    #[arg(long, requires = "ra")]
    date: Option<NaiveDate>,
}

impl RosterArgs {
    fn load(&self) -> Result<Roster> {
        match &self.roster {
            Some(path) => {
                let roster = Roster::load(path)?;
                log::info!(
                    "Loaded roster for {} with {} identifier(s) from {}",
                    roster.date,
                    roster.ras.len(),
                    path.display()
                );
                Ok(roster)
            }
            None if !self.ra.is_empty() => {
                let date = self.date.unwrap_or_else(|| Local::now().date_naive());
                Ok(Roster::new(date, self.ra.clone()))
            }
            None => Err(AppError::validation(
                "Provide a roster with --roster <FILE> or --ra <ID>",
            )),
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("Portal domain: {}", config.portal.domain);
            log::info!(
                "Required parameters: {}, {}",
                config.portal.key_param,
                config.portal.transaction_param
            );
            log::info!("Timeout: {}s", config.client.timeout_secs);
        }

        Command::Parse { scan } => {
            let token = TokenParser::new(config.portal.clone())
                .parse(&scan)
                .map_err(AppError::from)?;
            log::info!("✓ QR code OK");
            println!("{token}");
        }

        Command::Encode { roster } => {
            let body = roster.load()?.encode();
            log::info!(
                "{} record(s), {} bytes, sha256 {}",
                body.record_count(),
                body.len(),
                body.digest()
            );
            print!("{body}");
        }

        Command::Export { roster, out } => {
            let roster = roster.load()?;
            let body = roster.encode();

            tokio::fs::create_dir_all(&out).await?;
            let path = out.join(roster.export_file_name());
            tokio::fs::write(&path, body.as_str()).await?;

            log::info!(
                "Exported {} record(s) to {} (sha256 {})",
                body.record_count(),
                path.display(),
                body.digest()
            );
        }

        Command::Submit { roster, scan, json } => {
            config.validate()?;
            let roster = roster.load()?;
            let importer = Importer::new(&config)?;

            let (handle, abort) = SubmissionAbort::new();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::warn!("Interrupted, aborting submission...");
                    handle.abort();
                }
            });

            let result = importer.import_abortable(&scan, &roster, abort).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }

            match result {
                SubmissionResult::Success { .. } => log::info!("✓ Roster confirmed by the portal"),
                SubmissionResult::Failure {
                    delivery, error, ..
                } => {
                    log::error!("Roster {}", delivery);
                    if delivery == Delivery::UploadedUnconfirmed {
                        log::error!("Check the portal before sending this roster again.");
                    }
                    return Err(error.into());
                }
            }
        }
    }

    Ok(())
}
