//! `promo-check` CLI: overlap checks, draft validation and voucher eligibility.
//!
//! ## Usage
//!
//! ```sh
//! # Check a candidate against local exports of existing promotions
//! promo-check check --candidate new.json --existing active.json --existing pending.json \
//!     --products products.json
//!
//! # Check against the live backend (token from PROMO_API_TOKEN)
//! promo-check check --candidate new.json --remote --api-url http://localhost:8080/lila_shop
//!
//! # Block instead of allowing submission when the backend is unreachable
//! promo-check check --candidate new.json --remote --fail-closed
//!
//! # Validate a form draft
//! promo-check validate --draft form.json --today 2024-05-20
//!
//! # Can this voucher be used on a 350k order containing product p1?
//! promo-check voucher --voucher welcome.json --total 350000 --product p1
//! ```
//!
//! Exit status: 0 when clear, 2 when the check finds an overlap, an invalid
//! draft or an unusable voucher, 1 on any other error.

mod client;
mod config;
mod files;
mod logging;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use promo_overlap::range::parse_date;
use promo_overlap::{
    check_overlaps, Basket, Campaign, CampaignDraft, CampaignKind, CampaignRecord, FailurePolicy,
    OverlapReport, Voucher, VoucherRecord,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::client::HttpSource;
use crate::config::{ApiConfig, LoggingConfig};

/// Exit status for a negative answer (overlap, invalid draft, unusable voucher).
const EXIT_REJECTED: i32 = 2;

#[derive(Parser)]
#[command(
    name = "promo-check",
    version,
    about = "Promotion and voucher overlap checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    logging: LoggingConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate promotion or voucher against existing ones
    Check {
        /// Candidate record (JSON, same shape as a backend record)
        #[arg(short, long)]
        candidate: PathBuf,
        /// Kind of campaign being checked
        #[arg(long, value_enum, default_value_t = KindArg::Promotion)]
        kind: KindArg,
        /// File of existing records (envelope or bare array); repeatable
        #[arg(short, long, conflicts_with = "remote")]
        existing: Vec<PathBuf>,
        /// File of active products (envelope or bare array)
        #[arg(short, long, conflicts_with = "remote")]
        products: Option<PathBuf>,
        /// Fetch existing records and products from the backend
        #[arg(long)]
        remote: bool,
        #[command(flatten)]
        api: ApiConfig,
        /// Fail instead of allowing submission when existing records cannot be loaded
        #[arg(long)]
        fail_closed: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a campaign form draft
    Validate {
        /// Draft form (JSON)
        #[arg(short, long)]
        draft: PathBuf,
        /// Reference date (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a voucher can be applied to an order
    Voucher {
        /// Voucher record (JSON)
        #[arg(short, long)]
        voucher: PathBuf,
        /// Order subtotal
        #[arg(short, long)]
        total: Decimal,
        /// Product id in the basket; repeatable
        #[arg(long = "product")]
        products: Vec<String>,
        /// Category id in the basket; repeatable
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Reference date (YYYY-MM-DD); defaults to the local date
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum KindArg {
    Promotion,
    Voucher,
}

impl From<KindArg> for CampaignKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Promotion => CampaignKind::Promotion,
            KindArg::Voucher => CampaignKind::Voucher,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.logging)?;

    let accepted = match cli.command {
        Commands::Check {
            candidate,
            kind,
            existing,
            products,
            remote,
            api,
            fail_closed,
            json,
        } => {
            let policy = if fail_closed {
                FailurePolicy::Closed
            } else {
                FailurePolicy::Open
            };
            let candidate = read_candidate(&candidate)?;
            let kind = CampaignKind::from(kind);

            let report = if remote {
                info!(api_url = %api.api_url, "checking against backend");
                check_overlaps(&HttpSource::new(&api), kind, &candidate, policy)
            } else {
                let source = files::load(&existing, products.as_deref())?;
                check_overlaps(&source, kind, &candidate, policy)
            }
            .context("Overlap check failed")?;

            print_report(&report, kind, json)?;
            !report.has_overlap
        }
        Commands::Validate { draft, today, json } => {
            let draft: CampaignDraft = read_json(&draft)?;
            let today = resolve_today(today.as_deref())?;

            match draft.validate(today) {
                Ok(validated) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&validated)?);
                    } else {
                        let c = &validated.campaign;
                        println!(
                            "Draft OK: {} ({}) {} from {} to {}",
                            c.name,
                            c.code,
                            c.scope(),
                            c.period.start,
                            c.period.end
                        );
                    }
                    true
                }
                Err(errors) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&errors)?);
                    } else {
                        println!("{errors}");
                    }
                    false
                }
            }
        }
        Commands::Voucher {
            voucher,
            total,
            products,
            categories,
            today,
        } => {
            let record: VoucherRecord = read_json(&voucher)?;
            let voucher = Voucher::from(record);
            let today = resolve_today(today.as_deref())?;
            let basket = Basket::new(products, categories);

            match voucher.validate(total, &basket, today) {
                Ok(()) => {
                    println!(
                        "Voucher \"{}\" applies. Discount: {}",
                        voucher.code,
                        voucher.discount(total)
                    );
                    true
                }
                Err(rejection) => {
                    println!("{rejection}");
                    false
                }
            }
        }
    };

    if !accepted {
        process::exit(EXIT_REJECTED);
    }
    Ok(())
}

fn print_report(report: &OverlapReport, kind: CampaignKind, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if !report.checked {
        println!(
            "Overlap check skipped: existing {}s could not be loaded. Submission allowed.",
            kind.noun()
        );
    } else if report.has_overlap {
        println!("{}", report.message);
    } else {
        println!("No overlapping {}s found.", kind.noun());
    }
    if report.skipped > 0 {
        println!(
            "Note: {} existing record(s) skipped due to incomplete data.",
            report.skipped
        );
    }
    Ok(())
}

fn read_candidate(path: &Path) -> Result<Campaign> {
    let record: CampaignRecord = read_json(path)?;
    Campaign::try_from(record)
        .with_context(|| format!("Invalid candidate in {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&body).with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

fn resolve_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => parse_date(s).with_context(|| format!("Invalid --today value: {s}")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
