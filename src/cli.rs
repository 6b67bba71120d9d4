//! Command-line interface definitions for apodcache.
//!
//! This module defines all CLI arguments, subcommands, and options using
//! the clap derive API. The CLI follows standard conventions with global
//! options (verbosity, cache directory) and subcommands for different
//! operations.
//!
//! # Example
//!
//! ```bash
//! # Cache today's APOD and print its record id and file path
//! apodcache fetch
//!
//! # Cache the APOD for a specific date
//! apodcache fetch 2022-05-19
//!
//! # Show a cached record
//! apodcache info 3
//!
//! # List all cached titles
//! apodcache list
//!
//! # Verbose mode for debugging
//! apodcache -v fetch
//! ```

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The first APOD was published on this date; earlier dates are invalid.
pub const FIRST_APOD: (i32, u32, u32) = (1995, 6, 16);

/// Content-addressed cache for NASA's Astronomy Picture of the Day.
///
/// apodcache downloads the APOD for a date, fingerprints the image bytes
/// (BLAKE3), and stores each distinct image exactly once, together with a
/// persisted metadata index.
#[derive(Debug, Parser)]
#[command(name = "apodcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Cache root directory (overrides the config file and platform default)
    #[arg(long, value_name = "DIR", global = true, env = "APODCACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for apodcache.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download the APOD for a date into the cache and print its record
    /// id and file path
    Fetch(FetchArgs),
    /// Show title, explanation, and file path of a cached record
    Info(InfoArgs),
    /// List the titles of all cached images
    List,
}

/// Arguments for the fetch subcommand.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// APOD date in YYYY-MM-DD format (default: today)
    ///
    /// Must not be earlier than 1995-06-16 (the first APOD) or in the
    /// future.
    #[arg(value_name = "DATE", value_parser = parse_apod_date)]
    pub date: Option<NaiveDate>,

    /// NASA API key (DEMO_KEY is rate-limited but works for casual use)
    #[arg(long, env = "NASA_API_KEY", default_value = "DEMO_KEY")]
    pub api_key: String,
}

/// Arguments for the info subcommand.
#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Record id as printed by a previous fetch
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// The earliest valid APOD date.
#[must_use]
pub fn first_apod_date() -> NaiveDate {
    let (y, m, d) = FIRST_APOD;
    NaiveDate::from_ymd_opt(y, m, d).expect("constant date is valid")
}

/// Today's date in the local timezone, the default for `fetch`.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse and validate an APOD date argument.
///
/// Accepts `YYYY-MM-DD`, rejects dates before the first APOD and dates in
/// the future.
pub fn parse_apod_date(s: &str) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", s, e))?;

    if date < first_apod_date() {
        return Err(format!(
            "APOD date cannot be earlier than {}",
            first_apod_date()
        ));
    }
    if date > today() {
        return Err("APOD date cannot be in the future".to_string());
    }
    Ok(date)
}
