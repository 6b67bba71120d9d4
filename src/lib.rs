//! apodcache - Content-Addressed APOD Image Cache
//!
//! Fetches NASA's Astronomy Picture of the Day and caches each distinct
//! image exactly once, keyed by a BLAKE3 fingerprint of its bytes, with a
//! persisted SQLite metadata index.

pub mod apod;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod hasher;
pub mod logging;
pub mod namer;

use anyhow::Result;

use crate::apod::NasaApodClient;
use crate::cache::CacheStore;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::{CacheError, ExitCode};

/// Run the application with parsed CLI arguments.
///
/// Initializes logging and the cache store, dispatches the subcommand,
/// and returns the exit code the process should terminate with.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load();
    let cache_root = config.resolve_cache_root(cli.cache_dir)?;
    log::debug!("image cache directory: {}", cache_root.display());

    let store = CacheStore::init(&cache_root)?;

    match cli.command {
        Commands::Fetch(args) => {
            let date = args.date.unwrap_or_else(cli::today);
            let client = NasaApodClient::new(args.api_key)?;
            let id = store.ensure_cached(date, &client)?;
            let record = store.record(id)?;
            println!("{}", fetch_summary(&record));
            Ok(ExitCode::Success)
        }
        Commands::Info(args) => match store.record(args.id) {
            Ok(record) => {
                println!("{}", record.title);
                println!();
                println!("{}", record.explanation);
                println!();
                println!("{}", record.file_path.display());
                Ok(ExitCode::Success)
            }
            Err(CacheError::NotFound(id)) => {
                log::error!("no cache record with id {}", id);
                Ok(ExitCode::NotFound)
            }
            Err(err) => Err(err.into()),
        },
        Commands::List => {
            for title in store.titles()? {
                println!("{}", title);
            }
            Ok(ExitCode::Success)
        }
    }
}

/// The line `fetch` prints for a cached record: the record id (usable
/// with `info <ID>`) and the image's file path, tab separated.
fn fetch_summary(record: &cache::CacheRecord) -> String {
    format!("{}\t{}", record.id, record.file_path.display())
}
