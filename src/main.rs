//! Docdex main entry point
//!
//! Command-line interface for indexing and querying a local HTML
//! documentation archive.

use anyhow::Context;
use clap::{Parser, Subcommand};
use docdex::config::{load_config, validate, Config};
use docdex::index::build_index;
use docdex::ops;
use docdex::storage::IndexStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Docdex: index and search a local HTML documentation archive
///
/// Points at a directory of HTML documentation pages, builds a persistent
/// search index next to it, and answers search, listing, page, and link
/// queries against the indexed archive.
#[derive(Parser, Debug)]
#[command(name = "docdex")]
#[command(version)]
#[command(about = "Index and search a local HTML documentation archive", long_about = None)]
struct Cli {
    /// Archive root directory, or a TOML configuration file
    #[arg(value_name = "ARCHIVE_OR_CONFIG")]
    target: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the page index (no-op when already populated)
    Index {
        /// Drop all page records and rebuild from the tree on disk
        #[arg(long)]
        force: bool,
    },

    /// Search page titles and content
    Search {
        query: String,

        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Show one page's extracted content
    Get {
        path: String,

        /// Include raw HTML alongside the extracted text
        #[arg(long)]
        raw: bool,
    },

    /// List indexed pages ordered by path
    List {
        /// Glob pattern matched against page paths (e.g. 'ug/*.html')
        #[arg(long)]
        filter: Option<String>,

        /// Maximum number of pages
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Show a page's outbound links
    Links {
        path: String,

        /// Include external links too
        #[arg(long)]
        all: bool,
    },

    /// Show archive statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_target_config(&cli.target)?;
    let root = config.archive.root.clone();
    let db_path = config.database_path();

    tracing::info!("Opening archive index at {}", db_path.display());
    let mut store = IndexStore::open(&db_path)?;

    // Every operation serves reads against a populated store; building is
    // idempotent, so this is a no-op on all but the first run.
    let force = matches!(cli.command, Command::Index { force: true });
    build_index(&root, &mut store, force).context("failed to build search index")?;

    let output = match cli.command {
        Command::Index { .. } => format!("Index ready: {} pages", store.page_count()?),
        Command::Search { ref query, limit } => ops::search_archive(&store, query, limit),
        Command::Get { ref path, raw } => ops::get_page(&root, &store, path, raw),
        Command::List { ref filter, limit } => ops::list_pages(&store, filter.as_deref(), limit),
        Command::Links { ref path, all } => ops::extract_links(&root, &store, path, !all),
        Command::Stats => ops::get_archive_stats(&root, &store),
    };

    println!("{}", output);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docdex=info,warn"),
            1 => EnvFilter::new("docdex=debug,info"),
            2 => EnvFilter::new("docdex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Interprets the positional target as either a config file or a bare
/// archive root
fn load_target_config(target: &Path) -> anyhow::Result<Config> {
    if target.is_file() {
        tracing::info!("Loading configuration from {}", target.display());
        Ok(load_config(target)?)
    } else {
        let config = Config::for_root(target);
        validate(&config)?;
        Ok(config)
    }
}
