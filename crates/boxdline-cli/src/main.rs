//! boxdline - Letterboxd collections as JSON lines
//!
//! Walks watched films, lists, and watchlists page by page, optionally
//! enriching every film with its IMDb/TMDb ids, and writes the films to
//! stdout as they arrive.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use boxdline_core::{CollectError, SharedProgress};
use boxdline_letterboxd::Client;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

/// Exit code for a run stopped by a fatal engine error
const FATAL_EXIT: i32 = 2;

#[derive(Parser)]
#[command(name = "boxdline")]
#[command(about = "Collect Letterboxd films, lists, and watchlists as JSON lines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./boxdline.toml or ~/.config/boxdline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Site to scrape instead of letterboxd.com
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// User-Agent header for every request
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Whole-request timeout in seconds
    #[arg(long, global = true)]
    request_timeout: Option<u64>,

    /// Concurrent film-page fetches per page of results
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Refuse to walk past this page
    #[arg(long, global = true)]
    page_ceiling: Option<u32>,

    /// Skip film pages; films come without external ids
    #[arg(long, global = true)]
    no_details: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Films a user has watched
    Watched(cmd::collect::WatchedArgs),
    /// Films on a user's list
    List(cmd::collect::ListArgs),
    /// Films on a user's watchlist
    Watchlist(cmd::collect::WatchlistArgs),
    /// Several collections merged into one stream
    Batch(cmd::batch::BatchArgs),
    /// A single film with its external ids
    Film(cmd::lookup::FilmArgs),
    /// Films a person worked on
    Filmography(cmd::lookup::FilmographyArgs),
    /// A user's profile
    Profile(cmd::lookup::ProfileArgs),
    /// Films behind any supported Letterboxd URL
    Url(cmd::lookup::UrlArgs),
    /// Show current configuration
    Config,
}

impl Cli {
    /// Client configuration: config file values, then command-line overrides
    fn client_config(&self, config: &Config) -> boxdline_letterboxd::Config {
        let mut client = config.client_config();
        if let Some(base_url) = &self.base_url {
            client.engine.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(agent) = &self.user_agent {
            client.engine.http.user_agent = agent.clone();
        }
        if let Some(secs) = self.request_timeout {
            client.engine.http.request_timeout = Duration::from_secs(secs);
        }
        if let Some(concurrency) = self.concurrency {
            client.engine.enrich_concurrency = concurrency;
        }
        if let Some(ceiling) = self.page_ceiling {
            client.engine.page_ceiling = ceiling;
        }
        if self.no_details {
            client.enrich = false;
        }
        client
    }
}

/// Page ceiling breaches end the process instead of bubbling up
fn is_fatal(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        cause
            .downcast_ref::<boxdline_letterboxd::Error>()
            .is_some_and(|e| e.is_fatal())
            || cause
                .downcast_ref::<CollectError>()
                .is_some_and(|e| e.is_fatal())
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress: SharedProgress = Arc::new(boxdline_core::ProgressContext::new());

    // Logging:
    //   TTY:     quiet (warn) unless --debug, spinners show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    boxdline_core::init_logging(quiet, cli.debug, multi).context("Failed to set up logging")?;

    boxdline_core::install_signal_handlers().context("Failed to install signal handlers")?;

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    let client_config = cli.client_config(&config);

    if let Command::Config = cli.command {
        print_config(&client_config);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let client = Client::new(client_config)?;

    let result = runtime.block_on(run(cli.command, &client, &progress));
    if let Err(e) = &result {
        if is_fatal(e) {
            log::error!("Fatal: {e:#}");
            std::process::exit(FATAL_EXIT);
        }
    }
    result
}

async fn run(command: Command, client: &Client, progress: &SharedProgress) -> Result<()> {
    match command {
        Command::Watched(args) => cmd::collect::watched(args, client, progress).await,
        Command::List(args) => cmd::collect::list(args, client, progress).await,
        Command::Watchlist(args) => cmd::collect::watchlist(args, client, progress).await,
        Command::Batch(args) => cmd::batch::run(args, client, progress).await,
        Command::Film(args) => cmd::lookup::film(args, client).await,
        Command::Filmography(args) => cmd::lookup::filmography(args, client).await,
        Command::Profile(args) => cmd::lookup::profile(args, client).await,
        Command::Url(args) => cmd::lookup::url(args, client).await,
        Command::Config => Ok(()),
    }
}

fn print_config(client: &boxdline_letterboxd::Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let engine = &client.engine;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Base URL", &engine.base_url]);
    table.add_row(vec![
        "Film details",
        if client.enrich { "fetched" } else { "skipped" },
    ]);
    table.add_row(vec!["User agent", &engine.http.user_agent]);
    table.add_row(vec![
        "Connect timeout",
        &format!("{}s", engine.http.connect_timeout.as_secs()),
    ]);
    table.add_row(vec![
        "Request timeout",
        &format!("{}s", engine.http.request_timeout.as_secs()),
    ]);
    table.add_row(vec![
        "Enrich concurrency",
        &engine.enrich_concurrency.to_string(),
    ]);
    table.add_row(vec!["Page ceiling", &engine.page_ceiling.to_string()]);
    table.add_row(vec![
        "Channel capacity",
        &engine.channel_capacity.to_string(),
    ]);

    eprintln!("\n{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file() {
        let cli = Cli::try_parse_from([
            "boxdline",
            "--base-url",
            "http://localhost:9000/",
            "--concurrency",
            "2",
            "--no-details",
            "watched",
            "dave",
        ])
        .unwrap();
        let client = cli.client_config(&Config::default());
        assert_eq!(client.engine.base_url, "http://localhost:9000");
        assert_eq!(client.engine.enrich_concurrency, 2);
        assert_eq!(client.engine.page_ceiling, 50);
        assert!(!client.enrich);
    }

    #[test]
    fn list_page_range_flags() {
        let cli = Cli::try_parse_from([
            "boxdline",
            "list",
            "dave",
            "top-10",
            "--first-page",
            "2",
            "--last-page",
            "-1",
        ])
        .unwrap();
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.first_page, 2);
                assert_eq!(args.last_page, -1);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn unknown_profession_is_rejected() {
        assert!(Cli::try_parse_from(["boxdline", "filmography", "gaffer", "someone"]).is_err());
    }

    #[test]
    fn ceiling_errors_are_fatal() {
        let err = anyhow::Error::from(boxdline_letterboxd::Error::from(
            CollectError::PageCeilingExceeded {
                page: 51,
                ceiling: 50,
            },
        ));
        assert!(is_fatal(&err));
        assert!(is_fatal(&anyhow::Error::from(
            CollectError::PageCeilingExceeded {
                page: 51,
                ceiling: 50
            }
        )));
        assert!(!is_fatal(&anyhow::anyhow!("network down")));
    }
}
