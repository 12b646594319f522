//! `boxdline batch` - several collections merged into one stream

use anyhow::{Result, bail};
use boxdline_core::{SharedProgress, fmt_num};
use boxdline_letterboxd::{BatchSpec, Client, ListId};
use clap::Args;

use super::{drain, print_summary};

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Include this user's watched films (repeatable)
    #[arg(long = "user-watched", value_name = "USER")]
    pub watched: Vec<String>,

    /// Include a list, as USER/SLUG (repeatable)
    #[arg(long = "list", value_name = "USER/SLUG")]
    pub lists: Vec<ListId>,

    /// Include this user's watchlist (repeatable)
    #[arg(long = "watchlist", value_name = "USER")]
    pub watchlists: Vec<String>,
}

impl From<BatchArgs> for BatchSpec {
    fn from(args: BatchArgs) -> Self {
        Self {
            watched: args.watched,
            lists: args.lists,
            watchlists: args.watchlists,
        }
    }
}

pub async fn run(args: BatchArgs, client: &Client, progress: &SharedProgress) -> Result<()> {
    let spec = BatchSpec::from(args);
    if spec.is_empty() {
        bail!("nothing to collect: pass --user-watched, --list, or --watchlist");
    }
    log::info!("Batch of {} sources", spec.len());

    let pb = progress.stream_line("batch");
    let summary = drain(client.stream_batch(&spec), &pb).await;
    pb.finish_and_clear();
    let summary = summary?;

    let mut rows: Vec<(&str, String)> = summary
        .sources
        .iter()
        .map(|s| {
            let mut value = fmt_num(s.records_emitted);
            if !s.failed_pages.is_empty() {
                value.push_str(&format!(" (dropped pages {:?})", s.failed_pages));
            }
            if s.interrupted {
                value.push_str(" (interrupted)");
            }
            (s.label.as_str(), value)
        })
        .collect();
    rows.push(("Total", fmt_num(summary.records_emitted())));
    print_summary("Source", &rows);
    Ok(())
}
