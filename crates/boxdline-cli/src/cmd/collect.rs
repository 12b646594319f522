//! `boxdline watched|list|watchlist` - paginated film collections

use anyhow::Result;
use boxdline_core::{Collection, SharedProgress, StreamHandle, StreamSummary, fmt_num};
use boxdline_letterboxd::{Client, Film, ListId, ListOpts};
use clap::Args;

use super::{drain, print_films, print_summary};

#[derive(Args, Debug)]
pub struct WatchedArgs {
    /// Letterboxd username
    pub user: String,

    /// Emit films as pages arrive instead of in page order
    #[arg(long)]
    pub stream: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Owner of the list
    pub user: String,

    /// List slug, as in /USER/list/SLUG/
    pub slug: String,

    #[arg(long, default_value_t = 1)]
    pub first_page: i64,

    /// Last page to fetch, -1 for all
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub last_page: i64,

    /// Emit films as pages arrive; ignores the page range
    #[arg(long)]
    pub stream: bool,
}

#[derive(Args, Debug)]
pub struct WatchlistArgs {
    /// Letterboxd username
    pub user: String,

    #[arg(long)]
    pub stream: bool,
}

pub async fn watched(args: WatchedArgs, client: &Client, progress: &SharedProgress) -> Result<()> {
    let label = format!("watched:{}", args.user);
    if args.stream {
        return stream(client.stream_watched(&args.user), &label, progress).await;
    }
    let collection = client.watched(&args.user).await?;
    finish(&label, collection)
}

pub async fn list(args: ListArgs, client: &Client, progress: &SharedProgress) -> Result<()> {
    let list = ListId::new(args.user, args.slug);
    let label = format!("list:{list}");
    if args.stream {
        return stream(client.stream_list(&list), &label, progress).await;
    }
    let opts = ListOpts {
        list,
        first_page: args.first_page,
        last_page: args.last_page,
    };
    let collection = client.list(&opts).await?;
    finish(&label, collection)
}

pub async fn watchlist(
    args: WatchlistArgs,
    client: &Client,
    progress: &SharedProgress,
) -> Result<()> {
    let label = format!("watchlist:{}", args.user);
    if args.stream {
        return stream(client.stream_watchlist(&args.user), &label, progress).await;
    }
    let collection = client.watchlist(&args.user).await?;
    finish(&label, collection)
}

fn finish(label: &str, collection: Collection<Film>) -> Result<()> {
    print_films(&collection.records)?;
    let enriched = collection
        .records
        .iter()
        .filter(|f| f.external_ids.is_some())
        .count();
    print_summary(
        label,
        &[
            ("Films", fmt_num(collection.records.len())),
            ("With external ids", fmt_num(enriched)),
            (
                "Pages",
                format!(
                    "{} of {}",
                    collection.pagination.current_page, collection.pagination.total_pages
                ),
            ),
        ],
    );
    Ok(())
}

async fn stream(
    handle: StreamHandle<Film, StreamSummary>,
    label: &str,
    progress: &SharedProgress,
) -> Result<()> {
    let pb = progress.stream_line(label);
    let summary = drain(handle, &pb).await;
    pb.finish_and_clear();
    let summary = summary?;

    let failed = if summary.failed_pages.is_empty() {
        "none".to_string()
    } else {
        format!("{:?}", summary.failed_pages)
    };
    print_summary(
        label,
        &[
            ("Films", fmt_num(summary.records_emitted)),
            ("Pages", summary.pagination.total_pages.to_string()),
            ("Dropped pages", failed),
            (
                "Interrupted",
                if summary.interrupted { "yes" } else { "no" }.to_string(),
            ),
        ],
    );
    Ok(())
}
