use chrono::Utc;
use clap::{Parser, Subcommand};
use pindrop_core::extractor::{PLAIN_TEXT, URI_LIST};
use pindrop_core::{
    ClientConfig, DragEvent, DragTracker, DropPayload, DropZone, GridItem, GridView,
    IngestCoordinator, QueryRouter, RestBackend, SortOrder,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pindrop", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Archive server base URL
    #[arg(long, env = "PINDROP_URL", default_value = pindrop_core::config::DEFAULT_BASE_URL)]
    url: String,

    /// Seconds a browse result stays fresh
    #[arg(long, env = "PINDROP_BROWSE_STALE_SECS", default_value = "30")]
    browse_stale_secs: u64,

    /// Seconds a search result stays fresh
    #[arg(long, env = "PINDROP_SEARCH_STALE_SECS", default_value = "15")]
    search_stale_secs: u64,

    /// Seconds the tag and collection lists stay fresh
    #[arg(long, env = "PINDROP_CATALOG_STALE_SECS", default_value = "60")]
    catalog_stale_secs: u64,

    /// Artifacts per page when browsing
    #[arg(long, env = "PINDROP_PAGE_SIZE", default_value = "50")]
    page_size: u32,
}

#[derive(Subcommand)]
enum Command {
    /// List artifacts, optionally narrowed to one tag or one collection.
    Browse {
        #[arg(long, conflicts_with = "collection")]
        tag: Option<String>,
        #[arg(long)]
        collection: Option<String>,
        /// captured_at_desc, captured_at_asc, title_asc or importance_desc
        #[arg(long, default_value = "captured_at_desc")]
        sort: SortOrder,
    },
    /// Full-text search over captured artifacts.
    Search {
        #[arg(long)]
        query: String,
    },
    /// List tags.
    Tags,
    /// List collections.
    Collections,
    /// Capture one or more URLs concurrently.
    Ingest {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Replay a drag gesture carrying the given payload and capture its URL.
    Drop {
        /// Raw text/uri-list payload
        #[arg(long)]
        uri_list: Option<String>,
        /// Raw text/plain payload
        #[arg(long)]
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = client_config(&cli);

    let backend = Arc::new(RestBackend::new(&config.base_url)?);
    let router = QueryRouter::new(backend.clone(), Default::default(), &config);
    let coordinator = IngestCoordinator::new(backend, router.invalidator());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        server = %config.base_url,
        started_at = %Utc::now().to_rfc3339(),
        "pindrop boot"
    );

    match cli.command {
        Command::Browse {
            tag,
            collection,
            sort,
        } => {
            let filters = router.filters();
            filters.set_sort(sort);
            if let Some(tag) = tag {
                filters.set_selected_tag_id(Some(tag));
            } else if let Some(collection) = collection {
                filters.set_selected_collection_id(Some(collection));
            }
            print_grid(&router, &coordinator).await;
        }
        Command::Search { query } => {
            router.filters().set_search_query(query);
            print_grid(&router, &coordinator).await;
        }
        Command::Tags => {
            for tag in router.tags().await?.iter() {
                let count = tag.artifact_count.unwrap_or(0);
                println!("{}\t{}\t{} artifact(s)", tag.id, tag.name, count);
            }
        }
        Command::Collections => {
            for collection in router.collections().await?.iter() {
                println!(
                    "{}\t{}\t{}",
                    collection.id,
                    collection.name,
                    collection.description.as_deref().unwrap_or("")
                );
            }
        }
        Command::Ingest { urls } => {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| coordinator.on_url_dropped(url.as_str()))
                .collect();
            println!("{} capture(s) in flight", coordinator.pending().len());

            let mut failed = 0usize;
            for (url, handle) in urls.iter().zip(handles) {
                match handle.outcome().await {
                    Ok(artifact) => println!("saved {url} as {} ({})", artifact.id, artifact.title),
                    Err(error) => {
                        failed += 1;
                        println!("failed {url}: {error}");
                    }
                }
            }

            print_grid(&router, &coordinator).await;
            if failed > 0 {
                anyhow::bail!("{failed} of {} capture(s) failed", urls.len());
            }
        }
        Command::Drop { uri_list, text } => {
            let mut payload = DropPayload::new();
            if let Some(uri_list) = uri_list {
                payload = payload.with(URI_LIST, uri_list);
            }
            if let Some(text) = text {
                payload = payload.with(PLAIN_TEXT, text);
            }

            let (events, rx) = mpsc::channel(8);
            let zone = DropZone::attach(rx, DragTracker::new(), coordinator.clone());
            for event in [DragEvent::Enter, DragEvent::Over, DragEvent::Drop(payload)] {
                events.send(event).await?;
            }
            drop(events);
            zone.join().await;

            let last_error = coordinator.last_error().borrow().clone();
            if let Some(error) = last_error {
                warn!(%error, "capture failed");
                anyhow::bail!("capture failed: {error}");
            }
            print_grid(&router, &coordinator).await;
        }
    }

    Ok(())
}

fn client_config(cli: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: cli.url.clone(),
        browse_stale_after: Duration::from_secs(cli.browse_stale_secs),
        search_stale_after: Duration::from_secs(cli.search_stale_secs),
        catalog_stale_after: Duration::from_secs(cli.catalog_stale_secs),
        page_size: cli.page_size,
    }
}

async fn print_grid(
    router: &QueryRouter<RestBackend>,
    coordinator: &IngestCoordinator<RestBackend>,
) {
    let pending = coordinator.pending().snapshot();
    let fetched = router.fetch().await;
    let view = GridView::build(
        &pending,
        Some(fetched.as_ref().map(|items| items.as_slice())),
    );

    match view {
        GridView::Loading => println!("Loading..."),
        GridView::Failed(error) => {
            println!("Failed to load: {error}. Is the archive server running?")
        }
        GridView::Empty => {
            println!("Nothing here yet.");
            println!("Drop a URL to save it.");
        }
        GridView::Items(items) => {
            for item in items {
                match item {
                    GridItem::Placeholder { id } => println!("[capturing] {id}"),
                    GridItem::Artifact { data } => println!(
                        "{}  {}  [{}]  {}",
                        data.captured_at.format("%Y-%m-%d"),
                        data.title,
                        data.plugin_type,
                        data.source_url.as_deref().unwrap_or("")
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{client_config, Cli};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn every_config_field_has_a_flag() -> Result<(), clap::Error> {
        let cli = Cli::try_parse_from([
            "pindrop",
            "--url",
            "http://archive.local:9000",
            "--browse-stale-secs",
            "7",
            "--search-stale-secs",
            "3",
            "--catalog-stale-secs",
            "120",
            "--page-size",
            "20",
            "tags",
        ])?;

        let config = client_config(&cli);
        assert_eq!(config.base_url, "http://archive.local:9000");
        assert_eq!(config.browse_stale_after, Duration::from_secs(7));
        assert_eq!(config.search_stale_after, Duration::from_secs(3));
        assert_eq!(config.catalog_stale_after, Duration::from_secs(120));
        assert_eq!(config.page_size, 20);
        Ok(())
    }
}
