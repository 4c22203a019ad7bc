//! carrier-sync - Sync carrier contact numbers and blog previews into HTML pages
//!
//! Reads a page, resolves contact numbers and blog posts from the carrier API
//! (falling back to cached data), and writes the updated page out.

use std::fs;
use std::io::{self, Write};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use carrier_sync::cache::CacheManager;
use carrier_sync::cli::{Cli, OutputTarget};
use carrier_sync::fetch::HttpFetcher;
use carrier_sync::page::Document;
use carrier_sync::run_page;

/// Installs a stderr logger; `RUST_LOG` overrides the default filter
fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if verbose {
        "carrier_sync=debug"
    } else {
        "carrier_sync=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = cli.sync_config();
    let cache = CacheManager::new(cli.store()?);
    let source = fs::read_to_string(&cli.page)?;
    let mut doc = Document::parse(&source);

    let report = run_page(config, HttpFetcher::new(), cache, &mut doc).await;
    info!(
        "Contacts {:?} via {:?}; posts {:?} ({} rendered)",
        report.contacts_outcome, report.contacts.source, report.posts_outcome, report.posts_rendered
    );

    let html = doc.to_html();
    match cli.output_target() {
        OutputTarget::Stdout => io::stdout().write_all(html.as_bytes())?,
        OutputTarget::File(path) => {
            fs::write(&path, html)?;
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
