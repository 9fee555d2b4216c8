//! Crawler module for page fetching and harvesting
//!
//! This module contains the harvesting logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML parsing, link extraction and content cleaning
//! - Explore and download orchestration

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{HarvestReport, Harvester};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{ExtractError, Markup};

use crate::config::Config;
use crate::storage::{DocumentSink, DocumentStore, NullStore};
use crate::url::parse_url;
use crate::HarvestError;
use std::sync::Arc;

/// Lists the in-scope links of a page without storing anything
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `root_url` - Page to explore
///
/// # Returns
///
/// * `Ok(HarvestReport)` - Accepted links in discovery order
/// * `Err(HarvestError)` - Invalid URL or the root could not be fetched
pub async fn explore(config: &Config, root_url: &str) -> Result<HarvestReport, HarvestError> {
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
    let mut harvester = Harvester::from_config(config, root_url, fetcher, Arc::new(NullStore))?;
    harvester.explore().await
}

/// Harvests a page and its in-scope links into the configured document
///
/// The document is saved in the background every
/// `output.flush-interval-secs` and once more when the harvest succeeds.
/// A failed harvest skips the final save, so an earlier document at the
/// same path survives unless a background save already replaced it.
///
/// # Returns
///
/// * `Ok(HarvestReport)` - Harvest finished and the document was saved
/// * `Err(HarvestError)` - The harvest failed, or the final save failed
pub async fn download(config: &Config, root_url: &str) -> Result<HarvestReport, HarvestError> {
    let root = parse_url(root_url)?;
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);

    let store = Arc::new(DocumentStore::create(
        &config.output.document_path,
        root.as_str(),
    )?);
    let sink: Arc<dyn DocumentSink> = store.clone();

    let mut harvester = Harvester::from_config(config, root.as_str(), fetcher, sink)?;

    store.start_auto_flush(config.output.flush_interval());
    let report = match harvester.download().await {
        Ok(report) => report,
        Err(e) => {
            // nothing worth saving; keep whatever the path already holds
            store.abort().await;
            return Err(e);
        }
    };
    store.close().await?;

    tracing::info!(
        "Saved {} pages to {}",
        report.harvested.len(),
        store.path().display()
    );
    Ok(report)
}
