//! Harvest coordinator - fetch, classify and store orchestration
//!
//! The harvester fetches the root page, keeps the links that sit beside or
//! above it in the site hierarchy and, in download mode, fetches each of
//! those once. Work is strictly sequential: one request in flight at a time
//! and no recursion past the root's direct links.

use crate::config::Config;
use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::parser::Markup;
use crate::state::{NodeId, SiteGraph};
use crate::storage::DocumentSink;
use crate::url::{canonicalize, ScopeClassifier};
use crate::HarvestError;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Outcome of an explore or download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Root URL as fetched
    pub root_url: String,
    /// Title of the root page (empty if it had none)
    pub root_title: String,
    /// Number of followable links found on the root page
    pub links_found: usize,
    /// Canonical in-scope links, in discovery order, without duplicates
    pub accepted: Vec<String>,
    /// Canonical URLs stored in the document (root first)
    pub harvested: Vec<String>,
    /// Links that were skipped after a fetch or extraction failure
    pub failed: Vec<(String, String)>,
}

/// Single-root documentation harvester
pub struct Harvester {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn DocumentSink>,
    classifier: ScopeClassifier,
    graph: SiteGraph,
    download_all: bool,
}

impl Harvester {
    /// Creates a harvester for `root_url`
    ///
    /// # Arguments
    ///
    /// * `root_url` - Absolute URL of the page to start from
    /// * `max_depth` - Link-acceptance depth ceiling; zero or negative means unlimited
    /// * `topic_keywords` - Keywords that put a link in scope when shared with the parent path
    /// * `fetcher` - Page source
    /// * `store` - Destination for harvested records
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to explore or download
    /// * `Err(HarvestError)` - The root URL is invalid
    pub fn new(
        root_url: &str,
        max_depth: i32,
        topic_keywords: Vec<String>,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn DocumentSink>,
    ) -> Result<Self, HarvestError> {
        let graph = SiteGraph::new(root_url, max_depth)?;
        let classifier = ScopeClassifier::new(graph.root().url.clone(), topic_keywords);

        Ok(Self {
            fetcher,
            store,
            classifier,
            graph,
            download_all: true,
        })
    }

    /// Creates a harvester using the `[harvest]` settings of `config`
    pub fn from_config(
        config: &Config,
        root_url: &str,
        fetcher: Arc<dyn PageFetcher>,
        store: Arc<dyn DocumentSink>,
    ) -> Result<Self, HarvestError> {
        let harvester = Self::new(
            root_url,
            config.harvest.max_depth,
            config.harvest.topic_keywords.clone(),
            fetcher,
            store,
        )?;
        Ok(harvester.with_download_all(config.harvest.download_all))
    }

    /// Sets whether accepted links are fetched and stored in download mode
    pub fn with_download_all(mut self, download_all: bool) -> Self {
        self.download_all = download_all;
        self
    }

    pub fn graph(&self) -> &SiteGraph {
        &self.graph
    }

    pub fn classifier(&self) -> &ScopeClassifier {
        &self.classifier
    }

    /// Fetches the root page once and reports its in-scope links
    ///
    /// Nothing is stored and no link is fetched.
    pub async fn explore(&mut self) -> Result<HarvestReport, HarvestError> {
        let root = self.graph.root_id();
        let root_url = self.graph.root().url.to_string();
        tracing::info!("Exploring {}", root_url);

        let page = self.fetcher.fetch(&root_url).await?;
        let links = {
            let markup = Markup::parse(&page.body);
            self.absorb(root, &page, &markup)
        };

        let mut report = self.new_report(root_url, links.len());
        report.accepted = self.select_links(&links);

        tracing::info!(
            "Found {} links, {} in scope",
            report.links_found,
            report.accepted.len()
        );
        Ok(report)
    }

    /// Harvests the root page and, when enabled, every in-scope link on it
    ///
    /// # Failure policy
    ///
    /// - Root fetch or content extraction failure aborts the run
    /// - A failing link is logged, recorded in the report and skipped
    /// - Store failures always abort
    pub async fn download(&mut self) -> Result<HarvestReport, HarvestError> {
        let root = self.graph.root_id();
        let root_url = self.graph.root().url.to_string();
        tracing::info!("Harvesting {}", root_url);

        let page = self.fetcher.fetch(&root_url).await?;
        let (links, content) = {
            let markup = Markup::parse(&page.body);
            let links = self.absorb(root, &page, &markup);
            (links, markup.clean_content())
        };
        let root_content = content?;

        self.store.upsert(&self.graph, root, &root_content)?;

        let mut report = self.new_report(root_url, links.len());
        report.accepted = self.select_links(&links);
        report.harvested.push(self.graph.root().canonical_url());

        if !self.download_all {
            tracing::info!(
                "download-all disabled, not fetching {} accepted links",
                report.accepted.len()
            );
        } else {
            for link in &report.accepted {
                let Some(id) = self.attach(link, root) else {
                    continue;
                };

                match self.fetch_content(id).await {
                    Ok(content) => {
                        self.store.upsert(&self.graph, id, &content)?;
                        report.harvested.push(link.clone());
                        tracing::info!("Stored {}", link);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", link, e);
                        report.failed.push((link.clone(), e.to_string()));
                    }
                }
            }
        }

        // the root record lists this run's children but keeps its fetch time
        self.store.update_links(&self.graph, root)?;

        tracing::debug!("Site tree:\n{}", self.graph.render_tree());
        tracing::info!(
            "Harvest complete: {} stored, {} failed",
            report.harvested.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn new_report(&self, root_url: String, links_found: usize) -> HarvestReport {
        HarvestReport {
            root_url,
            root_title: self.graph.root().title.clone(),
            links_found,
            ..HarvestReport::default()
        }
    }

    /// Classifies links and returns the accepted ones in canonical form
    ///
    /// A link whose canonical form is already in the graph, or was accepted
    /// earlier in the list, is dropped as a duplicate.
    fn select_links(&self, links: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();

        for link in links {
            let verdict = self.classifier.classify(link);
            if !verdict.is_accepted() {
                tracing::debug!("Filtered ({}): {}", verdict.reason(), link);
                continue;
            }

            let canonical = match canonicalize(link) {
                Ok(canonical) => canonical,
                Err(e) => {
                    tracing::debug!("Filtered (unparsable): {}: {}", link, e);
                    continue;
                }
            };

            if self.graph.is_visited(&canonical) || !seen.insert(canonical.clone()) {
                tracing::debug!("Filtered (duplicated): {}", link);
                continue;
            }

            tracing::info!("Accepted: {}", canonical);
            accepted.push(canonical);
        }

        accepted
    }

    /// Adds an accepted link below `parent` if the depth ceiling allows it
    fn attach(&mut self, link: &str, parent: NodeId) -> Option<NodeId> {
        let depth = self.graph.node(parent).depth() + 1;
        if !self.graph.is_allowed_depth(depth) {
            tracing::debug!("Filtered (depth {} > {}): {}", depth, self.graph.max_depth(), link);
            return None;
        }

        match self.graph.add_url(link, parent) {
            Ok(Some(id)) => Some(id),
            Ok(None) => {
                tracing::debug!("Filtered (duplicated): {}", link);
                None
            }
            Err(e) => {
                tracing::debug!("Filtered (unparsable): {}", e);
                None
            }
        }
    }

    async fn fetch_content(&mut self, id: NodeId) -> Result<String, HarvestError> {
        let url = self.graph.node(id).url.to_string();
        let page = self.fetcher.fetch(&url).await?;
        let markup = Markup::parse(&page.body);
        self.absorb(id, &page, &markup);
        Ok(markup.clean_content()?)
    }

    /// Records a fetched page's title and metadata on its node and returns its links
    ///
    /// Relative links resolve against the post-redirect URL. Content
    /// cleaning is left to callers that store the page.
    fn absorb(&mut self, id: NodeId, page: &FetchedPage, markup: &Markup) -> Vec<String> {
        let node = self.graph.node_mut(id);

        let base = Url::parse(&page.final_url).unwrap_or_else(|_| node.url.clone());

        node.title = markup.title();
        node.metadata = markup.metadata();
        if let Some(content_type) = &page.content_type {
            node.content_type = content_type.clone();
        }

        tracing::debug!("Parsed {} (title: {:?})", node.url, node.title);

        markup.links(&base)
    }
}
