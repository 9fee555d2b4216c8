//! The persisted harvest document and its page records

use crate::state::{NodeId, SiteGraph};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker written into every document so its origin is obvious to readers
pub const DOCUMENT_PURPOSE: &str = "Web documentation harvested by doc-harvester, intended for use as reference material in prompts and context windows";

/// One harvested page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Canonical page URL
    pub url: String,
    pub title: String,
    /// Site-relative path of the page
    pub path: String,
    /// RFC 3339 timestamp of the fetch that produced this record
    pub last_fetched: String,
    /// Cleaned page text
    pub content: String,
    /// Canonical URLs of the page's direct children
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

impl DocumentRecord {
    /// Builds a record for a node, stamped with the current time
    pub fn from_node(graph: &SiteGraph, id: NodeId, content: &str) -> Self {
        let node = graph.node(id);
        Self {
            url: node.canonical_url(),
            title: node.title.clone(),
            path: node.url.path().to_string(),
            last_fetched: Utc::now().to_rfc3339(),
            content: content.to_string(),
            links: graph.children_urls(id),
        }
    }
}

/// Root metadata plus the ordered page records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestDocument {
    pub root_url: String,
    pub created_at: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pages: Vec<DocumentRecord>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl HarvestDocument {
    /// Creates an empty document stamped with the current time
    pub fn new(root_url: &str) -> Self {
        Self {
            root_url: root_url.to_string(),
            created_at: Utc::now().to_rfc3339(),
            purpose: DOCUMENT_PURPOSE.to_string(),
            pages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Inserts a record, or replaces the one with the same URL in place
    ///
    /// Returns true if the record was new.
    pub fn upsert(&mut self, record: DocumentRecord) -> bool {
        match self.index.get(&record.url) {
            Some(&pos) => {
                self.pages[pos] = record;
                false
            }
            None => {
                self.index.insert(record.url.clone(), self.pages.len());
                self.pages.push(record);
                true
            }
        }
    }

    /// Replaces the outbound links of an existing record, keeping its timestamp
    ///
    /// Returns false if no record is stored under `url`.
    pub fn set_links(&mut self, url: &str, links: Vec<String>) -> bool {
        match self.index.get(url) {
            Some(&pos) => {
                self.pages[pos].links = links;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, url: &str) -> Option<&DocumentRecord> {
        self.index.get(url).map(|&pos| &self.pages[pos])
    }

    pub fn pages(&self) -> &[DocumentRecord] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a previously written document and rebuilds its URL index
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut document: Self = serde_json::from_str(json)?;
        document.index = document
            .pages
            .iter()
            .enumerate()
            .map(|(pos, page)| (page.url.clone(), pos))
            .collect();
        Ok(document)
    }
}
