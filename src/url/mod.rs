//! URL handling module for Doc-Harvester
//!
//! This module provides URL parsing, canonicalization, host comparison, and
//! the crawl-scope classifier that decides which links are followed.

mod canonical;
mod domain;
mod scope;

// Re-export main functions
pub use canonical::{canonical_url, canonicalize, parse_url};
pub use domain::{extract_host, same_host};
pub use scope::{parent_path, ScopeClassifier, ScopeVerdict};
