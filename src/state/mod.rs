//! State module for tracking crawl progress
//!
//! This module holds the in-memory crawl state for a single harvest run.
//!
//! # Components
//!
//! - `Node`: one page's URL, title, depth and links to parent/children
//! - `SiteGraph`: the arena-backed tree of nodes with canonical-URL deduplication

mod node;
mod site_graph;

// Re-export main types
pub use node::{Node, NodeId, DEFAULT_CONTENT_TYPE};
pub use site_graph::SiteGraph;
