//! Storage traits and error types
//!
//! This module defines the trait interface for document sinks, the error
//! type they share, and the no-op sink used when nothing is persisted.

use crate::state::{NodeId, SiteGraph};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write document {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document lock poisoned by a panicked writer")]
    Poisoned,

    #[error("Save task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Destination for harvested page content
///
/// The harvester talks to storage only through this trait, so exploration
/// (which stores nothing) and download (which persists a document) share
/// one code path.
///
/// Implementations must be safe to call from several threads at once:
/// `upsert` may race with a background `flush`.
pub trait DocumentSink: Send + Sync {
    /// Inserts or replaces the record for a node
    ///
    /// The record is keyed by the node's canonical URL; its outbound links
    /// are the node's direct children at the time of the call.
    fn upsert(&self, graph: &SiteGraph, node: NodeId, content: &str) -> StoreResult<()>;

    /// Replaces a stored node's outbound links with its current children
    ///
    /// The record's content and fetch timestamp are left unchanged. Nodes
    /// without a record are ignored.
    fn update_links(&self, graph: &SiteGraph, node: NodeId) -> StoreResult<()>;

    /// Writes every record to durable storage
    fn flush(&self) -> StoreResult<()>;

    /// Signals any background saving to stop
    ///
    /// This does not flush. Callers that need durability call
    /// [`flush`](DocumentSink::flush) afterwards.
    fn stop(&self);
}

/// Sink that discards everything, used in exploration mode
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl DocumentSink for NullStore {
    fn upsert(&self, _graph: &SiteGraph, _node: NodeId, _content: &str) -> StoreResult<()> {
        Ok(())
    }

    fn update_links(&self, _graph: &SiteGraph, _node: NodeId) -> StoreResult<()> {
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    fn stop(&self) {}
}
