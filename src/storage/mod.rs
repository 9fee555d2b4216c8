//! Storage module for persisting harvested pages
//!
//! This module owns the accumulated output document:
//! - `HarvestDocument`, the serializable page collection
//! - `DocumentStore`, a mutex-guarded JSON file with periodic auto-save
//! - `NullStore`, a sink that discards everything (explore mode)

mod document;
mod json_store;
mod traits;

pub use document::{DocumentRecord, HarvestDocument, DOCUMENT_PURPOSE};
pub use json_store::{DocumentStore, DEFAULT_FLUSH_INTERVAL};
pub use traits::{DocumentSink, NullStore, StoreError, StoreResult};
