//! Configuration module for Doc-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file section falls back to the
//! built-in behavior.
//!
//! # Example
//!
//! ```no_run
//! use doc_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Documents go to: {}", config.output.document_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, HarvestConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

// Re-export validation for settings overridden after loading
pub use validation::validate;
