//! Configuration module for quotegrab
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus deriving the seed URLs a run starts from.
//!
//! # Example
//!
//! ```no_run
//! use quotegrab::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Results wanted: {}", config.crawler.results_wanted);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, ProxyConfig, SourceConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
