//! Configuration module for wbdl
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. A configuration file is optional; `Config::default()` is a complete,
//! valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use wbdl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("wbdl.toml")).unwrap();
//! println!("Archives go to: {}", config.output.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
