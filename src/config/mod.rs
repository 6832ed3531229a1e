//! Configuration module for Page-Scribe
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables (including `config.env` / `.env` files).
//!
//! # Example
//!
//! ```no_run
//! use page_scribe::config::{load_config, load_env_files};
//! use std::path::Path;
//!
//! load_env_files();
//! let mut config = load_config(Path::new("scribe.toml")).unwrap();
//! config.apply_env();
//! println!("Using model: {}", config.llm.model);
//! ```

mod env;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, LlmConfig, OutputConfig};

pub use env::{load_env_files, API_KEY_VAR, BASE_URL_VAR, MODEL_VAR};
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
