//! Configuration system for the liveroute service.
//!
//! Provides TOML-based configuration with:
//! - `[server]` bind address, logging and body limits
//! - `[session]` createdAt override and sweeper settings for the session store
//! - `[routing]` Distance Matrix settings (API key via `GOOGLE_API_KEY`)
//! - `[expand]` link expander settings
//! - Config file layering (user config dir + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, load_config, load_config_file, load_config_with_options, xdg_config_dir,
};
pub use error::{ConfigError, Result};
pub use types::*;
