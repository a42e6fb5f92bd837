//! Configuration management for the hunter application.
//!
//! This crate handles loading, validating, and persisting configuration
//! from multiple sources (files, environment variables, defaults).
//!
//! # Overview
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`guidance`]: Guidance backend selection and timeouts
//! - [`auth`]: API key resolution
//! - [`persistence`]: Config file reading and writing
//! - [`error`]: Error types for configuration operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. Environment variables (`HUNTER_*`)
//! 2. Local config (`./hunter.json5` or `./hunter.json`)
//! 3. User config (`~/.config/hunter/config.json5` or `~/.config/hunter/config.json`)
//! 4. Built-in defaults
//!
//! # File Format
//!
//! ```json5
//! {
//!   // Where profiles live; defaults to the platform data directory
//!   "data_dir": "/home/me/.hunter",
//!   "seed_on_first_run": true,
//!   "guidance": {
//!     "backend": "remote",
//!     "endpoint": "https://relay.example.com/functions/v1/chat-ai",
//!     "timeout_secs": 15
//!   }
//! }
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use hunter_config::Config;
//!
//! # fn example() -> hunter_config::Result<()> {
//! let config = Config::load()?;
//! println!("Profiles live in {}", config.data_dir()?.display());
//! println!("Guidance times out after {:?}", config.guidance.timeout());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod guidance;
pub mod persistence;

pub use config::Config;
pub use error::{ConfigError, Result};
pub use guidance::{GuidanceBackend, GuidanceConfig};
