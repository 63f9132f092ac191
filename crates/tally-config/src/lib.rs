//! tally-config
//!
//! Bot configuration model plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{resolve_home_dir, ConfigManager, HOME_ENV};
pub use model::Config;
