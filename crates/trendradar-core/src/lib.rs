pub mod app_config;
pub mod config;
pub mod source;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Endpoints, RedditCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use source::{AutocompleteSource, ForumSource, MarketplaceSource};
pub use types::{ForumPost, Keyword, MarketplaceListing, Record, SourceResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
