pub mod app_config;
pub mod config;
pub mod products;
pub mod search;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Price, PriceDetail, Product, ProductCategory, ProductDraft, ProductInput, Tier};
pub use search::SearchFilters;

use thiserror::Error;

/// Business-rule violations raised before any store access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("product name is required")]
    MissingName,
    #[error("invalid product category: '{0}'")]
    InvalidCategory(String),
    #[error("invalid tier: '{0}'")]
    InvalidTier(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingEnvVar(String),
    #[error("environment variable {var} is invalid: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
