use super::config::ConfigError;
use crate::core::models::category::Category;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(
        "No control data: classification needs at least one '{}' well with a value",
        Category::NegativeHealthy
    )]
    NoControlData,

    #[error("Readings are out of range: the {0} is not a finite number")]
    NonFinite(&'static str),

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}
