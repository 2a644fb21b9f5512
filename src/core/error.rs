use thiserror::Error;

use crate::core::types::{ExperienceId, TaxonomyLevel};

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Experience not found: {0}")]
    UnknownExperience(ExperienceId),

    #[error("Unknown {level} in taxonomy: {id}")]
    UnknownTaxonomyNode { level: TaxonomyLevel, id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid dataset: {}", .0.join("; "))]
    InvalidDataset(Vec<String>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error in {file}: {source}")]
    TomlError {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl PortfolioError {
    pub fn unknown_node(level: TaxonomyLevel, id: impl Into<String>) -> Self {
        PortfolioError::UnknownTaxonomyNode {
            level,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
