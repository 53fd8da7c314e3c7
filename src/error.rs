use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// A non-fillable key was mass assigned on a totally guarded record.
    #[error("Add [{key}] to the fillable property to allow mass assignment on [{kind}].")]
    MassAssignment { key: String, kind: &'static str },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

// Helper conversions
impl From<config::ConfigError> for ModelError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
