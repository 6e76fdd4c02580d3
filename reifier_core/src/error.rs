use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReifierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed class file {entry}: {message}")]
    ClassFormat { entry: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file 'reifier.toml' not found searching from {search_start:?}")]
    ConfigNotFound { search_start: PathBuf },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid regex pattern: {0}")]
    Regex(String),

    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Domain object with name '{name}' not found in container '{container}'.")]
    UnknownDomainObject { name: String, container: String },

    #[error("{0}")]
    IllegalState(String),
}

impl From<regex::Error> for ReifierError {
    fn from(err: regex::Error) -> Self {
        ReifierError::Regex(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReifierError>;

impl ReifierError {
    pub fn class_format(entry: impl Into<String>, message: impl Into<String>) -> Self {
        ReifierError::ClassFormat {
            entry: entry.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ReifierError::Config(message.into())
    }

    pub fn unknown_domain_object(name: impl Into<String>, container: impl Into<String>) -> Self {
        ReifierError::UnknownDomainObject {
            name: name.into(),
            container: container.into(),
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        ReifierError::IllegalState(message.into())
    }
}
