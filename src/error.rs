use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the knowledge base. Only raised while building an engine.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {} has no '{column}' column", .path.display())]
    MissingColumn { column: String, path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("threshold must be in [0.0, 1.0], got {0}")]
    Threshold(f32),

    #[error("{0} column name must not be empty")]
    EmptyColumn(&'static str),

    #[error("min_token_len must be >= 1")]
    MinTokenLen,
}
