use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PapersError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed paper path: {0}")]
    MalformedPath(PathBuf),

    #[error("invalid listing pattern: {0}")]
    Pattern(String),

    #[error("status store serialization error: {0}")]
    Serialization(String),

    #[error("failed to write status file {path}: {source}")]
    StatusWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown series: {0}")]
    UnknownSeries(String),

    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("no record with identity {0}")]
    UnknownRecord(String),

    #[error("record {id} has no {variant} file")]
    MissingVariant { id: String, variant: String },
}

pub type Result<T> = std::result::Result<T, PapersError>;
