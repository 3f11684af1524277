use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not read settings file {path}: {reason}")]
    Settings { path: PathBuf, reason: String },

    #[error("unknown station `{station}` (see `radiorec list`)")]
    UnknownStation { station: String },

    #[error(transparent)]
    Record(#[from] radiorec_engine::RecordError),
}

pub type Result<T> = std::result::Result<T, AppError>;
