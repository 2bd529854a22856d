use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to read {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid zip container: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed xml in part {part}: {message}")]
    Xml { part: String, message: String },

    #[error("part {0} is missing from the package")]
    MissingPart(String),

    #[error("package has no main document relationship")]
    NoMainDocument,

    #[error("part {part} is not valid utf-8")]
    Encoding { part: String },
}

impl PackageError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        PackageError::Xml {
            part: part.to_owned(),
            message: err.to_string(),
        }
    }
}

pub type PackageResult<T> = Result<T, PackageError>;
