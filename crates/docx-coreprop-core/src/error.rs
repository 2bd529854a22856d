use docx_coreprop_config::{CoreProperty, StyleScope};
use docx_coreprop_package::{PackageError, StyleType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("invalid date for {property}: {value:?} (expected e.g. 01-Jan-2020)")]
    InvalidDate {
        property: CoreProperty,
        value: String,
    },

    #[error("{scope} style {name:?} does not exist in the document")]
    StyleNotFound { scope: StyleScope, name: String },

    #[error("style {name:?} is a {actual} style, expected a {expected} style")]
    StyleTypeMismatch {
        name: String,
        expected: StyleType,
        actual: StyleType,
    },

    #[error("invalid value for {key}: {value:?}")]
    InvalidKeyword { key: &'static str, value: String },
}

pub type ApplyResult<T> = Result<T, ApplyError>;
