//! Applies YAML-configured metadata, style and layout edits to docx files.

pub mod engine;
pub mod error;
pub mod layout;
pub mod okuzuke;
pub mod properties;
pub mod styles;

pub use docx_coreprop_config::Config;
pub use engine::{apply, AppliedStep, ApplyOutcome, ApplyRequest, Step};
pub use error::{ApplyError, ApplyResult};
