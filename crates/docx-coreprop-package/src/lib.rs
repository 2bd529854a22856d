//! Minimal reader and writer for WordprocessingML (`.docx`) packages.
//!
//! A [`Document`] keeps every zip entry in memory, parses the parts it edits
//! (main document, settings, core properties) into an owned XML tree and
//! leaves everything else untouched. Views such as [`Paragraph`] and
//! [`Table`] expose the handful of properties the editing tools change.

pub mod body;
pub mod core_properties;
pub mod document;
pub mod error;
pub mod opc;
pub mod settings;
pub mod styles;
pub mod xml;

pub use body::{Cell, CellVerticalAlignment, Paragraph, Run, Styled, Table, TableAlignment};
pub use core_properties::CoreProperties;
pub use document::Document;
pub use error::{PackageError, PackageResult};
pub use opc::{Package, Relationship, Relationships};
pub use settings::Settings;
pub use styles::{Style, StyleCatalog, StyleType};
pub use xml::{XmlDocument, XmlElement, XmlNode};
