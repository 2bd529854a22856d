//! `docProps/core.xml`: Dublin Core and OPC descriptive metadata.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::xml::{XmlDocument, XmlElement};

pub const CORE_PROPERTIES_PART: &str = "docProps/core.xml";
pub const CORE_PROPERTIES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";
pub const CORE_PROPERTIES_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

const NS_CP: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
const NS_DCTERMS: &str = "http://purl.org/dc/terms/";
const NS_DCMITYPE: &str = "http://purl.org/dc/dcmitype/";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";

const W3CDTF: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Editable view of the core properties part.
#[derive(Clone, Debug)]
pub struct CoreProperties {
    doc: XmlDocument,
}

macro_rules! text_properties {
    ($($(#[$meta:meta])* $getter:ident, $setter:ident => $element:literal;)*) => {
        $(
            $(#[$meta])*
            pub fn $getter(&self) -> Option<String> {
                self.text($element)
            }

            pub fn $setter(&mut self, value: &str) {
                self.set_text($element, value, None);
            }
        )*
    };
}

impl CoreProperties {
    pub(crate) fn from_document(doc: XmlDocument) -> Self {
        CoreProperties { doc }
    }

    /// Empty core properties part with the conventional namespace prefixes.
    pub(crate) fn empty() -> Self {
        let root = XmlElement::new("cp:coreProperties")
            .with_attr("xmlns:cp", NS_CP)
            .with_attr("xmlns:dc", NS_DC)
            .with_attr("xmlns:dcterms", NS_DCTERMS)
            .with_attr("xmlns:dcmitype", NS_DCMITYPE)
            .with_attr("xmlns:xsi", NS_XSI);
        CoreProperties {
            doc: XmlDocument::new(CORE_PROPERTIES_PART, root),
        }
    }

    pub(crate) fn document(&self) -> &XmlDocument {
        &self.doc
    }

    text_properties! {
        /// `dc:creator`
        author, set_author => "dc:creator";
        category, set_category => "cp:category";
        /// `dc:description`
        comments, set_comments => "dc:description";
        content_status, set_content_status => "cp:contentStatus";
        identifier, set_identifier => "dc:identifier";
        keywords, set_keywords => "cp:keywords";
        language, set_language => "dc:language";
        last_modified_by, set_last_modified_by => "cp:lastModifiedBy";
        /// Passed through as text; Word expects a positive integer.
        revision, set_revision => "cp:revision";
        subject, set_subject => "dc:subject";
        title, set_title => "dc:title";
        version, set_version => "cp:version";
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        self.datetime("dcterms:created")
    }

    pub fn set_created(&mut self, value: NaiveDateTime) {
        self.set_datetime("dcterms:created", value, true);
    }

    pub fn modified(&self) -> Option<NaiveDateTime> {
        self.datetime("dcterms:modified")
    }

    pub fn set_modified(&mut self, value: NaiveDateTime) {
        self.set_datetime("dcterms:modified", value, true);
    }

    pub fn last_printed(&self) -> Option<NaiveDateTime> {
        self.datetime("cp:lastPrinted")
    }

    pub fn set_last_printed(&mut self, value: NaiveDateTime) {
        self.set_datetime("cp:lastPrinted", value, false);
    }

    fn text(&self, name: &str) -> Option<String> {
        self.doc.root.child(name).map(XmlElement::text)
    }

    fn set_text(&mut self, name: &str, value: &str, xsi_type: Option<&str>) {
        let root = &mut self.doc.root;
        if let Some((prefix, _)) = name.split_once(':') {
            root.ensure_namespace(prefix, namespace_for(prefix));
        }
        if xsi_type.is_some() {
            root.ensure_namespace("xsi", NS_XSI);
        }
        let element = root.ensure_child(name, &[]);
        match xsi_type {
            Some(kind) => element.set_attr("xsi:type", kind),
            None => {
                element.remove_attr("xsi:type");
            }
        }
        if value.is_empty() {
            element.children.clear();
        } else {
            element.set_text(value);
        }
    }

    fn datetime(&self, name: &str) -> Option<NaiveDateTime> {
        let text = self.text(name)?;
        parse_w3cdtf(text.trim())
    }

    fn set_datetime(&mut self, name: &str, value: NaiveDateTime, typed: bool) {
        let text = value.format(W3CDTF).to_string();
        self.set_text(name, &text, typed.then_some("dcterms:W3CDTF"));
    }
}

fn namespace_for(prefix: &str) -> &'static str {
    match prefix {
        "dc" => NS_DC,
        "dcterms" => NS_DCTERMS,
        _ => NS_CP,
    }
}

/// Parses the W3CDTF profile of ISO 8601 used by core properties.
fn parse_w3cdtf(text: &str) -> Option<NaiveDateTime> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.naive_utc());
    }
    for format in [W3CDTF, "%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
