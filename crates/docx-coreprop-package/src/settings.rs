//! `word/settings.xml` document-wide settings.

use crate::xml::{XmlDocument, XmlElement};

pub const SETTINGS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
pub const SETTINGS_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const COMPAT_URI: &str = "http://schemas.microsoft.com/office/word";

/// Elements that follow `w:compat` in the `CT_Settings` sequence.
const COMPAT_SUCCESSORS: &[&str] = &[
    "w:docVars",
    "w:rsids",
    "m:mathPr",
    "w:attachedSchema",
    "w:themeFontLang",
    "w:clrSchemeMapping",
    "w:doNotIncludeSubdocsInStats",
    "w:doNotAutoCompressPictures",
    "w:forceUpgrade",
    "w:captions",
    "w:readModeInkLockDown",
    "w:smartTagType",
    "sl:schemaLibrary",
    "w:shapeDefaults",
    "w:doNotEmbedSmartTags",
    "w:decimalSymbol",
    "w:listSeparator",
];

/// Compatibility settings Word 2010 writes for documents in its native mode.
const WORD2010_COMPAT: &[(&str, &str)] = &[
    ("compatibilityMode", "14"),
    ("overrideTableStyleFontSizeAndJustification", "1"),
    ("enableOpenTypeFeatures", "1"),
    ("doNotFlipMirrorIndents", "1"),
];

#[derive(Clone, Debug)]
pub struct Settings {
    doc: XmlDocument,
}

impl Settings {
    pub(crate) fn from_document(doc: XmlDocument) -> Self {
        Settings { doc }
    }

    pub(crate) fn empty(part: &str) -> Self {
        let root = XmlElement::new("w:settings").with_attr("xmlns:w", NS_W);
        Settings {
            doc: XmlDocument::new(part, root),
        }
    }

    pub(crate) fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// Value of the `compatibilityMode` compat setting, if any.
    pub fn compatibility_mode(&self) -> Option<&str> {
        self.doc
            .root
            .child("w:compat")?
            .elements()
            .find(|setting| {
                setting.name == "w:compatSetting"
                    && setting.attr("w:name") == Some("compatibilityMode")
            })
            .and_then(|setting| setting.attr("w:val"))
    }

    /// Replaces `w:compat` with the fixed Word 2010 block.
    pub fn set_word2010_compatibility(&mut self) {
        let mut compat = XmlElement::new("w:compat");
        for (name, value) in WORD2010_COMPAT {
            compat.push(
                XmlElement::new("w:compatSetting")
                    .with_attr("w:name", *name)
                    .with_attr("w:uri", COMPAT_URI)
                    .with_attr("w:val", *value),
            );
        }

        let root = &mut self.doc.root;
        match root.child_mut("w:compat") {
            Some(existing) => *existing = compat,
            None => {
                root.insert_ordered(compat, COMPAT_SUCCESSORS);
            }
        }
    }

    pub fn read_only_recommended(&self) -> bool {
        self.doc
            .root
            .child("w:writeProtection")
            .and_then(|protection| protection.attr("w:recommended"))
            .is_some_and(|value| matches!(value, "1" | "true" | "on"))
    }

    pub fn set_read_only_recommended(&mut self, recommended: bool) {
        let protection = self.doc.root.ensure_first_child("w:writeProtection");
        if recommended {
            protection.set_attr("w:recommended", "1");
        } else {
            protection.remove_attr("w:recommended");
        }
    }
}
