use std::fmt;

use crate::xml::XmlDocument;

/// Built-in styles whose stored name differs from the name Word shows.
const UI_ALIASES: &[(&str, &str)] = &[
    ("Caption", "caption"),
    ("Footer", "footer"),
    ("Header", "header"),
    ("Heading 1", "heading 1"),
    ("Heading 2", "heading 2"),
    ("Heading 3", "heading 3"),
    ("Heading 4", "heading 4"),
    ("Heading 5", "heading 5"),
    ("Heading 6", "heading 6"),
    ("Heading 7", "heading 7"),
    ("Heading 8", "heading 8"),
    ("Heading 9", "heading 9"),
    ("Title", "title"),
];

/// Name Word shows for a style stored as `internal`.
pub fn ui_name(internal: &str) -> &str {
    UI_ALIASES
        .iter()
        .find(|(_, stored)| *stored == internal)
        .map(|(ui, _)| *ui)
        .unwrap_or(internal)
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("character") => StyleType::Character,
            Some("table") => StyleType::Table,
            Some("numbering") => StyleType::Numbering,
            _ => StyleType::Paragraph,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
            StyleType::Table => "table",
            StyleType::Numbering => "numbering",
        }
    }
}

impl fmt::Display for StyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `w:style` definition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Style {
    pub id: String,
    /// UI name, when the definition carries a `w:name`.
    pub name: Option<String>,
    pub style_type: StyleType,
    pub is_default: bool,
}

/// Read-only index over `word/styles.xml`.
#[derive(Clone, Debug, Default)]
pub struct StyleCatalog {
    styles: Vec<Style>,
}

impl StyleCatalog {
    pub fn from_xml(doc: &XmlDocument) -> Self {
        let styles = doc
            .root
            .elements()
            .filter(|element| element.name == "w:style")
            .filter_map(|element| {
                let id = element.attr("w:styleId")?.to_owned();
                let name = element
                    .child("w:name")
                    .and_then(|name| name.attr("w:val"))
                    .map(|name| ui_name(name).to_owned());
                Some(Style {
                    id,
                    name,
                    style_type: StyleType::from_attr(element.attr("w:type")),
                    is_default: matches!(element.attr("w:default"), Some("1" | "true" | "on")),
                })
            })
            .collect();
        StyleCatalog { styles }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Looks a style up by UI name, falling back to its style id.
    pub fn get(&self, name: &str) -> Option<&Style> {
        self.styles
            .iter()
            .find(|style| style.name.as_deref() == Some(name))
            .or_else(|| self.styles.iter().find(|style| style.id == name))
    }

    pub fn by_id(&self, id: &str, style_type: StyleType) -> Option<&Style> {
        self.styles
            .iter()
            .find(|style| style.id == id && style.style_type == style_type)
    }

    pub fn default_for(&self, style_type: StyleType) -> Option<&Style> {
        self.styles
            .iter()
            .rev()
            .find(|style| style.is_default && style.style_type == style_type)
    }

    /// Effective style of an element referencing `id`: the referenced style
    /// when it exists with the right type, the type's default otherwise.
    pub fn effective(&self, id: Option<&str>, style_type: StyleType) -> Option<&Style> {
        id.and_then(|id| self.by_id(id, style_type))
            .or_else(|| self.default_for(style_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StyleCatalog {
        let xml = r#"<w:styles xmlns:w="urn:w">
            <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
            <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
            <w:style w:type="character" w:default="1" w:styleId="DefaultParagraphFont"><w:name w:val="Default Paragraph Font"/></w:style>
            <w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/></w:style>
        </w:styles>"#;
        StyleCatalog::from_xml(&XmlDocument::parse("word/styles.xml", xml.as_bytes()).unwrap())
    }

    #[test]
    fn reports_ui_names_for_builtin_styles() {
        let catalog = catalog();
        let heading = catalog.get("Heading 1").expect("heading style");
        assert_eq!(heading.id, "Heading1");
        assert!(catalog.get("heading 1").is_none());
    }

    #[test]
    fn falls_back_to_style_id_lookup() {
        assert_eq!(
            catalog().get("TableGrid").map(|style| style.style_type),
            Some(StyleType::Table)
        );
    }

    #[test]
    fn effective_style_uses_type_default() {
        let catalog = catalog();
        assert_eq!(
            catalog
                .effective(None, StyleType::Paragraph)
                .map(|s| s.id.as_str()),
            Some("Normal")
        );
        assert_eq!(
            catalog
                .effective(Some("TableGrid"), StyleType::Paragraph)
                .map(|s| s.id.as_str()),
            Some("Normal")
        );
        assert!(catalog.effective(None, StyleType::Table).is_none());
    }
}
