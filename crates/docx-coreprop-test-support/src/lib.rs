//! Shared test harness utilities for docx-coreprop crates.
//!
//! [`DocxFixture`] assembles a small but well-formed `.docx` package from
//! XML snippets so tests can describe only the content they care about.

use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>{overrides}</Types>"#;

const DEFAULT_BODY: &str = r#"<w:p><w:r><w:t>Hello</w:t></w:r></w:p>"#;

const DEFAULT_SECT_PR: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

const DEFAULT_STYLES: &str = r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="BodyText"><w:name w:val="Body Text"/><w:basedOn w:val="Normal"/></w:style><w:style w:type="character" w:default="1" w:styleId="DefaultParagraphFont"><w:name w:val="Default Paragraph Font"/></w:style><w:style w:type="character" w:styleId="Emphasis"><w:name w:val="Emphasis"/></w:style><w:style w:type="character" w:styleId="Strong"><w:name w:val="Strong"/></w:style><w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/></w:style><w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/></w:style><w:style w:type="table" w:styleId="LightShading"><w:name w:val="Light Shading"/><w:basedOn w:val="TableNormal"/></w:style>"#;

/// Builder for a minimal word-processing package.
#[derive(Clone, Debug)]
pub struct DocxFixture {
    body: String,
    sect_pr: String,
    styles: String,
    core: Option<String>,
    settings: Option<String>,
    extra_parts: Vec<(String, Vec<u8>)>,
}

impl Default for DocxFixture {
    fn default() -> Self {
        DocxFixture {
            body: DEFAULT_BODY.to_owned(),
            sect_pr: DEFAULT_SECT_PR.to_owned(),
            styles: DEFAULT_STYLES.to_owned(),
            core: Some(String::new()),
            settings: Some(r#"<w:zoom w:percent="100"/>"#.to_owned()),
            extra_parts: Vec::new(),
        }
    }
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block content placed in `w:body` ahead of the trailing `w:sectPr`.
    pub fn body(mut self, xml: &str) -> Self {
        self.body = xml.to_owned();
        self
    }

    /// Replaces the trailing `w:sectPr`; an empty string omits it.
    pub fn sect_pr(mut self, xml: &str) -> Self {
        self.sect_pr = xml.to_owned();
        self
    }

    /// Appends `w:style` definitions to the default catalog.
    pub fn styles(mut self, xml: &str) -> Self {
        self.styles.push_str(xml);
        self
    }

    /// Children of `cp:coreProperties`.
    pub fn core(mut self, xml: &str) -> Self {
        self.core = Some(xml.to_owned());
        self
    }

    pub fn without_core(mut self) -> Self {
        self.core = None;
        self
    }

    /// Children of `w:settings`.
    pub fn settings(mut self, xml: &str) -> Self {
        self.settings = Some(xml.to_owned());
        self
    }

    pub fn without_settings(mut self) -> Self {
        self.settings = None;
        self
    }

    /// Adds an opaque entry that the package must carry through unchanged.
    pub fn part(mut self, name: &str, data: &[u8]) -> Self {
        self.extra_parts.push((name.to_owned(), data.to_vec()));
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, data: &[u8]| {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options).expect("start fixture entry");
            zip.write_all(data).expect("write fixture entry");
        };

        let mut overrides = String::new();
        let mut root_rels = String::from(
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
        );
        let mut doc_rels = String::from(
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        );
        if self.core.is_some() {
            overrides.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
            root_rels.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#);
        }
        if self.settings.is_some() {
            overrides.push_str(r#"<Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/>"#);
            doc_rels.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>"#);
        }

        add(
            "[Content_Types].xml",
            CONTENT_TYPES.replace("{overrides}", &overrides).as_bytes(),
        );
        add("_rels/.rels", relationships(&root_rels).as_bytes());
        add(
            "word/document.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}{}</w:body></w:document>"#,
                self.body, self.sect_pr
            )
            .as_bytes(),
        );
        add(
            "word/_rels/document.xml.rels",
            relationships(&doc_rels).as_bytes(),
        );
        add(
            "word/styles.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}">{}</w:styles>"#,
                self.styles
            )
            .as_bytes(),
        );
        if let Some(settings) = &self.settings {
            add(
                "word/settings.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="{W_NS}">{settings}</w:settings>"#
                )
                .as_bytes(),
            );
        }
        if let Some(core) = &self.core {
            add(
                "docProps/core.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{core}</cp:coreProperties>"#
                )
                .as_bytes(),
            );
        }
        for (name, data) in &self.extra_parts {
            add(name, data);
        }

        zip.finish().expect("finish fixture").into_inner()
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.to_bytes()).expect("write fixture file");
    }
}

fn relationships(items: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{items}</Relationships>"#
    )
}

/// Reads one entry of a zip package as UTF-8 text.
pub fn read_part(path: &Path, name: &str) -> Option<String> {
    let bytes = std::fs::read(path).ok()?;
    read_part_bytes(&bytes, name)
}

pub fn read_part_bytes(package: &[u8], name: &str) -> Option<String> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(package)).ok()?;
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).ok()?;
    Some(out)
}
