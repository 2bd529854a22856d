use std::convert::Infallible;
use std::io::{Read, Seek};
use std::path::Path;

use crate::body::{self, Cell, Paragraph, Run, Table};
use crate::core_properties::{
    CoreProperties, CORE_PROPERTIES_CONTENT_TYPE, CORE_PROPERTIES_PART,
    CORE_PROPERTIES_RELATIONSHIP,
};
use crate::error::{PackageError, PackageResult};
use crate::opc::Package;
use crate::settings::{Settings, SETTINGS_CONTENT_TYPE, SETTINGS_RELATIONSHIP};
use crate::styles::StyleCatalog;
use crate::xml::{XmlDocument, XmlElement, XmlNode};

/// Text width used when the last section does not declare page geometry.
const DEFAULT_TEXT_WIDTH: u32 = 8640;

/// A loaded word-processing document.
///
/// Parts other than the main document, settings and core properties are
/// kept as raw bytes and written back unchanged.
#[derive(Debug)]
pub struct Document {
    package: Package,
    main: XmlDocument,
    styles: StyleCatalog,
    settings: Option<Settings>,
    settings_dirty: bool,
    core: Option<CoreProperties>,
    core_dirty: bool,
}

impl Document {
    pub fn open(path: &Path) -> PackageResult<Self> {
        Self::from_package(Package::open(path)?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> PackageResult<Self> {
        Self::from_package(Package::from_reader(reader)?)
    }

    fn from_package(package: Package) -> PackageResult<Self> {
        let root_rels = package.relationships(None)?;
        let main_rel = root_rels
            .find_by_type("officeDocument")
            .ok_or(PackageError::NoMainDocument)?;
        let main_part = root_rels.target_part(main_rel);
        let main = package
            .xml_part(&main_part)?
            .ok_or_else(|| PackageError::MissingPart(main_part.clone()))?;
        if main.root.child("w:body").is_none() {
            return Err(PackageError::xml(&main_part, "document has no w:body"));
        }

        let main_rels = package.relationships(Some(&main_part))?;
        let styles = match main_rels.find_by_type("styles") {
            Some(rel) => package
                .xml_part(&main_rels.target_part(rel))?
                .map(|doc| StyleCatalog::from_xml(&doc))
                .unwrap_or_default(),
            None => StyleCatalog::default(),
        };
        let settings = match main_rels.find_by_type("settings") {
            Some(rel) => package
                .xml_part(&main_rels.target_part(rel))?
                .map(Settings::from_document),
            None => None,
        };
        let core = match root_rels.find_by_type("core-properties") {
            Some(rel) => package
                .xml_part(&root_rels.target_part(rel))?
                .map(CoreProperties::from_document),
            None => None,
        };

        Ok(Document {
            package,
            main,
            styles,
            settings,
            settings_dirty: false,
            core,
            core_dirty: false,
        })
    }

    /// Part name of the main document, usually `word/document.xml`.
    pub fn main_part(&self) -> &str {
        &self.main.part
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn styles(&self) -> &StyleCatalog {
        &self.styles
    }

    pub fn core_properties(&self) -> Option<&CoreProperties> {
        self.core.as_ref()
    }

    /// Core properties for editing, creating the part when the package lacks one.
    pub fn core_properties_mut(&mut self) -> PackageResult<&mut CoreProperties> {
        if self.core.is_none() {
            let core = CoreProperties::empty();
            self.package.add_part(
                None,
                CORE_PROPERTIES_PART,
                CORE_PROPERTIES_RELATIONSHIP,
                CORE_PROPERTIES_CONTENT_TYPE,
                core.document().to_bytes()?,
            )?;
            self.core = Some(core);
        }
        self.core_dirty = true;
        self.core
            .as_mut()
            .ok_or_else(|| PackageError::MissingPart(CORE_PROPERTIES_PART.to_owned()))
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    /// Document settings for editing, creating `settings.xml` next to the
    /// main part when absent.
    pub fn settings_mut(&mut self) -> PackageResult<&mut Settings> {
        if self.settings.is_none() {
            let part = match self.main.part.rsplit_once('/') {
                Some((dir, _)) => format!("{dir}/settings.xml"),
                None => "settings.xml".to_owned(),
            };
            let settings = Settings::empty(&part);
            self.package.add_part(
                Some(&self.main.part),
                &part,
                SETTINGS_RELATIONSHIP,
                SETTINGS_CONTENT_TYPE,
                settings.document().to_bytes()?,
            )?;
            self.settings = Some(settings);
        }
        self.settings_dirty = true;
        self.settings
            .as_mut()
            .ok_or_else(|| PackageError::MissingPart("settings.xml".to_owned()))
    }

    pub fn body(&self) -> Option<&XmlElement> {
        self.main.root.child("w:body")
    }

    fn body_mut(&mut self) -> PackageResult<&mut XmlElement> {
        let part = self.main.part.clone();
        self.main
            .root
            .child_mut("w:body")
            .ok_or_else(|| PackageError::xml(&part, "document has no w:body"))
    }

    /// Visits the body's top-level paragraphs in document order.
    pub fn try_for_each_paragraph<E>(
        &mut self,
        mut f: impl FnMut(Paragraph<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        let Some(body) = self.main.root.child_mut("w:body") else {
            return Ok(());
        };
        body::walk_paragraphs(body, &mut |element: &mut XmlElement| f(Paragraph::new(element)))
    }

    /// Visits the body's top-level tables.
    pub fn try_for_each_table<E>(
        &mut self,
        mut f: impl FnMut(Table<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        let Some(body) = self.main.root.child_mut("w:body") else {
            return Ok(());
        };
        body::walk_tables(body, &mut |element: &mut XmlElement| f(Table::new(element)))
    }

    pub fn try_for_each_run<E>(
        &mut self,
        mut f: impl FnMut(Run<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        let Some(body) = self.main.root.child_mut("w:body") else {
            return Ok(());
        };
        body::walk_runs(body, &mut |element: &mut XmlElement| f(Run::new(element)))
    }

    /// Visits every cell of the top-level tables, nested tables excluded.
    pub fn try_for_each_cell<E>(
        &mut self,
        mut f: impl FnMut(Cell<'_>) -> Result<(), E>,
    ) -> Result<(), E> {
        let Some(body) = self.main.root.child_mut("w:body") else {
            return Ok(());
        };
        body::walk_cells(body, &mut |element: &mut XmlElement| f(Cell::new(element)))
    }

    pub fn for_each_paragraph(&mut self, mut f: impl FnMut(Paragraph<'_>)) {
        self.try_for_each_paragraph(|p| {
            f(p);
            Ok::<(), Infallible>(())
        })
        .unwrap_or_else(|never| match never {});
    }

    pub fn for_each_table(&mut self, mut f: impl FnMut(Table<'_>)) {
        self.try_for_each_table(|t| {
            f(t);
            Ok::<(), Infallible>(())
        })
        .unwrap_or_else(|never| match never {});
    }

    pub fn for_each_run(&mut self, mut f: impl FnMut(Run<'_>)) {
        self.try_for_each_run(|r| {
            f(r);
            Ok::<(), Infallible>(())
        })
        .unwrap_or_else(|never| match never {});
    }

    pub fn for_each_cell(&mut self, mut f: impl FnMut(Cell<'_>)) {
        self.try_for_each_cell(|c| {
            f(c);
            Ok::<(), Infallible>(())
        })
        .unwrap_or_else(|never| match never {});
    }

    /// Appends a paragraph holding a single page break.
    pub fn add_page_break(&mut self) -> PackageResult<()> {
        let paragraph = XmlElement::new("w:p").with_child(
            XmlElement::new("w:r")
                .with_child(XmlElement::new("w:br").with_attr("w:type", "page")),
        );
        let body = self.body_mut()?;
        insert_block(body, paragraph);
        Ok(())
    }

    /// Appends a `rows` x `cols` table whose columns share the text width evenly.
    pub fn add_table(
        &mut self,
        rows: usize,
        cols: usize,
        style_id: Option<&str>,
    ) -> PackageResult<Table<'_>> {
        let part = self.main.part.clone();
        let body = self.body_mut()?;
        let cols = cols.max(1);
        let col_width = text_width(body) / cols as u32;

        let mut props = XmlElement::new("w:tblPr");
        if let Some(id) = style_id {
            props.push(XmlElement::new("w:tblStyle").with_attr("w:val", id));
        }
        props.push(
            XmlElement::new("w:tblW")
                .with_attr("w:w", "0")
                .with_attr("w:type", "auto"),
        );
        props.push(
            XmlElement::new("w:tblLook")
                .with_attr("w:val", "04A0")
                .with_attr("w:firstRow", "1")
                .with_attr("w:lastRow", "0")
                .with_attr("w:firstColumn", "1")
                .with_attr("w:lastColumn", "0")
                .with_attr("w:noHBand", "0")
                .with_attr("w:noVBand", "1"),
        );

        let mut grid = XmlElement::new("w:tblGrid");
        for _ in 0..cols {
            grid.push(XmlElement::new("w:gridCol").with_attr("w:w", col_width.to_string()));
        }

        let mut table = XmlElement::new("w:tbl").with_child(props).with_child(grid);
        for _ in 0..rows {
            let mut row = XmlElement::new("w:tr");
            for _ in 0..cols {
                let cell_props = XmlElement::new("w:tcPr").with_child(
                    XmlElement::new("w:tcW")
                        .with_attr("w:w", col_width.to_string())
                        .with_attr("w:type", "dxa"),
                );
                row.push(
                    XmlElement::new("w:tc")
                        .with_child(cell_props)
                        .with_child(XmlElement::new("w:p")),
                );
            }
            table.push(row);
        }

        let idx = insert_block(body, table);
        element_at(body, idx, &part).map(Table::new)
    }

    /// Starts a new section on a new page after the current content.
    ///
    /// The section that closes the existing content keeps the last section's
    /// properties; the new trailing section copies its page geometry and
    /// inherits headers and footers.
    pub fn add_section(&mut self) -> PackageResult<()> {
        let body = self.body_mut()?;
        if body.child("w:sectPr").is_none() {
            body.push(XmlElement::new("w:sectPr"));
        }
        let closing = body
            .child("w:sectPr")
            .cloned()
            .unwrap_or_else(|| XmlElement::new("w:sectPr"));
        let paragraph = XmlElement::new("w:p")
            .with_child(XmlElement::new("w:pPr").with_child(closing));
        insert_block(body, paragraph);

        if let Some(sentinel) = body.child_mut("w:sectPr") {
            sentinel.remove_children("w:headerReference");
            sentinel.remove_children("w:footerReference");
            sentinel.remove_children("w:type");
        }
        Ok(())
    }

    /// Serializes the edited parts back into the package and writes it to
    /// `path` atomically.
    pub fn save(&mut self, path: &Path) -> PackageResult<()> {
        self.flush()?;
        self.package.save(path)
    }

    pub fn to_bytes(&mut self) -> PackageResult<Vec<u8>> {
        self.flush()?;
        self.package.to_bytes()
    }

    fn flush(&mut self) -> PackageResult<()> {
        let main = self.main.to_bytes()?;
        self.package.set_part(&self.main.part, main);
        if self.settings_dirty {
            if let Some(settings) = &self.settings {
                let doc = settings.document();
                self.package.set_part(&doc.part, doc.to_bytes()?);
            }
        }
        if self.core_dirty {
            if let Some(core) = &self.core {
                let doc = core.document();
                self.package.set_part(&doc.part, doc.to_bytes()?);
            }
        }
        Ok(())
    }
}

/// Inserts block content ahead of the body's trailing `w:sectPr`.
fn insert_block(body: &mut XmlElement, element: XmlElement) -> usize {
    body.insert_ordered(element, &["w:sectPr"])
}

fn element_at<'a>(
    body: &'a mut XmlElement,
    idx: usize,
    part: &str,
) -> PackageResult<&'a mut XmlElement> {
    match body.children.get_mut(idx) {
        Some(XmlNode::Element(element)) => Ok(element),
        _ => Err(PackageError::xml(part, "inserted element not found")),
    }
}

/// Page width minus the left and right margins of the last section, in twips.
fn text_width(body: &XmlElement) -> u32 {
    let Some(sect) = body.child("w:sectPr") else {
        return DEFAULT_TEXT_WIDTH;
    };
    let twips = |element: Option<&XmlElement>, attr: &str| {
        element
            .and_then(|element| element.attr(attr))
            .and_then(|value| value.parse::<u32>().ok())
    };
    let page = twips(sect.child("w:pgSz"), "w:w");
    let margins = sect.child("w:pgMar");
    match (page, twips(margins, "w:left"), twips(margins, "w:right")) {
        (Some(page), Some(left), Some(right)) => left
            .checked_add(right)
            .and_then(|margins| page.checked_sub(margins))
            .filter(|width| *width > 0)
            .unwrap_or(DEFAULT_TEXT_WIDTH),
        _ => DEFAULT_TEXT_WIDTH,
    }
}
