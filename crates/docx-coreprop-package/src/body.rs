//! Views over block-level WordprocessingML content in `w:body`.

use std::fmt;
use std::str::FromStr;

use crate::xml::{XmlElement, XmlNode};

/// Containers between `w:body` and the cells of its top-level tables.
const CELL_CONTAINERS: &[&str] = &["w:tbl", "w:tr"];

/// Containers that hold runs anywhere in the body.
const RUN_CONTAINERS: &[&str] = &[
    "w:tbl",
    "w:tr",
    "w:tc",
    "w:sdt",
    "w:sdtContent",
    "w:customXml",
    "w:p",
    "w:hyperlink",
    "w:ins",
    "w:moveTo",
    "w:smartTag",
    "w:fldSimple",
];

/// `w:tblPr` children that follow `w:jc`.
const JC_SUCCESSORS: &[&str] = &[
    "w:tblCellSpacing",
    "w:tblInd",
    "w:tblBorders",
    "w:shd",
    "w:tblLayout",
    "w:tblCellMar",
    "w:tblLook",
    "w:tblCaption",
    "w:tblDescription",
    "w:tblPrChange",
];

/// `w:tblPr` children that follow `w:tblLayout`.
const LAYOUT_SUCCESSORS: &[&str] = &[
    "w:tblCellMar",
    "w:tblLook",
    "w:tblCaption",
    "w:tblDescription",
    "w:tblPrChange",
];

/// `w:tcPr` children that follow `w:vAlign`.
const VALIGN_SUCCESSORS: &[&str] = &[
    "w:hideMark",
    "w:headers",
    "w:cellIns",
    "w:cellDel",
    "w:cellMerge",
    "w:tcPrChange",
];

/// Visits every element named `target` under `parent`, descending through `containers`.
fn walk<E>(
    parent: &mut XmlElement,
    target: &str,
    containers: &[&str],
    visit: &mut dyn FnMut(&mut XmlElement) -> Result<(), E>,
) -> Result<(), E> {
    for node in parent.children.iter_mut() {
        let XmlNode::Element(child) = node else {
            continue;
        };
        if child.name == target {
            visit(child)?;
        }
        if containers.contains(&child.name.as_str()) {
            walk(child, target, containers, visit)?;
        }
    }
    Ok(())
}

pub(crate) fn walk_paragraphs<E>(
    body: &mut XmlElement,
    visit: &mut dyn FnMut(&mut XmlElement) -> Result<(), E>,
) -> Result<(), E> {
    walk(body, "w:p", &[], visit)
}

pub(crate) fn walk_tables<E>(
    body: &mut XmlElement,
    visit: &mut dyn FnMut(&mut XmlElement) -> Result<(), E>,
) -> Result<(), E> {
    walk(body, "w:tbl", &[], visit)
}

pub(crate) fn walk_cells<E>(
    body: &mut XmlElement,
    visit: &mut dyn FnMut(&mut XmlElement) -> Result<(), E>,
) -> Result<(), E> {
    walk(body, "w:tc", CELL_CONTAINERS, visit)
}

pub(crate) fn walk_runs<E>(
    body: &mut XmlElement,
    visit: &mut dyn FnMut(&mut XmlElement) -> Result<(), E>,
) -> Result<(), E> {
    walk(body, "w:r", RUN_CONTAINERS, visit)
}

fn style_ref<'a>(element: &'a XmlElement, props: &str, style: &str) -> Option<&'a str> {
    element.child(props)?.child(style)?.attr("w:val")
}

fn set_style_ref(element: &mut XmlElement, props: &str, style: &str, id: Option<&str>) {
    match id {
        Some(id) => {
            element
                .ensure_first_child(props)
                .ensure_first_child(style)
                .set_attr("w:val", id);
        }
        None => {
            if let Some(props) = element.child_mut(props) {
                props.remove_children(style);
            }
        }
    }
}

/// An element whose formatting comes from a named style.
pub trait Styled {
    fn style_id(&self) -> Option<&str>;

    /// `None` removes the explicit reference so the type's default applies.
    fn set_style_id(&mut self, id: Option<&str>);
}

macro_rules! impl_styled {
    ($($view:ident),*) => {
        $(
            impl Styled for $view<'_> {
                fn style_id(&self) -> Option<&str> {
                    $view::style_id(self)
                }

                fn set_style_id(&mut self, id: Option<&str>) {
                    $view::set_style_id(self, id)
                }
            }
        )*
    };
}

impl_styled!(Paragraph, Run, Table);

/// A `w:p` element.
pub struct Paragraph<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Paragraph<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Paragraph { element }
    }

    pub fn style_id(&self) -> Option<&str> {
        style_ref(self.element, "w:pPr", "w:pStyle")
    }

    /// Sets `w:pPr/w:pStyle`; `None` removes the explicit reference.
    pub fn set_style_id(&mut self, id: Option<&str>) {
        set_style_ref(self.element, "w:pPr", "w:pStyle", id);
    }

    pub fn text(&self) -> String {
        self.element.text()
    }

    /// Replaces the paragraph's runs with a single run carrying `text`.
    pub fn set_text(&mut self, text: &str) {
        self.element
            .children
            .retain(|node| matches!(node, XmlNode::Element(element) if element.name == "w:pPr"));
        if !text.is_empty() {
            self.element.push(run_with_text(text));
        }
    }
}

/// A `w:r` element.
pub struct Run<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Run<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Run { element }
    }

    pub fn style_id(&self) -> Option<&str> {
        style_ref(self.element, "w:rPr", "w:rStyle")
    }

    pub fn set_style_id(&mut self, id: Option<&str>) {
        set_style_ref(self.element, "w:rPr", "w:rStyle", id);
    }

    pub fn text(&self) -> String {
        self.element.text()
    }
}

/// A `w:tbl` element.
pub struct Table<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Table<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Table { element }
    }

    pub fn style_id(&self) -> Option<&str> {
        style_ref(self.element, "w:tblPr", "w:tblStyle")
    }

    pub fn set_style_id(&mut self, id: Option<&str>) {
        set_style_ref(self.element, "w:tblPr", "w:tblStyle", id);
    }

    pub fn alignment(&self) -> Option<TableAlignment> {
        self.element
            .child("w:tblPr")?
            .child("w:jc")?
            .attr("w:val")?
            .parse()
            .ok()
    }

    pub fn set_alignment(&mut self, alignment: TableAlignment) {
        self.element
            .ensure_first_child("w:tblPr")
            .ensure_child("w:jc", JC_SUCCESSORS)
            .set_attr("w:val", alignment.as_str());
    }

    /// Autofit is on unless `w:tblLayout` is `fixed`.
    pub fn autofit(&self) -> bool {
        self.element
            .child("w:tblPr")
            .and_then(|props| props.child("w:tblLayout"))
            .and_then(|layout| layout.attr("w:type"))
            != Some("fixed")
    }

    pub fn set_autofit(&mut self, autofit: bool) {
        let layout = if autofit { "autofit" } else { "fixed" };
        self.element
            .ensure_first_child("w:tblPr")
            .ensure_child("w:tblLayout", LAYOUT_SUCCESSORS)
            .set_attr("w:type", layout);
    }

    pub fn row_count(&self) -> usize {
        self.element
            .elements()
            .filter(|element| element.name == "w:tr")
            .count()
    }

    /// Cell at `row`, `col`, counting `w:tc` elements of that row.
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<Cell<'_>> {
        self.element
            .elements_mut()
            .filter(|element| element.name == "w:tr")
            .nth(row)?
            .elements_mut()
            .filter(|element| element.name == "w:tc")
            .nth(col)
            .map(Cell::new)
    }

    /// Every cell with its row and column index, in row-major order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = (usize, usize, Cell<'_>)> + '_ {
        self.element
            .elements_mut()
            .filter(|element| element.name == "w:tr")
            .enumerate()
            .flat_map(|(row_idx, row)| {
                row.elements_mut()
                    .filter(|element| element.name == "w:tc")
                    .enumerate()
                    .map(move |(col_idx, cell)| (row_idx, col_idx, Cell::new(cell)))
            })
    }
}

/// A `w:tc` element.
pub struct Cell<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Cell<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Cell { element }
    }

    pub fn vertical_alignment(&self) -> Option<CellVerticalAlignment> {
        self.element
            .child("w:tcPr")?
            .child("w:vAlign")?
            .attr("w:val")?
            .parse()
            .ok()
    }

    pub fn set_vertical_alignment(&mut self, alignment: CellVerticalAlignment) {
        self.element
            .ensure_first_child("w:tcPr")
            .ensure_child("w:vAlign", VALIGN_SUCCESSORS)
            .set_attr("w:val", alignment.as_str());
    }

    pub fn text(&self) -> String {
        self.element.text()
    }

    /// Writes `text` into the cell's first paragraph, dropping any others.
    pub fn set_text(&mut self, text: &str) {
        let mut first = true;
        self.element.children.retain(|node| match node {
            XmlNode::Element(element) if element.name == "w:p" => std::mem::take(&mut first),
            _ => true,
        });
        if first {
            self.element.push(XmlElement::new("w:p"));
        }
        if let Some(paragraph) = self.element.child_mut("w:p") {
            Paragraph::new(paragraph).set_text(text);
        }
    }

    pub fn set_paragraph_style_id(&mut self, id: Option<&str>) {
        for element in self.element.elements_mut() {
            if element.name == "w:p" {
                Paragraph::new(element).set_style_id(id);
            }
        }
    }
}

/// Builds a `w:r` for `text`, mapping tabs to `w:tab` and each line ending to one `w:br`.
pub(crate) fn run_with_text(text: &str) -> XmlElement {
    let mut run = XmlElement::new("w:r");
    let mut pending = String::new();
    let flush = |run: &mut XmlElement, pending: &mut String| {
        if pending.is_empty() {
            return;
        }
        let mut t = XmlElement::new("w:t");
        if pending.starts_with(char::is_whitespace) || pending.ends_with(char::is_whitespace) {
            t.set_attr("xml:space", "preserve");
        }
        t.set_text(std::mem::take(pending));
        run.push(t);
    };
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => {
                flush(&mut run, &mut pending);
                run.push(XmlElement::new("w:tab"));
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                flush(&mut run, &mut pending);
                run.push(XmlElement::new("w:br"));
            }
            other => pending.push(other),
        }
    }
    flush(&mut run, &mut pending);
    run
}

/// Table alignment within the page (`w:tblPr/w:jc`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableAlignment {
    Left,
    Center,
    Right,
}

impl TableAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            TableAlignment::Left => "left",
            TableAlignment::Center => "center",
            TableAlignment::Right => "right",
        }
    }
}

impl fmt::Display for TableAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableAlignment {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(TableAlignment::Left),
            "center" => Ok(TableAlignment::Center),
            "right" | "end" => Ok(TableAlignment::Right),
            _ => Err(()),
        }
    }
}

/// Vertical alignment of cell content (`w:tcPr/w:vAlign`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CellVerticalAlignment {
    Top,
    Center,
    Bottom,
    Both,
}

impl CellVerticalAlignment {
    pub fn as_str(self) -> &'static str {
        match self {
            CellVerticalAlignment::Top => "top",
            CellVerticalAlignment::Center => "center",
            CellVerticalAlignment::Bottom => "bottom",
            CellVerticalAlignment::Both => "both",
        }
    }
}

impl fmt::Display for CellVerticalAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellVerticalAlignment {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "top" => Ok(CellVerticalAlignment::Top),
            "center" => Ok(CellVerticalAlignment::Center),
            "bottom" => Ok(CellVerticalAlignment::Bottom),
            "both" => Ok(CellVerticalAlignment::Both),
            _ => Err(()),
        }
    }
}
