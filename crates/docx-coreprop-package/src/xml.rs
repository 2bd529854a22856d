//! Owned XML tree used for every part this crate edits.
//!
//! The tree keeps qualified names as written (`w:p`, `dc:title`), attribute
//! order, text, comments and processing instructions, so a part parsed and
//! written back without edits keeps the same infoset.

use std::borrow::Cow;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{PackageError, PackageResult};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    Instruction(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| key != name);
        before != self.attributes.len()
    }

    /// Child elements, skipping text and other node kinds.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|element| element.name == name)
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    /// Removes every direct child element named `name`, returning how many went.
    pub fn remove_children(&mut self, name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, XmlNode::Element(element) if element.name == name));
        before - self.children.len()
    }

    /// Returns the child named `name`, inserting an empty one as the first child when absent.
    pub fn ensure_first_child(&mut self, name: &str) -> &mut XmlElement {
        let idx = match self.position(name) {
            Some(idx) => idx,
            None => {
                self.children.insert(0, XmlNode::Element(XmlElement::new(name)));
                0
            }
        };
        self.element_at_mut(idx)
    }

    /// Returns the child named `name`, inserting an empty one before the first
    /// existing child whose name appears in `successors` (or at the end).
    pub fn ensure_child(&mut self, name: &str, successors: &[&str]) -> &mut XmlElement {
        let idx = match self.position(name) {
            Some(idx) => idx,
            None => self.insert_ordered(XmlElement::new(name), successors),
        };
        self.element_at_mut(idx)
    }

    /// Inserts `element` before the first child named in `successors` and returns its index.
    pub fn insert_ordered(&mut self, element: XmlElement, successors: &[&str]) -> usize {
        let idx = self
            .children
            .iter()
            .position(|node| {
                matches!(node, XmlNode::Element(existing) if successors.contains(&existing.name.as_str()))
            })
            .unwrap_or(self.children.len());
        self.children.insert(idx, XmlNode::Element(element));
        idx
    }

    /// Concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Declares `xmlns:{prefix}` on this element unless already present.
    pub fn ensure_namespace(&mut self, prefix: &str, uri: &str) {
        let key = format!("xmlns:{prefix}");
        if self.attr(&key).is_none() {
            self.attributes.push((key, uri.to_owned()));
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(element) if element.name == name))
    }

    fn element_at_mut(&mut self, idx: usize) -> &mut XmlElement {
        match &mut self.children[idx] {
            XmlNode::Element(element) => element,
            _ => unreachable!("child {idx} was located as an element"),
        }
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Element(child) => collect_text(child, out),
            XmlNode::Text(text) | XmlNode::CData(text) => out.push_str(text),
            XmlNode::Comment(_) | XmlNode::Instruction(_) => {}
        }
    }
}

/// A parsed XML part.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct XmlDocument {
    pub part: String,
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn new(part: impl Into<String>, root: XmlElement) -> Self {
        XmlDocument {
            part: part.into(),
            root,
        }
    }

    pub fn parse(part: &str, bytes: &[u8]) -> PackageResult<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let content = std::str::from_utf8(bytes).map_err(|_| PackageError::Encoding {
            part: part.to_owned(),
        })?;

        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| PackageError::xml(part, err))?;
            match event {
                Event::Start(start) => stack.push(element_from_start(part, &start)?),
                Event::Empty(start) => {
                    let element = element_from_start(part, &start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| PackageError::xml(part, "unbalanced end tag"))?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = text.unescape().map_err(|err| PackageError::xml(part, err))?;
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::CData(lossy(&data)));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Comment(lossy(&comment)));
                    }
                }
                Event::PI(instruction) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Instruction(lossy(&instruction)));
                    }
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(PackageError::xml(part, "unexpected end of document"));
        }
        let root = root.ok_or_else(|| PackageError::xml(part, "document has no root element"))?;
        Ok(XmlDocument::new(part, root))
    }

    pub fn to_bytes(&self) -> PackageResult<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(|err| PackageError::xml(&self.part, err))?;
        writer.get_mut().extend_from_slice(b"\r\n");
        write_element(&mut writer, &self.root).map_err(|err| PackageError::xml(&self.part, err))?;
        Ok(writer.into_inner())
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn element_from_start(part: &str, start: &BytesStart<'_>) -> PackageResult<XmlElement> {
    let mut element = XmlElement::new(lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|err| PackageError::xml(part, err))?;
        let key = lossy(attr.key.as_ref());
        let value: Cow<'_, str> = attr
            .unescape_value()
            .map_err(|err| PackageError::xml(part, err))?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|err| err.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|err| err.to_string())?;
    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|err| err.to_string())?,
            XmlNode::CData(text) => writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .map_err(|err| err.to_string())?,
            XmlNode::Comment(text) => writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(|err| err.to_string())?,
            XmlNode::Instruction(text) => {
                let raw = writer.get_mut();
                raw.extend_from_slice(b"<?");
                raw.extend_from_slice(text.as_bytes());
                raw.extend_from_slice(b"?>");
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|err| err.to_string())
}
