//! Open Packaging Conventions container: zip entries, relationships and
//! content types.

use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PackageError, PackageResult};
use crate::xml::{XmlDocument, XmlElement};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

#[derive(Clone, Debug)]
struct Entry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// In-memory copy of every entry of a zip package.
#[derive(Clone, Debug, Default)]
pub struct Package {
    entries: Vec<Entry>,
}

impl Package {
    pub fn open(path: &Path) -> PackageResult<Self> {
        let file = File::open(path).map_err(|source| PackageError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> PackageResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());
        for idx in 0..archive.len() {
            let mut file = archive.by_index(idx)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_owned(),
                data,
                compression: file.compression(),
                is_dir: file.is_dir(),
            });
        }
        Ok(Package { entries })
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| entry.name.as_str())
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| !entry.is_dir && entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    /// Replaces the bytes of `name`, appending a new deflated entry when absent.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name: name.to_owned(),
                data,
                compression: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    pub fn xml_part(&self, name: &str) -> PackageResult<Option<XmlDocument>> {
        self.part(name)
            .map(|bytes| XmlDocument::parse(name, bytes))
            .transpose()
    }

    /// Relationships of `source` (`None` for the package itself).
    pub fn relationships(&self, source: Option<&str>) -> PackageResult<Relationships> {
        let part = relationships_part(source);
        let mut relationships = Relationships {
            source: source.map(str::to_owned),
            items: Vec::new(),
        };
        if let Some(doc) = self.xml_part(&part)? {
            for element in doc.root.elements() {
                if element.name != "Relationship" {
                    continue;
                }
                relationships.items.push(Relationship {
                    id: element.attr("Id").unwrap_or_default().to_owned(),
                    rel_type: element.attr("Type").unwrap_or_default().to_owned(),
                    target: element.attr("Target").unwrap_or_default().to_owned(),
                    external: element.attr("TargetMode") == Some("External"),
                });
            }
        }
        Ok(relationships)
    }

    pub fn set_relationships(&mut self, relationships: &Relationships) -> PackageResult<()> {
        let part = relationships_part(relationships.source.as_deref());
        let bytes = relationships.to_document(&part).to_bytes()?;
        self.set_part(&part, bytes);
        Ok(())
    }

    /// Adds a new part related from `source`, with its content-type override.
    ///
    /// Returns the relationship id.
    pub fn add_part(
        &mut self,
        source: Option<&str>,
        part: &str,
        rel_type: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> PackageResult<String> {
        let mut relationships = self.relationships(source)?;
        let target = relative_target(source, part);
        let id = relationships.add(rel_type, &target);
        self.set_relationships(&relationships)?;
        self.add_content_type_override(part, content_type)?;
        self.set_part(part, data);
        debug!(part, rel_type, "added package part");
        Ok(id)
    }

    fn add_content_type_override(&mut self, part: &str, content_type: &str) -> PackageResult<()> {
        let mut doc = match self.xml_part(CONTENT_TYPES_PART)? {
            Some(doc) => doc,
            None => XmlDocument::new(
                CONTENT_TYPES_PART,
                XmlElement::new("Types").with_attr("xmlns", CONTENT_TYPES_NS),
            ),
        };
        let part_name = format!("/{part}");
        let exists = doc.root.elements().any(|element| {
            element.name == "Override" && element.attr("PartName") == Some(part_name.as_str())
        });
        if !exists {
            doc.root.push(
                XmlElement::new("Override")
                    .with_attr("PartName", part_name)
                    .with_attr("ContentType", content_type),
            );
        }
        let bytes = doc.to_bytes()?;
        self.set_part(CONTENT_TYPES_PART, bytes);
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> PackageResult<W> {
        let mut zip = ZipWriter::new(writer);
        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
                continue;
            }
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }
        Ok(zip.finish()?)
    }

    pub fn to_bytes(&self) -> PackageResult<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Atomically writes the package to `path`: readers never observe a
    /// partially written file.
    pub fn save(&self, path: &Path) -> PackageResult<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };

        let mut tmp = Builder::new()
            .prefix(".docx-coreprop")
            .suffix(".docx")
            .tempfile_in(&parent)?;

        let bytes = self.to_bytes()?;
        tmp.as_file_mut().write_all(&bytes)?;
        tmp.as_file_mut().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(metadata) = fs::metadata(path) {
                let perm = metadata.permissions().mode();
                let _ = fs::set_permissions(tmp.path(), fs::Permissions::from_mode(perm));
            }
        }

        tmp.persist(path).map_err(|err| PackageError::Io(err.error))?;
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Relationships declared by one source part.
#[derive(Clone, Debug, Default)]
pub struct Relationships {
    source: Option<String>,
    items: Vec<Relationship>,
}

impl Relationships {
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// First internal relationship whose type ends with `/{suffix}`.
    ///
    /// Matching on the suffix accepts both transitional and strict type URIs.
    pub fn find_by_type(&self, suffix: &str) -> Option<&Relationship> {
        let suffix = format!("/{suffix}");
        self.items
            .iter()
            .find(|rel| !rel.external && rel.rel_type.ends_with(&suffix))
    }

    /// Package part name the relationship points at.
    pub fn target_part(&self, relationship: &Relationship) -> String {
        resolve_target(self.source.as_deref(), &relationship.target)
    }

    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let mut next = self.items.len() + 1;
        let id = loop {
            let candidate = format!("rId{next}");
            if self.items.iter().all(|rel| rel.id != candidate) {
                break candidate;
            }
            next += 1;
        };
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_owned(),
            target: target.to_owned(),
            external: false,
        });
        id
    }

    fn to_document(&self, part: &str) -> XmlDocument {
        let mut root = XmlElement::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS);
        for rel in &self.items {
            let mut element = XmlElement::new("Relationship")
                .with_attr("Id", rel.id.as_str())
                .with_attr("Type", rel.rel_type.as_str())
                .with_attr("Target", rel.target.as_str());
            if rel.external {
                element.set_attr("TargetMode", "External");
            }
            root.push(element);
        }
        XmlDocument::new(part, root)
    }
}

fn relationships_part(source: Option<&str>) -> String {
    match source {
        None => "_rels/.rels".to_owned(),
        Some(part) => match part.rsplit_once('/') {
            Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
            None => format!("_rels/{part}.rels"),
        },
    }
}

fn base_dir(source: Option<&str>) -> &str {
    source
        .and_then(|part| part.rsplit_once('/'))
        .map(|(dir, _)| dir)
        .unwrap_or("")
}

/// Resolves a relationship target against its source part's directory.
pub fn resolve_target(source: Option<&str>, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_owned(),
        None => {
            let dir = base_dir(source);
            if dir.is_empty() {
                target.to_owned()
            } else {
                format!("{dir}/{target}")
            }
        }
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn relative_target(source: Option<&str>, part: &str) -> String {
    let dir = base_dir(source);
    if dir.is_empty() {
        return part.to_owned();
    }
    match part.strip_prefix(dir).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => rest.to_owned(),
        None => format!("/{part}"),
    }
}
