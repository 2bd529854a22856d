use std::io::Cursor;

use docx_coreprop_package::{Document, PackageError, StyleType, TableAlignment};
use docx_coreprop_test_support::{read_part, read_part_bytes, DocxFixture};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn open(fixture: &DocxFixture) -> Document {
    Document::from_reader(Cursor::new(fixture.to_bytes())).expect("open fixture")
}

#[test]
fn reads_core_properties_and_styles() {
    let doc = open(&DocxFixture::new().core("<dc:creator>Someone</dc:creator>"));

    let core = doc.core_properties().expect("core part");
    assert_eq!(core.author().as_deref(), Some("Someone"));
    assert_eq!(doc.main_part(), "word/document.xml");

    let heading = doc.styles().get("Heading 1").expect("heading style");
    assert_eq!(heading.id, "Heading1");
    assert_eq!(heading.style_type, StyleType::Paragraph);
}

#[test]
fn unrelated_parts_survive_save_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.docx");
    let opaque = b"<root>\r\n  <keep   spacing=\"yes\"/></root>";
    DocxFixture::new()
        .part("customXml/item1.xml", opaque)
        .write_to(&path);
    let styles_before = read_part(&path, "word/styles.xml").unwrap();

    let mut doc = Document::open(&path).unwrap();
    doc.core_properties_mut().unwrap().set_title("Report");
    doc.save(&path).unwrap();

    assert_eq!(
        read_part(&path, "customXml/item1.xml").unwrap().as_bytes(),
        opaque
    );
    assert_eq!(read_part(&path, "word/styles.xml").unwrap(), styles_before);
    let core = read_part(&path, "docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>Report</dc:title>"), "{core}");
}

#[test]
fn creates_core_properties_part_when_missing() {
    let mut doc = open(&DocxFixture::new().without_core());
    assert!(doc.core_properties().is_none());

    doc.core_properties_mut().unwrap().set_author("A");
    let bytes = doc.to_bytes().unwrap();

    let rels = read_part_bytes(&bytes, "_rels/.rels").unwrap();
    assert!(rels.contains("metadata/core-properties"), "{rels}");
    assert!(rels.contains(r#"Target="docProps/core.xml""#), "{rels}");
    let types = read_part_bytes(&bytes, "[Content_Types].xml").unwrap();
    assert!(types.contains(r#"PartName="/docProps/core.xml""#), "{types}");

    let reopened = Document::from_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(
        reopened.core_properties().and_then(|core| core.author()),
        Some("A".to_string())
    );
}

#[test]
fn creates_settings_part_when_missing() {
    let mut doc = open(&DocxFixture::new().without_settings());
    doc.settings_mut().unwrap().set_read_only_recommended(true);
    let bytes = doc.to_bytes().unwrap();

    let rels = read_part_bytes(&bytes, "word/_rels/document.xml.rels").unwrap();
    assert!(rels.contains(r#"Target="settings.xml""#), "{rels}");

    let reopened = Document::from_reader(Cursor::new(bytes)).unwrap();
    assert!(reopened
        .settings()
        .is_some_and(|settings| settings.read_only_recommended()));
}

#[test]
fn visits_only_top_level_tables_and_their_cells() {
    let mut doc = open(&DocxFixture::new().body(
        r#"<w:tbl><w:tr><w:tc><w:p/><w:tbl><w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl></w:tc></w:tr></w:tbl>"#,
    ));

    let mut tables = 0;
    doc.for_each_table(|mut table| {
        table.set_alignment(TableAlignment::Right);
        tables += 1;
    });
    let mut cells = 0;
    doc.for_each_cell(|_| cells += 1);
    let mut paragraphs = 0;
    doc.for_each_paragraph(|_| paragraphs += 1);

    assert_eq!((tables, cells, paragraphs), (1, 1, 0));
    let bytes = doc.to_bytes().unwrap();
    let xml = read_part_bytes(&bytes, "word/document.xml").unwrap();
    assert_eq!(xml.matches(r#"<w:jc w:val="right"/>"#).count(), 1, "{xml}");
}

#[test]
fn appended_table_splits_text_width() {
    let mut doc = open(&DocxFixture::new());
    let mut table = doc.add_table(1, 2, Some("TableGrid")).unwrap();
    table.cell_mut(0, 1).unwrap().set_text("right");
    assert_eq!(table.style_id(), Some("TableGrid"));

    let bytes = doc.to_bytes().unwrap();
    let xml = read_part_bytes(&bytes, "word/document.xml").unwrap();
    assert!(xml.contains(r#"<w:gridCol w:w="4320"/>"#), "{xml}");
    assert!(xml.contains("<w:t>right</w:t>"), "{xml}");
    let table_at = xml.find("<w:tbl>").unwrap();
    let sect_at = xml.rfind("<w:sectPr>").unwrap();
    assert!(table_at < sect_at);
}

#[test]
fn oversized_margins_fall_back_to_default_text_width() {
    let mut doc = open(&DocxFixture::new().sect_pr(
        r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:left="4294967295" w:right="1"/></w:sectPr>"#,
    ));
    doc.add_table(1, 2, None).unwrap();

    let bytes = doc.to_bytes().unwrap();
    let xml = read_part_bytes(&bytes, "word/document.xml").unwrap();
    assert!(xml.contains(r#"<w:gridCol w:w="4320"/>"#), "{xml}");
}

#[test]
fn new_section_inherits_headers() {
    let mut doc = open(&DocxFixture::new().sect_pr(
        r#"<w:sectPr><w:headerReference w:type="default" r:id="rId9"/><w:type w:val="continuous"/><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
    ));
    doc.add_section().unwrap();

    let body = doc.body().unwrap();
    let sentinel = body.child("w:sectPr").unwrap();
    assert!(sentinel.child("w:headerReference").is_none());
    assert!(sentinel.child("w:type").is_none());
    assert_eq!(
        sentinel.child("w:pgSz").and_then(|size| size.attr("w:w")),
        Some("11906")
    );

    let closing = body
        .elements()
        .filter(|element| element.name == "w:p")
        .last()
        .and_then(|p| p.child("w:pPr"))
        .and_then(|props| props.child("w:sectPr"))
        .expect("section break paragraph");
    assert!(closing.child("w:headerReference").is_some());
}

#[test]
fn rejects_package_without_main_document() {
    let bytes = {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("_rels/.rels", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#)
            .unwrap();
        zip.finish().unwrap().into_inner()
    };
    let err = Document::from_reader(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, PackageError::NoMainDocument), "{err}");
}
