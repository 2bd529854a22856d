use std::fs;
use std::path::{Path, PathBuf};

use docx_coreprop_package::Document;
use docx_coreprop_test_support::{read_part, DocxFixture};
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn cargo_bin() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("docx-coreprop-writer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn workspace(yaml: &str, fixture: DocxFixture) -> (TempDir, PathBuf, PathBuf) {
    let temp = tempdir().unwrap();
    let config = temp.path().join("meta.yaml");
    fs::write(&config, yaml).unwrap();
    let docx = temp.path().join("doc.docx");
    fixture.write_to(&docx);
    (temp, config, docx)
}

fn author(path: &Path) -> Option<String> {
    Document::open(path)
        .unwrap()
        .core_properties()
        .and_then(|core| core.author())
}

#[test]
fn writes_properties_and_reports_progress() {
    let (_temp, config, docx) = workspace(
        "docx_coreprop:\n  author: A\n  created: 01-Jan-2020\n",
        DocxFixture::new(),
    );

    let mut cmd = cargo_bin();
    cmd.arg("-I").arg(&config).arg("-O").arg(&docx);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("author = A"))
        .stderr(predicate::str::contains("created = 01-Jan-2020"))
        .stderr(predicate::str::contains("processed"));

    assert_eq!(author(&docx).as_deref(), Some("A"));
}

#[test]
fn metadata_flag_overrides_file_value() {
    let (_temp, config, docx) = workspace(
        "docx_coreprop:\n  author: From File\n",
        DocxFixture::new(),
    );

    let mut cmd = cargo_bin();
    cmd.arg("--input")
        .arg(&config)
        .arg("--output")
        .arg(&docx)
        .arg("-M")
        .arg("author=From CLI")
        .arg("-M")
        .arg("title=Report");

    cmd.assert().success();

    let document = Document::open(&docx).unwrap();
    let core = document.core_properties().unwrap();
    assert_eq!(core.author().as_deref(), Some("From CLI"));
    assert_eq!(core.title().as_deref(), Some("Report"));
}

#[test]
fn paragraph_flag_replaces_the_file_mapping() {
    let (_temp, config, docx) = workspace(
        "docx_coreprop:\n  paragraph:\n    Normal: Body Text\n",
        DocxFixture::new().body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Intro</w:t></w:r></w:p><w:p/>"#,
        ),
    );

    let mut cmd = cargo_bin();
    cmd.arg("-I")
        .arg(&config)
        .arg("-O")
        .arg(&docx)
        .arg("-P")
        .arg("Heading 1=Title");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Heading 1 -> Title"));

    let xml = read_part(&docx, "word/document.xml").unwrap();
    assert!(xml.contains(r#"<w:pStyle w:val="Title"/>"#), "{xml}");
    assert!(!xml.contains("BodyText"), "{xml}");
}

#[test]
fn debug_log_lists_skipped_steps() {
    let (_temp, config, docx) = workspace("docx_coreprop:\n  author: A\n", DocxFixture::new());

    let mut cmd = cargo_bin();
    cmd.env("RUST_LOG", "debug")
        .arg("-I")
        .arg(&config)
        .arg("-O")
        .arg(&docx);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("skipped step=okuzuke"))
        .stderr(predicate::str::contains("skipped step=paragraph styles"))
        .stderr(predicate::str::contains("skipped step=properties").not());
}

#[test]
fn invalid_date_exits_with_error_and_keeps_file() {
    let (_temp, config, docx) = workspace(
        "docx_coreprop:\n  created: yesterday\n",
        DocxFixture::new(),
    );
    let before = fs::read(&docx).unwrap();

    let mut cmd = cargo_bin();
    cmd.arg("-I").arg(&config).arg("-O").arg(&docx);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("docx-coreprop-writer error"))
        .stderr(predicate::str::contains("invalid date for created"));

    assert_eq!(fs::read(&docx).unwrap(), before);
}

#[test]
fn missing_config_file_is_reported() {
    let temp = tempdir().unwrap();
    let docx = temp.path().join("doc.docx");
    DocxFixture::new().write_to(&docx);

    let mut cmd = cargo_bin();
    cmd.arg("-I")
        .arg(temp.path().join("missing.yaml"))
        .arg("-O")
        .arg(&docx);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn output_flag_is_required() {
    let (_temp, config, _docx) = workspace("docx_coreprop: {}\n", DocxFixture::new());

    let mut cmd = cargo_bin();
    cmd.arg("-I").arg(&config);

    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn prints_version() {
    let mut cmd = cargo_bin();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
