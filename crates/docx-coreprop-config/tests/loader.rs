use std::fs;
use std::io::Write;
use std::path::Path;

use docx_coreprop_config::{
    Config, ConfigError, ConfigSourceKind, CoreProperty, LoadOptions, Okuzuke, Overrides,
    StyleMapping, StyleScope,
};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn mapping(from: &str, to: &str) -> StyleMapping {
    StyleMapping {
        from: from.into(),
        to: to.into(),
    }
}

#[test]
fn loads_properties_from_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("meta.yaml");
    write_file(
        &path,
        r#"
docx_coreprop:
  author: "A"
  created: "01-Jan-2020"
  revision: 3
  version: 1.5
  unknown-key: ignored
"#,
    );

    let config = Config::load(LoadOptions::new(&path)).expect("load config");

    assert_eq!(config.properties.get(CoreProperty::Author), Some("A"));
    assert_eq!(
        config.properties.get(CoreProperty::Created),
        Some("01-Jan-2020")
    );
    assert_eq!(config.properties.get(CoreProperty::Revision), Some("3"));
    assert_eq!(config.properties.get(CoreProperty::Version), Some("1.5"));
    assert_eq!(config.properties.get(CoreProperty::Title), None);

    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::File);
    assert_eq!(config.sources.layers[0].path.as_deref(), Some(path.as_path()));
}

#[test]
fn override_wins_over_file_value() {
    let overrides = Overrides::default()
        .with_metadata("author", "From CLI")
        .with_metadata("title", "Only In Override");

    let config = Config::from_yaml_str(
        "docx_coreprop:\n  author: From File\n  subject: Kept\n",
        &overrides,
    )
    .expect("resolve");

    assert_eq!(config.properties.get(CoreProperty::Author), Some("From CLI"));
    assert_eq!(
        config.properties.get(CoreProperty::Title),
        Some("Only In Override")
    );
    assert_eq!(config.properties.get(CoreProperty::Subject), Some("Kept"));
    assert_eq!(config.sources.layers.len(), 2);
    assert_eq!(config.sources.layers[1].kind, ConfigSourceKind::Override);
}

#[test]
fn null_values_count_as_absent() {
    let config = Config::from_yaml_str(
        "docx_coreprop:\n  author: ~\n  okuzuke: null\n",
        &Overrides::default(),
    )
    .expect("resolve");

    assert!(config.properties.is_empty());
    assert!(config.okuzuke.is_none());
}

#[test]
fn empty_override_value_is_still_a_value() {
    let overrides = Overrides::default().with_metadata("keywords", "");
    let config = Config::from_yaml_str("docx_coreprop:\n  keywords: a, b\n", &overrides)
        .expect("resolve");

    assert_eq!(config.properties.get(CoreProperty::Keywords), Some(""));
}

#[test]
fn properties_iterate_in_fixed_order() {
    let config = Config::from_yaml_str(
        "docx_coreprop:\n  title: T\n  author: A\n  modified: 02-Feb-2021\n",
        &Overrides::default(),
    )
    .expect("resolve");

    let order: Vec<CoreProperty> = config.properties.iter().map(|(key, _)| key).collect();
    assert_eq!(
        order,
        vec![
            CoreProperty::Author,
            CoreProperty::Modified,
            CoreProperty::Title
        ]
    );
}

#[test]
fn style_overrides_replace_the_file_mapping_for_their_scope() {
    let overrides = Overrides::default()
        .with_style(StyleScope::Paragraph, "Heading 1", "Title")
        .with_style(StyleScope::Paragraph, "Quote", "Intense Quote")
        .with_style(StyleScope::Paragraph, "Heading 1", "Subtitle")
        .with_style(StyleScope::Character, "Emphasis", "Strong");

    let config = Config::from_yaml_str(
        r#"
docx_coreprop:
  paragraph:
    Heading 1: Heading 2
    Normal: Body Text
  table:
    Table Grid: Light Shading
"#,
        &overrides,
    )
    .expect("resolve");

    assert_eq!(
        config.styles.for_scope(StyleScope::Paragraph),
        &[
            mapping("Heading 1", "Subtitle"),
            mapping("Quote", "Intense Quote"),
        ]
    );
    assert_eq!(
        config.styles.table,
        vec![mapping("Table Grid", "Light Shading")]
    );
    assert_eq!(config.styles.character, vec![mapping("Emphasis", "Strong")]);
}

#[test]
fn layout_flags_accept_booleans_and_override_strings() {
    let overrides = Overrides::default()
        .with_metadata("read-only-recommended", "yes")
        .with_metadata("extra_section", "false");

    let config = Config::from_yaml_str(
        r#"
docx_coreprop:
  table-alignment-in-page: center
  table-cell-vertical-alignment: bottom
  word2010compatible: true
  disable-table-autofit: "on"
  extra_section: true
"#,
        &overrides,
    )
    .expect("resolve");

    assert_eq!(config.layout.table_alignment.as_deref(), Some("center"));
    assert_eq!(
        config.layout.cell_vertical_alignment.as_deref(),
        Some("bottom")
    );
    assert!(config.layout.word2010_compatible);
    assert!(config.layout.disable_table_autofit);
    assert!(config.layout.read_only_recommended);
    assert!(!config.layout.extra_section);
}

#[test]
fn okuzuke_accepts_sequence_form() {
    let config = Config::from_yaml_str(
        r#"
docx_coreprop:
  okuzuke:
    - Book Title
    - [Author, Someone]
"#,
        &Overrides::default(),
    )
    .expect("resolve");

    assert_eq!(
        config.okuzuke,
        Some(Okuzuke {
            rows: vec![
                vec!["Book Title".to_string()],
                vec!["Author".to_string(), "Someone".to_string()],
            ],
            table_style: None,
            para_style: None,
        })
    );
}

#[test]
fn okuzuke_accepts_mapping_form() {
    let config = Config::from_yaml_str(
        r#"
docx_coreprop:
  okuzuke:
    rows:
      - First edition
      - 2020
    table-style: Table Grid
    para-style: Normal
"#,
        &Overrides::default(),
    )
    .expect("resolve");

    let okuzuke = config.okuzuke.expect("okuzuke present");
    assert_eq!(
        okuzuke.rows,
        vec![vec!["First edition".to_string()], vec!["2020".to_string()]]
    );
    assert_eq!(okuzuke.table_style.as_deref(), Some("Table Grid"));
    assert_eq!(okuzuke.para_style.as_deref(), Some("Normal"));
}

#[test]
fn reports_all_validation_errors() {
    let err = Config::from_yaml_str(
        r#"
docx_coreprop:
  author: [not, scalar]
  paragraph: Heading 1
  word2010compatible: sometimes
  okuzuke: 42
"#,
        &Overrides::default(),
    )
    .expect_err("validation should fail");

    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.0.len(), 4);
            let rendered = errors.to_string();
            assert!(rendered.contains("author: expected a scalar value"));
            assert!(rendered.contains("paragraph: expected a mapping"));
            assert!(rendered.contains("word2010compatible: expected a boolean"));
            assert!(rendered.contains("okuzuke:"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("broken.yaml");
    write_file(&path, "docx_coreprop: [unterminated\n");

    let err = Config::load(LoadOptions::new(&path)).expect_err("parse should fail");
    match err {
        ConfigError::Parse { origin, .. } => assert!(origin.contains("broken.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("absent.yaml");

    let err = Config::load(LoadOptions::new(&path)).expect_err("load should fail");
    assert!(matches!(err, ConfigError::Io { .. }));
}
