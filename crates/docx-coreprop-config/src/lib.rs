//! Configuration loader for docx-coreprop-writer.
//!
//! Settings come from two layers: the `docx_coreprop` mapping of a YAML file
//! and the `key=value` overrides supplied on the command line. For every key
//! the override wins when it is present, the file value is used otherwise,
//! and a key missing from both stays unset. Parsed values are normalised into
//! typed structures so the mutators never touch raw YAML.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Top-level YAML key holding every setting this tool reads.
pub const ROOT_KEY: &str = "docx_coreprop";

pub const KEY_TABLE_ALIGNMENT: &str = "table-alignment-in-page";
pub const KEY_CELL_VERTICAL_ALIGNMENT: &str = "table-cell-vertical-alignment";
pub const KEY_WORD2010_COMPATIBLE: &str = "word2010compatible";
pub const KEY_DISABLE_TABLE_AUTOFIT: &str = "disable-table-autofit";
pub const KEY_READ_ONLY_RECOMMENDED: &str = "read-only-recommended";
pub const KEY_EXTRA_SECTION: &str = "extra_section";
pub const KEY_OKUZUKE: &str = "okuzuke";

/// Complete configuration resolved from the YAML file and overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub properties: CoreProperties,
    pub styles: StyleSettings,
    pub layout: LayoutSettings,
    pub okuzuke: Option<Okuzuke>,
    pub sources: ConfigSources,
}

/// Core document properties this tool knows how to write.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CoreProperty {
    Author,
    Category,
    Comments,
    ContentStatus,
    Created,
    Identifier,
    Keywords,
    Language,
    LastModifiedBy,
    LastPrinted,
    Modified,
    Revision,
    Subject,
    Title,
    Version,
}

/// Value shape expected for a core property.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyKind {
    Text,
    Date,
    Integer,
}

impl CoreProperty {
    pub const ALL: &'static [CoreProperty] = &[
        CoreProperty::Author,
        CoreProperty::Category,
        CoreProperty::Comments,
        CoreProperty::ContentStatus,
        CoreProperty::Created,
        CoreProperty::Identifier,
        CoreProperty::Keywords,
        CoreProperty::Language,
        CoreProperty::LastModifiedBy,
        CoreProperty::LastPrinted,
        CoreProperty::Modified,
        CoreProperty::Revision,
        CoreProperty::Subject,
        CoreProperty::Title,
        CoreProperty::Version,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CoreProperty::Author => "author",
            CoreProperty::Category => "category",
            CoreProperty::Comments => "comments",
            CoreProperty::ContentStatus => "content_status",
            CoreProperty::Created => "created",
            CoreProperty::Identifier => "identifier",
            CoreProperty::Keywords => "keywords",
            CoreProperty::Language => "language",
            CoreProperty::LastModifiedBy => "last_modified_by",
            CoreProperty::LastPrinted => "last_printed",
            CoreProperty::Modified => "modified",
            CoreProperty::Revision => "revision",
            CoreProperty::Subject => "subject",
            CoreProperty::Title => "title",
            CoreProperty::Version => "version",
        }
    }

    pub fn kind(self) -> PropertyKind {
        match self {
            CoreProperty::Created | CoreProperty::LastPrinted | CoreProperty::Modified => {
                PropertyKind::Date
            }
            CoreProperty::Revision => PropertyKind::Integer,
            _ => PropertyKind::Text,
        }
    }
}

impl fmt::Display for CoreProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoreProperty {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CoreProperty::ALL
            .iter()
            .copied()
            .find(|property| property.as_str() == value)
            .ok_or(())
    }
}

/// Resolved core property values; properties without a value are left alone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CoreProperties {
    values: BTreeMap<CoreProperty, String>,
}

impl CoreProperties {
    pub fn get(&self, property: CoreProperty) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Resolved values in the fixed application order.
    pub fn iter(&self) -> impl Iterator<Item = (CoreProperty, &str)> {
        self.values
            .iter()
            .map(|(property, value)| (*property, value.as_str()))
    }
}

/// Element scopes that carry a named style.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StyleScope {
    Paragraph,
    Table,
    Character,
}

impl StyleScope {
    pub const ALL: &'static [StyleScope] =
        &[StyleScope::Paragraph, StyleScope::Table, StyleScope::Character];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleScope::Paragraph => "paragraph",
            StyleScope::Table => "table",
            StyleScope::Character => "character",
        }
    }
}

impl fmt::Display for StyleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `old → new` style replacement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StyleMapping {
    pub from: String,
    pub to: String,
}

/// Style replacements per scope, in configuration order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StyleSettings {
    pub paragraph: Vec<StyleMapping>,
    pub table: Vec<StyleMapping>,
    pub character: Vec<StyleMapping>,
}

impl StyleSettings {
    pub fn for_scope(&self, scope: StyleScope) -> &[StyleMapping] {
        match scope {
            StyleScope::Paragraph => &self.paragraph,
            StyleScope::Table => &self.table,
            StyleScope::Character => &self.character,
        }
    }

    fn for_scope_mut(&mut self, scope: StyleScope) -> &mut Vec<StyleMapping> {
        match scope {
            StyleScope::Paragraph => &mut self.paragraph,
            StyleScope::Table => &mut self.table,
            StyleScope::Character => &mut self.character,
        }
    }
}

/// Single-purpose layout and settings flags.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LayoutSettings {
    /// Raw `table-alignment-in-page` keyword; validated when applied.
    pub table_alignment: Option<String>,
    /// Raw `table-cell-vertical-alignment` keyword; validated when applied.
    pub cell_vertical_alignment: Option<String>,
    pub disable_table_autofit: bool,
    pub word2010_compatible: bool,
    pub read_only_recommended: bool,
    pub extra_section: bool,
}

/// Trailing colophon table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Okuzuke {
    /// One entry per table row, one string per cell.
    pub rows: Vec<Vec<String>>,
    pub table_style: Option<String>,
    pub para_style: Option<String>,
}

/// Provenance information for resolved configuration.
#[derive(Clone, Debug, Default)]
pub struct ConfigSources {
    pub layers: Vec<ConfigSource>,
}

/// Specific layer of configuration (file or command-line overrides).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn for_file(path: PathBuf) -> Self {
        ConfigSource {
            kind: ConfigSourceKind::File,
            path: Some(path),
        }
    }

    fn inline() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::File,
            path: None,
        }
    }

    fn overrides() -> Self {
        ConfigSource {
            kind: ConfigSourceKind::Override,
            path: None,
        }
    }

    fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::File, Some(path)) => format!("config file {}", path.display()),
            (ConfigSourceKind::File, None) => "inline config".to_owned(),
            (ConfigSourceKind::Override, _) => "command-line override".to_owned(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    File,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::File => "config file",
            ConfigSourceKind::Override => "override",
        };
        f.write_str(label)
    }
}

/// Externally supplied `key=value` pairs, applied over the file layer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Overrides {
    pub metadata: Vec<(String, String)>,
    pub paragraph: Vec<(String, String)>,
    pub table: Vec<(String, String)>,
    pub character: Vec<(String, String)>,
}

impl Overrides {
    /// Splits `raw` at the first `=`. A pair without `=` has an empty value.
    pub fn parse_pair(raw: &str) -> (String, String) {
        match raw.split_once('=') {
            Some((key, value)) => (key.to_owned(), value.to_owned()),
            None => (raw.to_owned(), String::new()),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    pub fn with_style(
        mut self,
        scope: StyleScope,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.for_scope_mut(scope).push((from.into(), to.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
            && self.paragraph.is_empty()
            && self.table.is_empty()
            && self.character.is_empty()
    }

    fn for_scope(&self, scope: StyleScope) -> &[(String, String)] {
        match scope {
            StyleScope::Paragraph => &self.paragraph,
            StyleScope::Table => &self.table,
            StyleScope::Character => &self.character,
        }
    }

    fn for_scope_mut(&mut self, scope: StyleScope) -> &mut Vec<(String, String)> {
        match scope {
            StyleScope::Paragraph => &mut self.paragraph,
            StyleScope::Table => &mut self.table,
            StyleScope::Character => &mut self.character,
        }
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub input: PathBuf,
    pub overrides: Overrides,
}

impl LoadOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        LoadOptions {
            input: input.into(),
            overrides: Overrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_yaml::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

/// Every structural problem found while finalising configuration.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ConfigValidationError {
    pub source: Option<ConfigSource>,
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(source: Option<ConfigSource>, message: String) -> Self {
        ConfigValidationError {
            source,
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)?;
        } else {
            write!(f, "{}", self.message)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source.describe())?;
        }
        Ok(())
    }
}

impl Config {
    /// Reads the YAML file named by `options.input` and resolves it against the overrides.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&options.input).map_err(|source| ConfigError::Io {
            path: options.input.clone(),
            source,
        })?;
        let source = ConfigSource::for_file(options.input.clone());
        resolve(&contents, source, &options.overrides)
    }

    /// Resolves configuration from YAML text without touching the filesystem.
    pub fn from_yaml_str(contents: &str, overrides: &Overrides) -> Result<Self, ConfigError> {
        resolve(contents, ConfigSource::inline(), overrides)
    }
}

fn resolve(
    contents: &str,
    source: ConfigSource,
    overrides: &Overrides,
) -> Result<Config, ConfigError> {
    let mapping = parse_document(contents).map_err(|err| ConfigError::Parse {
        origin: source.describe(),
        source: err,
    })?;

    let mut merged = PartialConfig::from_mapping(mapping, source.clone());
    let mut layers = vec![source];

    if !overrides.is_empty() {
        let override_source = ConfigSource::overrides();
        merged.merge(PartialConfig::from_overrides(overrides, override_source.clone()));
        layers.push(override_source);
    }

    let resolved = merged.finalize().map_err(ConfigError::Validation)?;
    Ok(Config {
        properties: resolved.properties,
        styles: resolved.styles,
        layout: resolved.layout,
        okuzuke: resolved.okuzuke,
        sources: ConfigSources { layers },
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default)]
    docx_coreprop: Option<Value>,
}

fn parse_document(contents: &str) -> Result<Mapping, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let raw: Option<RawDocument> = serde_yaml::from_str(contents)?;
    Ok(match raw.and_then(|raw| raw.docx_coreprop) {
        Some(Value::Mapping(mapping)) => mapping,
        _ => Mapping::new(),
    })
}

#[derive(Clone, Debug)]
struct Located<T> {
    value: T,
    source: ConfigSource,
}

impl<T> Located<T> {
    fn new(value: T, source: ConfigSource) -> Self {
        Located { value, source }
    }
}

#[derive(Clone, Debug, Default)]
struct PartialConfig {
    values: BTreeMap<String, Located<Value>>,
    styles: StylesPartial,
}

#[derive(Clone, Debug, Default)]
struct StylesPartial {
    paragraph: Option<Located<Value>>,
    table: Option<Located<Value>>,
    character: Option<Located<Value>>,
    overrides: Vec<(StyleScope, Located<StyleMapping>)>,
}

impl StylesPartial {
    fn slot(&mut self, scope: StyleScope) -> &mut Option<Located<Value>> {
        match scope {
            StyleScope::Paragraph => &mut self.paragraph,
            StyleScope::Table => &mut self.table,
            StyleScope::Character => &mut self.character,
        }
    }

    fn merge(&mut self, mut other: StylesPartial) {
        for scope in StyleScope::ALL {
            if let Some(value) = other.slot(*scope).take() {
                *self.slot(*scope) = Some(value);
            }
        }
        self.overrides.extend(other.overrides);
    }
}

impl PartialConfig {
    fn from_mapping(mapping: Mapping, source: ConfigSource) -> Self {
        let mut partial = PartialConfig::default();
        for (key, value) in mapping {
            let Some(key) = key.as_str().map(str::to_owned) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            if let Some(scope) = StyleScope::ALL.iter().find(|scope| scope.as_str() == key) {
                *partial.styles.slot(*scope) = Some(Located::new(value, source.clone()));
            } else {
                partial.values.insert(key, Located::new(value, source.clone()));
            }
        }
        partial
    }

    fn from_overrides(overrides: &Overrides, source: ConfigSource) -> Self {
        let mut partial = PartialConfig::default();
        for (key, value) in &overrides.metadata {
            partial.values.insert(
                key.clone(),
                Located::new(Value::String(value.clone()), source.clone()),
            );
        }
        for scope in StyleScope::ALL {
            for (from, to) in overrides.for_scope(*scope) {
                let mapping = StyleMapping {
                    from: from.clone(),
                    to: to.clone(),
                };
                partial
                    .styles
                    .overrides
                    .push((*scope, Located::new(mapping, source.clone())));
            }
        }
        partial
    }

    fn merge(&mut self, other: PartialConfig) {
        for (key, value) in other.values {
            self.values.insert(key, value);
        }
        self.styles.merge(other.styles);
    }

    fn finalize(self) -> Result<ResolvedConfig, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let mut properties = CoreProperties::default();
        for property in CoreProperty::ALL {
            if let Some(located) = self.values.get(property.as_str()) {
                if let Some(text) = scalar_text(located, property.as_str(), &mut errors) {
                    properties.values.insert(*property, text);
                }
            }
        }

        let styles = finalize_styles(self.styles, &mut errors);

        let layout = LayoutSettings {
            table_alignment: self
                .values
                .get(KEY_TABLE_ALIGNMENT)
                .and_then(|located| scalar_text(located, KEY_TABLE_ALIGNMENT, &mut errors)),
            cell_vertical_alignment: self.values.get(KEY_CELL_VERTICAL_ALIGNMENT).and_then(
                |located| scalar_text(located, KEY_CELL_VERTICAL_ALIGNMENT, &mut errors),
            ),
            disable_table_autofit: flag(&self.values, KEY_DISABLE_TABLE_AUTOFIT, &mut errors),
            word2010_compatible: flag(&self.values, KEY_WORD2010_COMPATIBLE, &mut errors),
            read_only_recommended: flag(&self.values, KEY_READ_ONLY_RECOMMENDED, &mut errors),
            extra_section: flag(&self.values, KEY_EXTRA_SECTION, &mut errors),
        };

        let okuzuke = self
            .values
            .get(KEY_OKUZUKE)
            .and_then(|located| parse_okuzuke(located, &mut errors));

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(ResolvedConfig {
            properties,
            styles,
            layout,
            okuzuke,
        })
    }
}

struct ResolvedConfig {
    properties: CoreProperties,
    styles: StyleSettings,
    layout: LayoutSettings,
    okuzuke: Option<Okuzuke>,
}

fn finalize_styles(
    partial: StylesPartial,
    errors: &mut Vec<ConfigValidationError>,
) -> StyleSettings {
    let mut styles = StyleSettings::default();

    let file_scopes = [
        (StyleScope::Paragraph, partial.paragraph),
        (StyleScope::Table, partial.table),
        (StyleScope::Character, partial.character),
    ];
    for (scope, located) in file_scopes {
        let Some(Located { value, source }) = located else {
            continue;
        };
        let Value::Mapping(mapping) = value else {
            errors.push(
                ConfigValidationError::new(
                    Some(source),
                    "expected a mapping of old style name to new style name".into(),
                )
                .with_context(scope.as_str()),
            );
            continue;
        };
        let target = styles.for_scope_mut(scope);
        for (from, to) in mapping {
            match (value_text(&from), value_text(&to)) {
                (Some(from), Some(to)) => target.push(StyleMapping { from, to }),
                _ => errors.push(
                    ConfigValidationError::new(
                        Some(source.clone()),
                        "style names must be scalars".into(),
                    )
                    .with_context(scope.as_str()),
                ),
            }
        }
    }

    // A scope named on the command line replaces the file's mapping wholesale.
    for &scope in StyleScope::ALL {
        if partial.overrides.iter().any(|(overridden, _)| *overridden == scope) {
            styles.for_scope_mut(scope).clear();
        }
    }
    for (scope, located) in partial.overrides {
        let target = styles.for_scope_mut(scope);
        match target
            .iter_mut()
            .find(|existing| existing.from == located.value.from)
        {
            Some(existing) => existing.to = located.value.to,
            None => target.push(located.value),
        }
    }

    styles
}

fn scalar_text(
    located: &Located<Value>,
    key: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> Option<String> {
    match value_text(&located.value) {
        Some(text) => Some(text),
        None => {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    "expected a scalar value".into(),
                )
                .with_context(key),
            );
            None
        }
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Tagged(tagged) => value_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn flag(
    values: &BTreeMap<String, Located<Value>>,
    key: &str,
    errors: &mut Vec<ConfigValidationError>,
) -> bool {
    let Some(located) = values.get(key) else {
        return false;
    };
    match &located.value {
        Value::Bool(flag) => *flag,
        Value::String(text) => match parse_flag(text) {
            Some(flag) => flag,
            None => {
                errors.push(
                    ConfigValidationError::new(
                        Some(located.source.clone()),
                        format!("expected a boolean (received '{text}')"),
                    )
                    .with_context(key),
                );
                false
            }
        },
        Value::Number(number) if number.as_u64() == Some(0) => false,
        Value::Number(number) if number.as_u64() == Some(1) => true,
        _ => {
            errors.push(
                ConfigValidationError::new(
                    Some(located.source.clone()),
                    "expected a boolean".into(),
                )
                .with_context(key),
            );
            false
        }
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_okuzuke(
    located: &Located<Value>,
    errors: &mut Vec<ConfigValidationError>,
) -> Option<Okuzuke> {
    let invalid = |message: &str| {
        ConfigValidationError::new(Some(located.source.clone()), message.to_owned())
            .with_context(KEY_OKUZUKE)
    };

    let (rows, table_style, para_style) = match &located.value {
        Value::Sequence(rows) => (rows.clone(), None, None),
        Value::Mapping(mapping) => {
            let rows = match mapping.get("rows") {
                Some(Value::Sequence(rows)) => rows.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(_) => {
                    errors.push(invalid("rows must be a sequence"));
                    return None;
                }
            };
            let mut style = |key: &str| match mapping.get(key) {
                None | Some(Value::Null) => None,
                Some(value) => {
                    let text = value_text(value);
                    if text.is_none() {
                        errors.push(invalid(&format!("{key} must be a style name")));
                    }
                    text
                }
            };
            let table_style = style("table-style");
            let para_style = style("para-style");
            (rows, table_style, para_style)
        }
        _ => {
            errors.push(invalid("expected a sequence of rows or a mapping with rows"));
            return None;
        }
    };

    let mut parsed = Vec::with_capacity(rows.len());
    for row in &rows {
        match row {
            Value::Sequence(cells) => {
                let cells: Option<Vec<String>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Value::Null => Some(String::new()),
                        other => value_text(other),
                    })
                    .collect();
                match cells {
                    Some(cells) => parsed.push(cells),
                    None => errors.push(invalid("row cells must be scalars")),
                }
            }
            Value::Null => parsed.push(vec![String::new()]),
            other => match value_text(other) {
                Some(text) => parsed.push(vec![text]),
                None => errors.push(invalid("rows must be scalars or sequences of scalars")),
            },
        }
    }

    Some(Okuzuke {
        rows: parsed,
        table_style,
        para_style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_splits_on_first_equals() {
        assert_eq!(
            Overrides::parse_pair("title=a=b"),
            ("title".to_string(), "a=b".to_string())
        );
        assert_eq!(
            Overrides::parse_pair("author"),
            ("author".to_string(), String::new())
        );
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("Yes"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn property_names_round_trip() {
        for property in CoreProperty::ALL {
            assert_eq!(property.as_str().parse::<CoreProperty>(), Ok(*property));
        }
        assert!("creator".parse::<CoreProperty>().is_err());
    }

    #[test]
    fn missing_root_key_resolves_to_nothing() {
        let config = Config::from_yaml_str("other: {author: x}\n", &Overrides::default())
            .expect("resolve");
        assert!(config.properties.is_empty());
        assert!(config.okuzuke.is_none());
        assert_eq!(config.layout, LayoutSettings::default());
    }
}
