use std::fmt;
use std::path::PathBuf;

use docx_coreprop_config::{Config, StyleScope};
use docx_coreprop_package::Document;
use tracing::debug;

use crate::error::ApplyResult;
use crate::layout::{self, ResolvedLayout};
use crate::okuzuke::append_okuzuke;
use crate::properties::apply_properties;
use crate::styles::replace_styles;

#[derive(Debug, Clone)]
pub struct ApplyRequest {
    /// Document edited in place.
    pub path: PathBuf,
    pub config: Config,
}

impl ApplyRequest {
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        ApplyRequest {
            path: path.into(),
            config,
        }
    }
}

/// Mutators in the order the engine runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Properties,
    ParagraphStyles,
    TableStyles,
    CharacterStyles,
    TableAlignment,
    CellVerticalAlignment,
    TableAutofit,
    Word2010Compatibility,
    ReadOnlyRecommended,
    ExtraSection,
    Okuzuke,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Properties => "properties",
            Step::ParagraphStyles => "paragraph styles",
            Step::TableStyles => "table styles",
            Step::CharacterStyles => "character styles",
            Step::TableAlignment => "table alignment",
            Step::CellVerticalAlignment => "cell vertical alignment",
            Step::TableAutofit => "table autofit",
            Step::Word2010Compatibility => "word 2010 compatibility",
            Step::ReadOnlyRecommended => "read-only recommended",
            Step::ExtraSection => "extra section",
            Step::Okuzuke => "okuzuke",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedStep {
    pub step: Step,
    /// Elements (properties, tables, cells, rows, ...) the step changed.
    pub touched: usize,
}

#[derive(Debug, Default)]
pub struct ApplyOutcome {
    pub steps: Vec<AppliedStep>,
}

impl ApplyOutcome {
    pub fn ran(&self, step: Step) -> bool {
        self.steps.iter().any(|applied| applied.step == step)
    }

    pub fn touched(&self, step: Step) -> usize {
        self.steps
            .iter()
            .filter(|applied| applied.step == step)
            .map(|applied| applied.touched)
            .sum()
    }

    fn record(&mut self, step: Step, touched: usize) {
        self.steps.push(AppliedStep { step, touched });
    }
}

/// Loads the document, runs every configured mutator in fixed order and
/// saves once. Nothing is written when a step fails.
pub fn apply(request: ApplyRequest) -> ApplyResult<ApplyOutcome> {
    let config = &request.config;
    let resolved = ResolvedLayout::resolve(&config.layout)?;
    let mut document = Document::open(&request.path)?;
    let mut outcome = ApplyOutcome::default();

    if config.properties.is_empty() {
        skipped(Step::Properties);
    } else {
        let touched = apply_properties(&mut document, &config.properties)?;
        outcome.record(Step::Properties, touched);
    }

    for (scope, step) in [
        (StyleScope::Paragraph, Step::ParagraphStyles),
        (StyleScope::Table, Step::TableStyles),
        (StyleScope::Character, Step::CharacterStyles),
    ] {
        let mappings = config.styles.for_scope(scope);
        if mappings.is_empty() {
            skipped(step);
            continue;
        }
        let touched = replace_styles(&mut document, scope, mappings)?;
        outcome.record(step, touched);
    }

    match resolved.table_alignment {
        Some(alignment) => {
            let touched = layout::align_tables(&mut document, alignment);
            outcome.record(Step::TableAlignment, touched);
        }
        None => skipped(Step::TableAlignment),
    }
    match resolved.cell_vertical_alignment {
        Some(alignment) => {
            let touched = layout::align_cells(&mut document, alignment);
            outcome.record(Step::CellVerticalAlignment, touched);
        }
        None => skipped(Step::CellVerticalAlignment),
    }
    if config.layout.disable_table_autofit {
        let touched = layout::disable_autofit(&mut document);
        outcome.record(Step::TableAutofit, touched);
    } else {
        skipped(Step::TableAutofit);
    }
    if config.layout.word2010_compatible {
        layout::set_word2010_compatible(&mut document)?;
        outcome.record(Step::Word2010Compatibility, 1);
    } else {
        skipped(Step::Word2010Compatibility);
    }
    if config.layout.read_only_recommended {
        layout::set_read_only_recommended(&mut document)?;
        outcome.record(Step::ReadOnlyRecommended, 1);
    } else {
        skipped(Step::ReadOnlyRecommended);
    }
    if config.layout.extra_section {
        layout::add_extra_section(&mut document)?;
        outcome.record(Step::ExtraSection, 1);
    } else {
        skipped(Step::ExtraSection);
    }
    match &config.okuzuke {
        Some(okuzuke) => {
            let touched = append_okuzuke(&mut document, okuzuke)?;
            outcome.record(Step::Okuzuke, touched);
        }
        None => skipped(Step::Okuzuke),
    }

    document.save(&request.path)?;
    debug!(steps = outcome.steps.len(), "document saved");
    Ok(outcome)
}

fn skipped(step: Step) {
    debug!(step = %step, "skipped");
}
