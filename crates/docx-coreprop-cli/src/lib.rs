use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use docx_coreprop_config::{Config, LoadOptions, Overrides};
use docx_coreprop_core::{apply, ApplyRequest};
use tracing::info;

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    run_with(Cli::parse())
}

pub fn run_with(cli: Cli) -> Result<i32> {
    let overrides = cli.overrides();
    let options = LoadOptions::new(&cli.input).with_overrides(overrides);
    let config = Config::load(options)
        .with_context(|| format!("failed to load configuration {}", cli.input.display()))?;

    apply(ApplyRequest::new(&cli.output, config))
        .with_context(|| format!("failed to update {}", cli.output.display()))?;

    info!("{} processed", cli.output.display());
    Ok(0)
}

/// Writes core properties, styles and layout settings into a docx file.
#[derive(Debug, Parser)]
#[command(name = "docx-coreprop-writer", version, about)]
pub struct Cli {
    /// YAML configuration; settings live under the `docx_coreprop` key.
    #[arg(short = 'I', long, value_name = "YAML")]
    pub input: PathBuf,

    /// Document to edit in place.
    #[arg(short = 'O', long, value_name = "DOCX")]
    pub output: PathBuf,

    /// Overrides a configuration key (repeatable).
    #[arg(short = 'M', long, value_name = "KEY=VALUE", action = ArgAction::Append)]
    pub metadata: Vec<String>,

    /// Replaces paragraph style OLD with NEW (repeatable).
    #[arg(short = 'P', long, value_name = "OLD=NEW", action = ArgAction::Append)]
    pub paragraph: Vec<String>,

    /// Replaces table style OLD with NEW (repeatable).
    #[arg(short = 'T', long, value_name = "OLD=NEW", action = ArgAction::Append)]
    pub table: Vec<String>,

    /// Replaces character style OLD with NEW (repeatable).
    #[arg(short = 'C', long, value_name = "OLD=NEW", action = ArgAction::Append)]
    pub character: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let pairs = |raw: &[String]| -> Vec<(String, String)> {
            raw.iter().map(|pair| Overrides::parse_pair(pair)).collect()
        };
        Overrides {
            metadata: pairs(&self.metadata),
            paragraph: pairs(&self.paragraph),
            table: pairs(&self.table),
            character: pairs(&self.character),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_repeated_pairs() {
        let cli = Cli::try_parse_from([
            "docx-coreprop-writer",
            "-I",
            "meta.yaml",
            "-O",
            "doc.docx",
            "-M",
            "author=A=B",
            "--metadata",
            "title",
            "-P",
            "Heading 1=Title",
            "-C",
            "Emphasis=Strong",
        ])
        .expect("parse");

        let overrides = cli.overrides();
        assert_eq!(
            overrides.metadata,
            vec![
                ("author".to_string(), "A=B".to_string()),
                ("title".to_string(), String::new()),
            ]
        );
        assert_eq!(
            overrides.paragraph,
            vec![("Heading 1".to_string(), "Title".to_string())]
        );
        assert!(overrides.table.is_empty());
        assert_eq!(overrides.character.len(), 1);
    }

    #[test]
    fn input_and_output_are_required() {
        assert!(Cli::try_parse_from(["docx-coreprop-writer", "-I", "meta.yaml"]).is_err());
    }
}
