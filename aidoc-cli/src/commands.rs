//! Subcommand bodies. Each returns its output instead of printing so the
//! binary stays a thin dispatcher.

use crate::render;
use aidoc_core::{AiDocument, AidocConfig, AidocError, FieldMap, SchemaRegistry, ValidationReport};
use aidoc_guard::{example_candidate, Validated, Validator};
use anyhow::{bail, Context};
use clap::ValueEnum;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Registry export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Markdown,
}

/// Result of validating a candidate file.
#[derive(Debug)]
pub enum Outcome {
    Accepted(Validated),
    Rejected(ValidationReport),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// Accepted record as pretty JSON, or the violation listing.
    pub fn render(&self) -> anyhow::Result<String> {
        match self {
            Outcome::Accepted(validated) => {
                let mut out = serde_json::to_string_pretty(&validated.record)?;
                out.push('\n');
                Ok(out)
            }
            Outcome::Rejected(report) => Ok(render::render_report(report)),
        }
    }
}

pub fn info(config: &AidocConfig) -> String {
    render::render_info(SchemaRegistry::standard(), config)
}

pub fn export(config: &AidocConfig, format: ExportFormat) -> anyhow::Result<String> {
    let registry = SchemaRegistry::standard();
    match format {
        ExportFormat::Json => {
            let mut out = render::render_json(registry, config)?;
            out.push('\n');
            Ok(out)
        }
        ExportFormat::Markdown => Ok(render::render_markdown(registry, config)),
    }
}

/// Placeholder embedding of `dimensions` components.
pub fn example_vector(dimensions: usize) -> Vec<f32> {
    vec![0.1; dimensions]
}

/// Build and validate the sample insert. `dims` overrides the configured
/// vector dimension and attaches a vector of that size; zero attaches none.
pub fn example(
    mut config: AidocConfig,
    user: &str,
    document: &str,
    chunk_text: &str,
    dims: Option<usize>,
) -> anyhow::Result<Validated> {
    let dims = dims.filter(|d| *d > 0);
    if let Some(d) = dims {
        config.vector_dimensions = d;
    }
    let vector = dims.map(example_vector);
    let candidate = example_candidate(user, document, chunk_text, vector.as_deref());
    let validator = Validator::with_system_sources(config)?;
    validator
        .validate_insert(&candidate)
        .context("sample candidate rejected")
}

/// Read a JSON object from disk as a field map.
pub fn read_field_map(path: &Path) -> anyhow::Result<FieldMap> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!(
            "{} must contain a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

/// Read a previously accepted record from disk.
pub fn read_document(path: &Path) -> anyhow::Result<AiDocument> {
    let map = read_field_map(path)?;
    AiDocument::from_field_map(map).with_context(|| format!("decoding {}", path.display()))
}

/// Validate `candidate` as an insert, or as an update of `previous`.
pub fn validate_files(
    validator: &Validator,
    candidate: &Path,
    previous: Option<&Path>,
) -> anyhow::Result<Outcome> {
    let candidate_map = read_field_map(candidate)?;
    let result = match previous {
        Some(path) => {
            let previous = read_document(path)?;
            validator.validate_update(&previous, &candidate_map)
        }
        None => validator.validate_insert(&candidate_map),
    };

    match result {
        Ok(validated) => {
            info!(
                uuid = %validated.record.uuid,
                warnings = validated.warnings.len(),
                "candidate accepted"
            );
            Ok(Outcome::Accepted(validated))
        }
        Err(AidocError::Rejected(report)) => {
            warn!(violations = report.violations.len(), "candidate rejected");
            Ok(Outcome::Rejected(report))
        }
        Err(other) => Err(other.into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
