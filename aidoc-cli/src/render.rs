//! Text renderings of the field registry and of validation outcomes.

use aidoc_core::{AidocConfig, FieldDefault, FieldSpec, SchemaRegistry, ValidationReport};
use serde_json::json;
use std::fmt::Write;

/// Schema summary: totals, per-group counts, then every field in order.
pub fn render_info(registry: &SchemaRegistry, config: &AidocConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AI document schema v{}", config.schema_version);
    let _ = writeln!(out, "Total fields: {}", registry.len());
    let _ = writeln!(out, "Vector dimensions: {}", config.vector_dimensions);
    let _ = writeln!(out, "Legal basis policy: {}", config.legal_basis_policy);
    let _ = writeln!(out);

    let _ = writeln!(out, "Field groups:");
    for (group, count) in registry.group_counts() {
        let _ = writeln!(out, "  {:<36} {:>3}", group.label(), count);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Fields:");
    for spec in registry.all_fields() {
        let _ = writeln!(
            out,
            "  {:<32} {:<36} {:<8} {}",
            spec.name,
            spec.column,
            if spec.required { "required" } else { "optional" },
            spec.field_type
        );
    }
    out
}

/// Markdown reference table, one section per group.
pub fn render_markdown(registry: &SchemaRegistry, config: &AidocConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# AI Document Schema (v{})", config.schema_version);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} fields. Vector columns hold {} dimensions.",
        registry.len(),
        config.vector_dimensions
    );

    for (group, count) in registry.group_counts() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {} ({})", group.label(), count);
        let _ = writeln!(out);
        let _ = writeln!(out, "| Field | Column | Type | Required | Default | Range | Notes |");
        let _ = writeln!(out, "|---|---|---|---|---|---|---|");
        for spec in registry.fields_in_group(group) {
            let _ = writeln!(out, "{}", markdown_row(spec));
        }
    }
    out
}

fn markdown_row(spec: &FieldSpec) -> String {
    let default = spec.default.map(describe_default).unwrap_or_default();
    let range = spec
        .range
        .map(|r| format!("{} ..= {}", r.min, r.max))
        .unwrap_or_default();
    let mut notes = Vec::new();
    if spec.immutable {
        notes.push("immutable");
    }
    if spec.redact_on_delete {
        notes.push("nulled on delete");
    }
    format!(
        "| `{}` | `{}` | {} | {} | {} | {} | {} |",
        spec.name,
        spec.column,
        spec.field_type.to_string().replace('|', "\\|"),
        if spec.required { "yes" } else { "no" },
        default,
        range,
        notes.join(", ")
    )
}

fn describe_default(default: FieldDefault) -> String {
    match default {
        FieldDefault::Text(s) => format!("`{s}`"),
        FieldDefault::Bool(b) => format!("`{b}`"),
        FieldDefault::SchemaVersion => "schema version".to_string(),
        FieldDefault::GeneratedUuid => "generated UUID".to_string(),
        FieldDefault::CurrentTime => "current time".to_string(),
    }
}

/// Machine-readable registry export.
pub fn render_json(registry: &SchemaRegistry, config: &AidocConfig) -> serde_json::Result<String> {
    let doc = json!({
        "schemaVersion": config.schema_version,
        "vectorDimensions": config.vector_dimensions,
        "fieldCount": registry.len(),
        "fields": registry.all_fields(),
    });
    serde_json::to_string_pretty(&doc)
}

/// One line per violation, blocking ones first.
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    let errors = report.violations.iter().filter(|v| v.is_blocking());
    let warnings = report.violations.iter().filter(|v| !v.is_blocking());
    for v in errors {
        let _ = writeln!(out, "error   {v}");
    }
    for v in warnings {
        let _ = writeln!(out, "warning {v}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aidoc_core::{Violation, ViolationKind};

    fn registry() -> &'static SchemaRegistry {
        SchemaRegistry::standard()
    }

    #[test]
    fn test_info_lists_every_field_in_order() {
        let out = render_info(registry(), &AidocConfig::default());
        assert!(out.contains(&format!("Total fields: {}", registry().len())));
        let first = registry().all_fields()[0].name;
        let last = registry().all_fields()[registry().len() - 1].name;
        let first_at = out.find(&format!("  {first} ")).unwrap();
        let last_at = out.find(&format!("  {last} ")).unwrap();
        assert!(first_at < last_at);
    }

    #[test]
    fn test_markdown_escapes_enum_pipes() {
        let out = render_markdown(registry(), &AidocConfig::default());
        assert!(out.contains("## Core Identity & Audit"));
        assert!(out.contains("`riskLevel`"));
        assert!(out.contains("Low\\|Medium"));
        let rows = out.lines().filter(|l| l.starts_with("| `")).count();
        assert_eq!(rows, registry().len());
    }

    #[test]
    fn test_json_export_parses_back() {
        let text = render_json(registry(), &AidocConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["fieldCount"], registry().len());
        assert_eq!(value["fields"].as_array().unwrap().len(), registry().len());
        assert_eq!(value["fields"][0]["name"], registry().all_fields()[0].name);
    }

    #[test]
    fn test_report_puts_errors_first() {
        let mut report = ValidationReport::valid();
        report.add(Violation::warning(
            "legalBasis",
            ViolationKind::MissingLegalBasis,
            "no legal basis",
        ));
        report.add(Violation::error(
            "riskLevel",
            ViolationKind::InvalidEnumValue,
            "not allowed",
        ));
        let out = render_report(&report);
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("error   riskLevel [InvalidEnumValue]"));
        assert!(lines[1].starts_with("warning legalBasis [MissingLegalBasis]"));
    }
}
