//! Validation issue types shared by the validator, the lifecycle manager and
//! storage callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Advisory - the record may be persisted, the caller should log it
    Warning,
    /// Blocking - the operation must not proceed
    Error,
}

/// What went wrong with a field or a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    UnknownField,
    MissingRequiredField,
    TypeMismatch,
    InvalidEnumValue,
    OutOfRange,
    VectorDimensionMismatch,
    EmptyChunkWithNumber,
    ImmutableFieldChanged,
    NonMonotonicTimestamp,
    MissingLegalBasis,
    InvalidTransition,
    PrematureDeletion,
    IncompleteRedaction,
    RecordIsDeleted,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single violation found while validating a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Contract name of the offending field
    pub field: String,
    pub kind: ViolationKind,
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Violation {
    /// A blocking violation.
    pub fn error(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// An advisory violation.
    pub fn warning(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.kind, self.message)
    }
}

/// Ordered collection of violations for one candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether validation passed (no blocking violations)
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Create a valid report with no violations.
    pub fn valid() -> Self {
        Self {
            valid: true,
            violations: Vec::new(),
        }
    }

    /// Add a violation, preserving insertion order.
    pub fn add(&mut self, violation: Violation) {
        if violation.is_blocking() {
            self.valid = false;
        }
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        for v in violations {
            self.add(v);
        }
    }

    /// Check if there are any blocking violations.
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(Violation::is_blocking)
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Advisory violations only.
    pub fn warnings(&self) -> Vec<&Violation> {
        self.violations.iter().filter(|v| !v.is_blocking()).collect()
    }

    /// Get all violations of a specific kind.
    pub fn of_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }

    /// Check for a violation of `kind` on `field`.
    pub fn contains(&self, field: &str, kind: ViolationKind) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocking = self.violations.iter().filter(|v| v.is_blocking()).count();
        write!(f, "{} violation(s), {} blocking", self.violations.len(), blocking)?;
        for v in &self.violations {
            write!(f, "; {v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_keeps_report_valid() {
        let mut report = ValidationReport::valid();
        report.add(Violation::warning(
            "legalBasis",
            ViolationKind::MissingLegalBasis,
            "PII without legal basis",
        ));
        assert!(report.valid);
        assert!(!report.has_errors());
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn test_error_invalidates_report_and_keeps_order() {
        let mut report = ValidationReport::valid();
        report.add(Violation::error("riskLevel", ViolationKind::InvalidEnumValue, "bad"));
        report.add(Violation::error("qualityScore", ViolationKind::OutOfRange, "bad"));
        assert!(!report.valid);
        assert_eq!(report.violations[0].field, "riskLevel");
        assert_eq!(report.violations[1].field, "qualityScore");
        assert!(report.contains("qualityScore", ViolationKind::OutOfRange));
        assert!(!report.contains("qualityScore", ViolationKind::TypeMismatch));
        assert_eq!(report.of_kind(ViolationKind::InvalidEnumValue).len(), 1);
    }

    #[test]
    fn test_display() {
        let mut report = ValidationReport::valid();
        report.add(Violation::error("chunkText", ViolationKind::IncompleteRedaction, "must be null"));
        let msg = report.to_string();
        assert!(msg.contains("1 blocking"));
        assert!(msg.contains("chunkText [IncompleteRedaction]"));
    }
}
