//! Enum types for AI document records
//!
//! Every enumerated column accepts an exact, case-sensitive set of storage
//! strings. The sets below are the single source of truth for the registry.

use thiserror::Error;

/// Error when parsing a string that is not a member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value '{value}' for {field}")]
pub struct EnumParseError {
    /// Contract name of the enumerated field.
    pub field: &'static str,
    /// The offending input.
    pub value: String,
}

// ============================================================================
// PRIVACY & PII
// ============================================================================

db_enum! {
    /// How PII was detected in the chunk.
    pub enum PiiDetectionMethod("piiDetectionMethod") {
        Automated => "automated",
        Manual => "manual",
        Both => "both",
        NotDetected => "not_detected",
    }
}

db_enum! {
    /// Sensitive data classification.
    pub enum Sensitivity("sensitivity") {
        None => "None",
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

db_enum! {
    /// GDPR Article 6 ground for processing personal data.
    pub enum LegalBasis("legalBasis") {
        Consent => "Consent",
        Contract => "Contract",
        LegalObligation => "LegalObligation",
        VitalInterests => "VitalInterests",
        PublicTask => "PublicTask",
        LegitimateInterests => "LegitimateInterests",
    }
}

db_enum! {
    /// Progress of the deletion workflow.
    ///
    /// # State Transition Diagram
    ///
    /// ```text
    /// Pending          ──→ Scheduled | Retained | AwaitingApproval
    /// AwaitingApproval ──→ Scheduled | Retained | Pending
    /// Scheduled        ──→ Deleted   | Retained | Pending
    /// Deleted, Retained     (terminal)
    /// ```
    pub enum DeletionStatus("deletionStatus") {
        Pending => "Pending",
        Scheduled => "Scheduled",
        Deleted => "Deleted",
        Retained => "Retained",
        AwaitingApproval => "AwaitingApproval",
    }
}

impl DeletionStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeletionStatus::Deleted | DeletionStatus::Retained)
    }

    /// States reachable in one step from this one.
    pub fn successors(&self) -> &'static [DeletionStatus] {
        match self {
            DeletionStatus::Pending => &[
                DeletionStatus::Scheduled,
                DeletionStatus::Retained,
                DeletionStatus::AwaitingApproval,
            ],
            DeletionStatus::AwaitingApproval => &[
                DeletionStatus::Scheduled,
                DeletionStatus::Retained,
                DeletionStatus::Pending,
            ],
            DeletionStatus::Scheduled => &[
                DeletionStatus::Deleted,
                DeletionStatus::Retained,
                DeletionStatus::Pending,
            ],
            DeletionStatus::Deleted | DeletionStatus::Retained => &[],
        }
    }

    /// Check whether moving from `self` to `next` is allowed.
    /// Staying in the same state is not a transition and always allowed.
    pub fn can_transition_to(&self, next: DeletionStatus) -> bool {
        *self == next || self.successors().contains(&next)
    }
}

db_enum! {
    /// Anonymization applied to the chunk.
    pub enum AnonymizationStatus("anonymizationStatus") {
        NotAnonymized => "NotAnonymized",
        Pseudonymized => "Pseudonymized",
        FullyAnonymized => "FullyAnonymized",
    }
}

// ============================================================================
// GOVERNANCE & LINEAGE
// ============================================================================

db_enum! {
    /// Which dataset the record belongs to.
    pub enum DatasetType("datasetType") {
        Training => "Training",
        Validation => "Validation",
        Testing => "Testing",
        Production => "Production",
        KnowledgeBase => "KnowledgeBase",
        Archive => "Archive",
    }
}

db_enum! {
    /// Data validation workflow status.
    pub enum ValidationStatus("validationStatus") {
        Pending => "Pending",
        Validated => "Validated",
        Failed => "Failed",
        NeedsReview => "NeedsReview",
        InProgress => "InProgress",
    }
}

db_enum! {
    /// Where the source document originally came from.
    pub enum OriginalSourceType("originalSourceType") {
        Web => "Web",
        Database => "Database",
        Api => "API",
        FileSystem => "FileSystem",
        Manual => "Manual",
        Email => "Email",
        S3 => "S3",
        SharePoint => "SharePoint",
        Other => "Other",
    }
}

// ============================================================================
// LEGAL, RISK, ACCESS
// ============================================================================

db_enum! {
    /// Copyright status of the source.
    pub enum CopyrightStatus("copyrightStatus") {
        PublicDomain => "PublicDomain",
        Copyrighted => "Copyrighted",
        CreativeCommons => "CreativeCommons",
        Unknown => "Unknown",
        ProprietaryInternal => "ProprietaryInternal",
    }
}

db_enum! {
    /// Assessed risk level (NIST AI RMF).
    pub enum RiskLevel("riskLevel") {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
        Unassessed => "Unassessed",
    }
}

db_enum! {
    /// Content moderation outcome.
    pub enum ContentSafetyStatus("contentSafetyStatus") {
        Safe => "Safe",
        Flagged => "Flagged",
        Unsafe => "Unsafe",
        UnderReview => "UnderReview",
        NotAssessed => "NotAssessed",
    }
}

db_enum! {
    /// Access control level.
    pub enum AccessLevel("accessLevel") {
        Public => "Public",
        Internal => "Internal",
        Confidential => "Confidential",
        Restricted => "Restricted",
        Classified => "Classified",
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Internal
    }
}

// ============================================================================
// LIFECYCLE
// ============================================================================

db_enum! {
    /// Lifecycle status of the document. `Deleted` is terminal.
    pub enum DocumentStatus("documentStatus") {
        Draft => "Draft",
        Active => "Active",
        Deprecated => "Deprecated",
        Archived => "Archived",
        Deleted => "Deleted",
        UnderReview => "UnderReview",
    }
}

impl DocumentStatus {
    /// Check if the document has been retired.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocumentStatus::Deleted)
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Active
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deletion_status_roundtrip() {
        for status in DeletionStatus::ALL {
            let parsed = DeletionStatus::from_db_str(status.as_db_str()).unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn test_from_db_str_is_case_sensitive() {
        assert!(RiskLevel::from_db_str("Low").is_ok());
        assert!(RiskLevel::from_db_str("low").is_err());
        assert!(PiiDetectionMethod::from_db_str("Automated").is_err());
        assert_eq!(
            PiiDetectionMethod::from_str("not_detected").unwrap(),
            PiiDetectionMethod::NotDetected
        );
    }

    #[test]
    fn test_parse_error_names_field() {
        let err = RiskLevel::from_db_str("Severe").unwrap_err();
        assert_eq!(err.field, "riskLevel");
        assert_eq!(err.value, "Severe");
        assert!(err.to_string().contains("Severe"));
    }

    #[test]
    fn test_serde_uses_db_strings() {
        let json = serde_json::to_string(&OriginalSourceType::Api).unwrap();
        assert_eq!(json, "\"API\"");
        let parsed: OriginalSourceType = serde_json::from_str("\"S3\"").unwrap();
        assert_eq!(parsed, OriginalSourceType::S3);
    }

    #[test]
    fn test_allowed_set_sizes() {
        assert_eq!(PiiDetectionMethod::ALLOWED.len(), 4);
        assert_eq!(Sensitivity::ALLOWED.len(), 5);
        assert_eq!(LegalBasis::ALLOWED.len(), 6);
        assert_eq!(DeletionStatus::ALLOWED.len(), 5);
        assert_eq!(AnonymizationStatus::ALLOWED.len(), 3);
        assert_eq!(DatasetType::ALLOWED.len(), 6);
        assert_eq!(ValidationStatus::ALLOWED.len(), 5);
        assert_eq!(OriginalSourceType::ALLOWED.len(), 9);
        assert_eq!(CopyrightStatus::ALLOWED.len(), 5);
        assert_eq!(RiskLevel::ALLOWED.len(), 5);
        assert_eq!(ContentSafetyStatus::ALLOWED.len(), 5);
        assert_eq!(AccessLevel::ALLOWED.len(), 5);
        assert_eq!(DocumentStatus::ALLOWED.len(), 6);
    }

    #[test]
    fn test_deletion_transitions() {
        use DeletionStatus::*;
        assert!(Pending.can_transition_to(Scheduled));
        assert!(Pending.can_transition_to(AwaitingApproval));
        assert!(!Pending.can_transition_to(Deleted));
        assert!(AwaitingApproval.can_transition_to(Pending));
        assert!(!AwaitingApproval.can_transition_to(Deleted));
        assert!(Scheduled.can_transition_to(Deleted));
        assert!(Scheduled.can_transition_to(Pending));
        assert!(!Deleted.can_transition_to(Pending));
        assert!(!Retained.can_transition_to(Scheduled));
        assert!(Deleted.is_terminal());
        assert!(Retained.is_terminal());
        assert!(!Scheduled.is_terminal());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(AccessLevel::default(), AccessLevel::Internal);
        assert_eq!(DocumentStatus::default(), DocumentStatus::Active);
        assert!(DocumentStatus::Deleted.is_terminal());
    }
}
