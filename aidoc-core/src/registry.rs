//! Field Schema Registry
//!
//! Static, declarative description of every field of an [`AiDocument`]:
//! its type, nullability, default, allowed values and numeric bounds.
//! Storage engines that cannot enforce `CHECK`, `NOT NULL` or `DEFAULT`
//! natively rely on this table being enforced at the application layer.
//!
//! [`AiDocument`]: crate::AiDocument

use crate::{
    AccessLevel, AnonymizationStatus, ContentSafetyStatus, CopyrightStatus, DatasetType,
    DeletionStatus, DocumentStatus, LegalBasis, OriginalSourceType, PiiDetectionMethod,
    RiskLevel, SchemaError, Sensitivity, ValidationStatus, MAX_ROW_ID,
};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// FIELD DESCRIPTORS
// ============================================================================

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    Float,
    Text,
    Boolean,
    /// RFC 3339 UTC timestamp
    Timestamp,
    /// Set of strings (JSON array on the wire)
    TextSet,
    /// Sequence of floats
    Vector,
    /// Structured, opaque JSON
    Json,
    /// String restricted to an exact, case-sensitive set
    Enum(&'static [&'static str]),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Text => write!(f, "text"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Timestamp => write!(f, "timestamp"),
            FieldType::TextSet => write!(f, "text[]"),
            FieldType::Vector => write!(f, "float[]"),
            FieldType::Json => write!(f, "json"),
            FieldType::Enum(values) => write!(f, "enum({})", values.join("|")),
        }
    }
}

/// Default applied to an absent required field on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldDefault {
    Text(&'static str),
    Bool(bool),
    /// The configured schema version
    SchemaVersion,
    /// A fresh id from the injected generator
    GeneratedUuid,
    /// The injected clock's current time
    CurrentTime,
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Field groups, in the order the table declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldGroup {
    Identity,
    SourceMetadata,
    Chunking,
    Embeddings,
    Privacy,
    Governance,
    Legal,
    Risk,
    Access,
    AuditTrail,
    Lifecycle,
}

impl FieldGroup {
    pub const ALL: &'static [FieldGroup] = &[
        FieldGroup::Identity,
        FieldGroup::SourceMetadata,
        FieldGroup::Chunking,
        FieldGroup::Embeddings,
        FieldGroup::Privacy,
        FieldGroup::Governance,
        FieldGroup::Legal,
        FieldGroup::Risk,
        FieldGroup::Access,
        FieldGroup::AuditTrail,
        FieldGroup::Lifecycle,
    ];

    /// Human-readable group title.
    pub fn label(&self) -> &'static str {
        match self {
            FieldGroup::Identity => "Core Identity & Audit",
            FieldGroup::SourceMetadata => "Source Document Metadata",
            FieldGroup::Chunking => "Document Content & Chunking",
            FieldGroup::Embeddings => "Vector Embeddings (5 providers)",
            FieldGroup::Privacy => "Privacy & PII Protection",
            FieldGroup::Governance => "Data Governance & Lineage",
            FieldGroup::Legal => "Legal & Licensing Tracking",
            FieldGroup::Risk => "Risk Management & Content Safety",
            FieldGroup::Access => "Access Control & Security",
            FieldGroup::AuditTrail => "Enhanced Audit Trail",
            FieldGroup::Lifecycle => "Document Lifecycle Management",
        }
    }
}

/// Everything the validator needs to know about one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Contract (camelCase) name
    pub name: &'static str,
    /// Storage column name
    pub column: &'static str,
    pub group: FieldGroup,
    pub field_type: FieldType,
    pub required: bool,
    pub default: Option<FieldDefault>,
    pub range: Option<NumericRange>,
    /// Cannot change once persisted
    pub immutable: bool,
    /// Must be nulled when the record is deleted
    pub redact_on_delete: bool,
}

impl FieldSpec {
    pub fn new(name: &'static str, column: &'static str, group: FieldGroup, field_type: FieldType) -> Self {
        Self {
            name,
            column,
            group,
            field_type,
            required: false,
            default: None,
            range: None,
            immutable: false,
            redact_on_delete: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: FieldDefault) -> Self {
        self.required = true;
        self.default = Some(default);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(NumericRange { min, max });
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn redacted(mut self) -> Self {
        self.redact_on_delete = true;
        self
    }

    /// Allowed value set, for enumerated fields.
    pub fn allowed_values(&self) -> Option<&'static [&'static str]> {
        match self.field_type {
            FieldType::Enum(values) => Some(values),
            _ => None,
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Immutable lookup table over the field descriptors.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    fields: Vec<FieldSpec>,
    by_name: HashMap<&'static str, usize>,
    by_column: HashMap<&'static str, usize>,
}

static STANDARD: Lazy<SchemaRegistry> = Lazy::new(|| SchemaRegistry::new(standard_fields()));

impl SchemaRegistry {
    /// Build a registry from an ordered list of descriptors.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let by_name = fields.iter().enumerate().map(|(i, f)| (f.name, i)).collect();
        let by_column = fields.iter().enumerate().map(|(i, f)| (f.column, i)).collect();
        Self {
            fields,
            by_name,
            by_column,
        }
    }

    /// The AI document table definition.
    pub fn standard() -> &'static SchemaRegistry {
        &STANDARD
    }

    /// Look up a field by contract name.
    pub fn describe(&self, name: &str) -> Result<&FieldSpec, SchemaError> {
        self.by_name
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| SchemaError::UnknownField {
                field: name.to_string(),
            })
    }

    /// Look up a field by storage column name.
    pub fn by_column(&self, column: &str) -> Result<&FieldSpec, SchemaError> {
        self.by_column
            .get(column)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| SchemaError::UnknownColumn {
                column: column.to_string(),
            })
    }

    /// All fields in stable declaration order.
    pub fn all_fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields_in_group(&self, group: FieldGroup) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.group == group)
    }

    /// Number of fields per group, in group order. Empty groups are omitted.
    pub fn group_counts(&self) -> Vec<(FieldGroup, usize)> {
        FieldGroup::ALL
            .iter()
            .map(|g| (*g, self.fields_in_group(*g).count()))
            .filter(|(_, n)| *n > 0)
            .collect()
    }

    /// Fields that must be nulled when a record is deleted.
    pub fn redacted_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.redact_on_delete)
    }
}

fn standard_fields() -> Vec<FieldSpec> {
    use FieldGroup::*;
    use FieldType::*;

    let score = |name: &'static str, column: &'static str, group: FieldGroup| {
        FieldSpec::new(name, column, group, Float).with_range(0.0, 100.0)
    };
    let int32_max = i32::MAX as f64;

    vec![
        // Core identity & audit
        FieldSpec::new("id", "vastdb_rowid", Identity, Integer)
            .with_range(1.0, MAX_ROW_ID as f64)
            .immutable(),
        FieldSpec::new("uuid", "UUID", Identity, Text)
            .with_default(FieldDefault::GeneratedUuid)
            .immutable(),
        FieldSpec::new("schemaVersion", "RogersAISchemaVersion", Identity, Text)
            .with_default(FieldDefault::SchemaVersion),
        FieldSpec::new("insertedAt", "InsertDateTime", Identity, Timestamp)
            .with_default(FieldDefault::CurrentTime),
        FieldSpec::new("updatedAt", "UpdateDateTime", Identity, Timestamp)
            .with_default(FieldDefault::CurrentTime),
        FieldSpec::new("insertedBy", "InsertUser", Identity, Text).required(),
        FieldSpec::new("updatedBy", "UpdateUser", Identity, Text).required(),
        // Source document metadata
        FieldSpec::new("sourceDocumentName", "SourceDocumentName", SourceMetadata, Text),
        FieldSpec::new("sourceDocumentPath", "SourceDocumentPath", SourceMetadata, Text),
        FieldSpec::new("sourceDocumentHash", "SourceDocumentHash", SourceMetadata, Text),
        FieldSpec::new("sourceDocumentTitle", "SourceDocumentTitle", SourceMetadata, Text).redacted(),
        FieldSpec::new("sourceDocumentSummary", "SourceDocumentSummary", SourceMetadata, Text).redacted(),
        FieldSpec::new("sourceDocumentAuthor", "SourceDocumentAuthor", SourceMetadata, Text).redacted(),
        FieldSpec::new("sourceDocumentOrganization", "SourceDocumentOrganization", SourceMetadata, Text),
        // Content & chunking
        FieldSpec::new("chunkNumber", "DocumentChunkNumber", Chunking, Integer).with_range(1.0, int32_max),
        FieldSpec::new("chunkText", "DocumentChunkText", Chunking, Text).redacted(),
        // Embeddings
        FieldSpec::new("embeddingModel01", "DocumentEmbeddingModel01", Embeddings, Text),
        FieldSpec::new("embeddingUrl01", "DocumentEmbeddingURL01", Embeddings, Text),
        FieldSpec::new("embeddingVector01", "DocumentEmbeddingVectors01", Embeddings, Vector).redacted(),
        FieldSpec::new("embeddingModel02", "DocumentEmbeddingModel02", Embeddings, Text),
        FieldSpec::new("embeddingUrl02", "DocumentEmbeddingURL02", Embeddings, Text),
        FieldSpec::new("embeddingVector02", "DocumentEmbeddingVectors02", Embeddings, Vector).redacted(),
        FieldSpec::new("embeddingModel03", "DocumentEmbeddingModel03", Embeddings, Text),
        FieldSpec::new("embeddingUrl03", "DocumentEmbeddingURL03", Embeddings, Text),
        FieldSpec::new("embeddingVector03", "DocumentEmbeddingVectors03", Embeddings, Vector).redacted(),
        FieldSpec::new("embeddingModel04", "DocumentEmbeddingModel04", Embeddings, Text),
        FieldSpec::new("embeddingUrl04", "DocumentEmbeddingURL04", Embeddings, Text),
        FieldSpec::new("embeddingVector04", "DocumentEmbeddingVectors04", Embeddings, Vector).redacted(),
        FieldSpec::new("embeddingModel05", "DocumentEmbeddingModel05", Embeddings, Text),
        FieldSpec::new("embeddingUrl05", "DocumentEmbeddingURL05", Embeddings, Text),
        FieldSpec::new("embeddingVector05", "DocumentEmbeddingVectors05", Embeddings, Vector).redacted(),
        // Privacy & PII
        FieldSpec::new("containsPII", "ContainsPII", Privacy, Boolean)
            .with_default(FieldDefault::Bool(false)),
        FieldSpec::new("piiTypes", "PIITypes", Privacy, TextSet).redacted(),
        FieldSpec::new("piiDetectionMethod", "PIIDetectionMethod", Privacy, Enum(PiiDetectionMethod::ALLOWED)),
        FieldSpec::new("piiDetectionAt", "PIIDetectionDate", Privacy, Timestamp),
        FieldSpec::new("sensitivity", "SensitiveDataClassification", Privacy, Enum(Sensitivity::ALLOWED)),
        FieldSpec::new("legalBasis", "LegalBasisForProcessing", Privacy, Enum(LegalBasis::ALLOWED)),
        FieldSpec::new("retentionDays", "DataRetentionPeriod", Privacy, Integer).with_range(1.0, int32_max),
        FieldSpec::new("deletionScheduledAt", "DeletionScheduledDate", Privacy, Timestamp),
        FieldSpec::new("deletionStatus", "DeletionStatus", Privacy, Enum(DeletionStatus::ALLOWED)),
        FieldSpec::new("anonymizationStatus", "AnonymizationStatus", Privacy, Enum(AnonymizationStatus::ALLOWED)),
        // Governance & lineage
        FieldSpec::new("datasetType", "DatasetType", Governance, Enum(DatasetType::ALLOWED)),
        FieldSpec::new("datasetPurpose", "DatasetPurpose", Governance, Text),
        score("qualityScore", "DataQualityScore", Governance),
        FieldSpec::new("validationStatus", "DataValidationStatus", Governance, Enum(ValidationStatus::ALLOWED)),
        FieldSpec::new("validationAt", "DataValidationDate", Governance, Timestamp),
        FieldSpec::new("validatedBy", "DataValidatedBy", Governance, Text),
        FieldSpec::new("lineage", "DataLineageChain", Governance, Json),
        FieldSpec::new("originalSourceType", "OriginalSourceType", Governance, Enum(OriginalSourceType::ALLOWED)),
        // Legal & licensing
        FieldSpec::new("copyrightStatus", "CopyrightStatus", Legal, Enum(CopyrightStatus::ALLOWED)),
        FieldSpec::new("licenseType", "LicenseType", Legal, Text),
        FieldSpec::new("usageRestrictions", "UsageRestrictions", Legal, Text),
        FieldSpec::new("commercialUseAllowed", "CommercialUseAllowed", Legal, Boolean),
        FieldSpec::new("attributionRequired", "AttributionRequired", Legal, Boolean),
        FieldSpec::new("attributionText", "AttributionText", Legal, Text).redacted(),
        // Risk & content safety
        FieldSpec::new("riskLevel", "RiskLevel", Risk, Enum(RiskLevel::ALLOWED)),
        FieldSpec::new("contentSafetyStatus", "ContentSafetyStatus", Risk, Enum(ContentSafetyStatus::ALLOWED)),
        score("contentSafetyScore", "ContentSafetyScore", Risk),
        FieldSpec::new("contentModerationAt", "ContentModerationDate", Risk, Timestamp),
        // Access control
        FieldSpec::new("accessLevel", "AccessControlLevel", Access, Enum(AccessLevel::ALLOWED))
            .with_default(FieldDefault::Text("Internal")),
        FieldSpec::new("dataClassification", "DataClassification", Access, Text),
        FieldSpec::new("allowedRoles", "AllowedRoles", Access, TextSet),
        // Audit trail
        FieldSpec::new("lastModifiedReason", "LastModifiedReason", AuditTrail, Text),
        // Lifecycle
        FieldSpec::new("documentStatus", "DocumentStatus", Lifecycle, Enum(DocumentStatus::ALLOWED))
            .with_default(FieldDefault::Text("Active")),
        FieldSpec::new("documentVersion", "DocumentVersion", Lifecycle, Text),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
