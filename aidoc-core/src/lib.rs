//! AIDOC Core - Record Types
//!
//! The AI document record, its enumerations and the field schema registry.
//! All other crates depend on this. No validation logic lives here beyond
//! what the types themselves guarantee.

#[macro_use]
mod macros;

pub mod config;
pub mod enums;
pub mod error;
pub mod identity;
pub mod record;
pub mod registry;
pub mod violation;

pub use config::{AidocConfig, LegalBasisPolicy, DEFAULT_VECTOR_DIMENSIONS};
pub use enums::{
    AccessLevel, AnonymizationStatus, ContentSafetyStatus, CopyrightStatus, DatasetType,
    DeletionStatus, DocumentStatus, EnumParseError, LegalBasis, OriginalSourceType,
    PiiDetectionMethod, RiskLevel, Sensitivity, ValidationStatus,
};
pub use error::{AidocError, AidocResult, ConfigError, SchemaError, StorageError};
pub use identity::{
    compute_content_hash, new_record_uuid, RecordId, Timestamp, CURRENT_SCHEMA_VERSION,
    MAX_ROW_ID,
};
pub use record::{embedding_field_names, AiDocument, Embedding, FieldMap, EMBEDDING_SLOTS};
pub use registry::{
    FieldDefault, FieldGroup, FieldSpec, FieldType, NumericRange, SchemaRegistry,
};
pub use violation::{Severity, ValidationReport, Violation, ViolationKind};
