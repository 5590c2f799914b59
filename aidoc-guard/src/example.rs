//! Sample insert candidate populated the way an ingestion pipeline would.

use aidoc_core::{
    AnonymizationStatus, ContentSafetyStatus, DatasetType, FieldMap, OriginalSourceType,
    PiiDetectionMethod, RiskLevel, Sensitivity, ValidationStatus,
};
use serde_json::Value;

/// Model name recorded in slot 01 when a vector is supplied.
pub const EXAMPLE_MODEL: &str = "example-model";

/// Build an insert candidate for one non-PII chunk. Identity, timestamps
/// and the remaining defaults are left to the validator.
pub fn example_candidate(
    user: &str,
    document_name: &str,
    chunk_text: &str,
    embedding: Option<&[f32]>,
) -> FieldMap {
    let mut c = FieldMap::new();
    let mut set = |name: &str, value: Value| {
        c.insert(name.to_string(), value);
    };

    set("insertedBy", Value::from(user));
    set("updatedBy", Value::from(user));
    set("sourceDocumentName", Value::from(document_name));
    set("chunkNumber", Value::from(1));
    set("chunkText", Value::from(chunk_text));

    if let Some(vector) = embedding {
        set("embeddingModel01", Value::from(EXAMPLE_MODEL));
        set("embeddingVector01", Value::from(vector.to_vec()));
    }

    set("containsPII", Value::Bool(false));
    set(
        "piiDetectionMethod",
        Value::from(PiiDetectionMethod::NotDetected.as_db_str()),
    );
    set("sensitivity", Value::from(Sensitivity::None.as_db_str()));
    set(
        "anonymizationStatus",
        Value::from(AnonymizationStatus::NotAnonymized.as_db_str()),
    );
    set("datasetType", Value::from(DatasetType::Production.as_db_str()));
    set(
        "validationStatus",
        Value::from(ValidationStatus::Pending.as_db_str()),
    );
    set(
        "originalSourceType",
        Value::from(OriginalSourceType::FileSystem.as_db_str()),
    );
    set("riskLevel", Value::from(RiskLevel::Low.as_db_str()));
    set(
        "contentSafetyStatus",
        Value::from(ContentSafetyStatus::NotAssessed.as_db_str()),
    );
    set("lastModifiedReason", Value::from("Initial insert"));
    set("documentVersion", Value::from("1.0"));
    c
}
