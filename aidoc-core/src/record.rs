//! The AI document record: one chunk of a source document plus its
//! compliance metadata.
//!
//! Field names on the wire are the camelCase contract names
//! (`chunkText`, `embeddingVector01`, ...). Storage column names live in the
//! registry.

use crate::{
    AccessLevel, AidocError, AidocResult, AnonymizationStatus, ContentSafetyStatus,
    CopyrightStatus, DatasetType, DeletionStatus, DocumentStatus, LegalBasis,
    OriginalSourceType, PiiDetectionMethod, RecordId, RiskLevel, Sensitivity, Timestamp,
    ValidationStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Number of independent embedding provider slots.
pub const EMBEDDING_SLOTS: u8 = 5;

/// A field-name to value mapping, as supplied by callers for insert or update.
pub type FieldMap = Map<String, Value>;

/// One embedding provider slot, `(modelName, sourceUrl, vector)`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embedding {
    pub model_name: Option<String>,
    pub source_url: Option<String>,
    pub vector: Option<Vec<f32>>,
}

impl Embedding {
    /// A slot with none of its three parts set.
    pub fn is_empty(&self) -> bool {
        self.model_name.is_none() && self.source_url.is_none() && self.vector.is_none()
    }
}

/// A validated AI document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDocument {
    // Core identity & audit
    pub id: Option<RecordId>,
    pub uuid: String,
    pub schema_version: String,
    pub inserted_at: Timestamp,
    pub updated_at: Timestamp,
    pub inserted_by: String,
    pub updated_by: String,

    // Source document metadata
    pub source_document_name: Option<String>,
    pub source_document_path: Option<String>,
    pub source_document_hash: Option<String>,
    pub source_document_title: Option<String>,
    pub source_document_summary: Option<String>,
    pub source_document_author: Option<String>,
    pub source_document_organization: Option<String>,

    // Content & chunking
    pub chunk_number: Option<i32>,
    pub chunk_text: Option<String>,

    // Embeddings, five independent provider slots
    pub embedding_model01: Option<String>,
    pub embedding_url01: Option<String>,
    pub embedding_vector01: Option<Vec<f32>>,
    pub embedding_model02: Option<String>,
    pub embedding_url02: Option<String>,
    pub embedding_vector02: Option<Vec<f32>>,
    pub embedding_model03: Option<String>,
    pub embedding_url03: Option<String>,
    pub embedding_vector03: Option<Vec<f32>>,
    pub embedding_model04: Option<String>,
    pub embedding_url04: Option<String>,
    pub embedding_vector04: Option<Vec<f32>>,
    pub embedding_model05: Option<String>,
    pub embedding_url05: Option<String>,
    pub embedding_vector05: Option<Vec<f32>>,

    // Privacy & PII
    #[serde(rename = "containsPII")]
    pub contains_pii: bool,
    pub pii_types: Option<BTreeSet<String>>,
    pub pii_detection_method: Option<PiiDetectionMethod>,
    pub pii_detection_at: Option<Timestamp>,
    pub sensitivity: Option<Sensitivity>,
    pub legal_basis: Option<LegalBasis>,
    pub retention_days: Option<i32>,
    pub deletion_scheduled_at: Option<Timestamp>,
    pub deletion_status: Option<DeletionStatus>,
    pub anonymization_status: Option<AnonymizationStatus>,

    // Governance & lineage
    pub dataset_type: Option<DatasetType>,
    pub dataset_purpose: Option<String>,
    pub quality_score: Option<f64>,
    pub validation_status: Option<ValidationStatus>,
    pub validation_at: Option<Timestamp>,
    pub validated_by: Option<String>,
    pub lineage: Option<Value>,
    pub original_source_type: Option<OriginalSourceType>,

    // Legal & licensing
    pub copyright_status: Option<CopyrightStatus>,
    pub license_type: Option<String>,
    pub usage_restrictions: Option<String>,
    pub commercial_use_allowed: Option<bool>,
    pub attribution_required: Option<bool>,
    pub attribution_text: Option<String>,

    // Risk & content safety
    pub risk_level: Option<RiskLevel>,
    pub content_safety_status: Option<ContentSafetyStatus>,
    pub content_safety_score: Option<f64>,
    pub content_moderation_at: Option<Timestamp>,

    // Access control
    pub access_level: AccessLevel,
    pub data_classification: Option<String>,
    pub allowed_roles: Option<BTreeSet<String>>,

    // Audit trail
    pub last_modified_reason: Option<String>,

    // Lifecycle
    pub document_status: DocumentStatus,
    pub document_version: Option<String>,
}

impl AiDocument {
    /// Render the record as a contract-named field map. Absent values are
    /// present as `null`, so every registered field appears exactly once.
    pub fn to_field_map(&self) -> AidocResult<FieldMap> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(AidocError::Serialization {
                reason: format!("record serialized to non-object {other}"),
            }),
            Err(e) => Err(AidocError::Serialization {
                reason: e.to_string(),
            }),
        }
    }

    /// Build a record from a contract-named field map.
    pub fn from_field_map(map: FieldMap) -> AidocResult<Self> {
        serde_json::from_value(Value::Object(map)).map_err(|e| AidocError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Whether the record has been logically retired.
    pub fn is_deleted(&self) -> bool {
        self.document_status.is_terminal()
    }

    /// Deletion workflow state, with absent treated as the initial state.
    pub fn deletion_status_or_pending(&self) -> DeletionStatus {
        self.deletion_status.unwrap_or(DeletionStatus::Pending)
    }

    /// Read one embedding slot (1-based, `1..=EMBEDDING_SLOTS`).
    pub fn embedding(&self, slot: u8) -> Option<Embedding> {
        let (model, url, vector) = match slot {
            1 => (&self.embedding_model01, &self.embedding_url01, &self.embedding_vector01),
            2 => (&self.embedding_model02, &self.embedding_url02, &self.embedding_vector02),
            3 => (&self.embedding_model03, &self.embedding_url03, &self.embedding_vector03),
            4 => (&self.embedding_model04, &self.embedding_url04, &self.embedding_vector04),
            5 => (&self.embedding_model05, &self.embedding_url05, &self.embedding_vector05),
            _ => return None,
        };
        Some(Embedding {
            model_name: model.clone(),
            source_url: url.clone(),
            vector: vector.clone(),
        })
    }

    /// Replace one embedding slot. Returns false for an out-of-range slot.
    pub fn set_embedding(&mut self, slot: u8, embedding: Embedding) -> bool {
        let (model, url, vector) = match slot {
            1 => (&mut self.embedding_model01, &mut self.embedding_url01, &mut self.embedding_vector01),
            2 => (&mut self.embedding_model02, &mut self.embedding_url02, &mut self.embedding_vector02),
            3 => (&mut self.embedding_model03, &mut self.embedding_url03, &mut self.embedding_vector03),
            4 => (&mut self.embedding_model04, &mut self.embedding_url04, &mut self.embedding_vector04),
            5 => (&mut self.embedding_model05, &mut self.embedding_url05, &mut self.embedding_vector05),
            _ => return false,
        };
        *model = embedding.model_name;
        *url = embedding.source_url;
        *vector = embedding.vector;
        true
    }

    /// Slot numbers with at least one part populated.
    pub fn populated_embedding_slots(&self) -> Vec<u8> {
        (1..=EMBEDDING_SLOTS)
            .filter(|slot| self.embedding(*slot).is_some_and(|e| !e.is_empty()))
            .collect()
    }
}

/// Contract names of the three fields of an embedding slot.
pub fn embedding_field_names(slot: u8) -> [String; 3] {
    [
        format!("embeddingModel{slot:02}"),
        format!("embeddingUrl{slot:02}"),
        format!("embeddingVector{slot:02}"),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
