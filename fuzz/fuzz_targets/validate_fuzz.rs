//! Fuzz target for the record validator.
//!
//! Feeds arbitrary JSON objects through insert validation, then through an
//! update of the accepted record. Every outcome must be `Ok` or a
//! `Rejected` report with at least one blocking violation.
//!
//! Run with: cargo +nightly fuzz run validate_fuzz -- -max_total_time=60

#![no_main]

use aidoc_core::{AidocConfig, AidocError, FieldMap};
use aidoc_guard::{SequentialIds, SystemClock, Validated, Validator};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use std::sync::Arc;

fn check(result: Result<Validated, AidocError>) -> Option<Validated> {
    match result {
        Ok(validated) => {
            assert!(validated.warnings.iter().all(|w| !w.is_blocking()));
            assert!(validated.record.updated_at >= validated.record.inserted_at);
            Some(validated)
        }
        Err(AidocError::Rejected(report)) => {
            assert!(report.has_errors(), "rejection without a blocking violation");
            None
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(Value::Object(candidate)) = serde_json::from_slice::<Value>(data) else {
        return;
    };
    let config = AidocConfig {
        vector_dimensions: 4,
        ..AidocConfig::default()
    };
    let Ok(validator) = Validator::new(
        config,
        Arc::new(SystemClock),
        Arc::new(SequentialIds::new()),
    ) else {
        return;
    };

    if let Some(inserted) = check(validator.validate_insert(&candidate)) {
        let change: FieldMap = candidate;
        let _ = check(validator.validate_update(&inserted.record, &change));
    }
});
