//! AIDOC Guard - Record Validator & Lifecycle Manager
//!
//! Validates insert and update candidates against the field schema
//! registry, applies defaults, stamps audit timestamps, and enforces the
//! deletion workflow including redaction on delete.
//!
//! Time and identifiers come from injected [`Clock`] and [`IdGenerator`]
//! implementations so validation is deterministic under test.

pub mod clock;
pub mod example;
pub mod lifecycle;
pub mod validator;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidV7Generator};
pub use example::{example_candidate, EXAMPLE_MODEL};
pub use lifecycle::{parse_timestamp, timestamp_value, LifecycleManager};
pub use validator::{Mode, Validated, Validator};
