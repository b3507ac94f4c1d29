//! Event record types and the schema transformer.
//!
//! ## Processing Flow
//!
//! ```text
//! RawRecord → transform() → CanonicalRecord
//! ```

pub mod transform;
pub mod types;

pub use transform::transform;
pub use types::{CanonicalRecord, RawRecord, TaggedValue, ValueType};
