//! Client records: the raw input of a scoring request.

mod types;

pub use types::{Attribute, AttributeKind, ClientRecord, RawValue};
