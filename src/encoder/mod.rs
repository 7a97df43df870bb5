//! Feature encoding: client record in, fixed-order feature vector out.

pub mod encode;
pub mod schema;
pub mod validation;
mod vector;

pub use encode::Encoder;
pub use schema::{EncoderTable, Encoding, FeatureSpec, Scaling};
pub use validation::validate_table;
pub use vector::FeatureVector;
