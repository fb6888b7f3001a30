//! Runtime-discovered schema: descriptors and the introspectors that fetch them.

pub mod types;
pub mod introspect;

pub use types::*;
pub use introspect::*;
