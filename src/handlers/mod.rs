//! HTTP handlers for generated table and procedure routes, plus catalog passthrough.

pub mod meta;
pub mod procedure;
pub mod segment;
pub mod table;
