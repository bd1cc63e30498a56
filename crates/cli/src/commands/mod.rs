//! CLI command implementations.

pub mod maintenance;
pub mod price;
pub mod validate;
