//! Query handling: constraint extraction, chain invocation, fallback filter.

pub mod constraints;
pub mod handler;

pub use constraints::{extract, QueryConstraints};
pub use handler::QueryHandler;
