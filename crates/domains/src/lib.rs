//! kanban-board/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for the kanban board:
//! entity models, their declarative schemas, the validation engine, the
//! error taxonomy and the repository ports that storage adapters implement.

pub mod errors;
pub mod ids;
pub mod models;
pub mod ports;
pub mod schema;
pub mod validation;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use ids::*;
pub use models::*;
pub use ports::*;
pub use validation::{validate, RuleCode, Validated, Violation, Violations};
