//! Backoffice Core - Core abstractions shared by the back-office table layer
//!
//! This crate provides the fundamental traits and types that the other
//! backoffice crates depend on. It defines:
//!
//! - `Entity` - Trait for any record a module lists (lead, contract, service order)
//! - `SearchDelegate` / `DeleteOperation` - Async collaborators owned by the data layer
//! - `Record` - A generic, boundary-validated entity built from JSON
//! - Common types like `FieldValue` and `PendingOperation`

mod delegate;
mod entity;
mod error;
mod record;
mod types;

pub use delegate::*;
pub use entity::*;
pub use error::*;
pub use record::*;
pub use types::*;
