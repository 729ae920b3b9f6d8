//! Domain types and the host variable-store facade.
//!
//! The host design application owns all collections, modes, and variables;
//! this crate only defines their shapes, the async facade the rest of the
//! workspace consumes them through, and an in-memory reference store used by
//! tests and embedders.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::VariableStore;
pub use types::{Collection, Mode, ResolvedType, Value, Variable};
