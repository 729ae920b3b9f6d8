//! The variable relocation core.
//!
//! Moves design-token variables between collections of the host store:
//! selects variables by name prefix, reconciles the mode axis between source
//! and target, recreates each variable's per-mode values at the destination,
//! and proposes alias rewires so dependents keep resolving after the move.
//!
//! All mutations go through the [`tokenmove_store::VariableStore`] facade,
//! one call at a time. Batches are best-effort: per-item failures skip that
//! item with a warning and the batch continues; there is no rollback.

pub mod alias;
pub mod error;
pub mod facade;
pub mod modes;
pub mod relocate;
pub mod rewire;

pub use alias::{AliasIndex, AliasRecord};
pub use error::{EngineError, Result};
pub use facade::list_collections_with_variables;
pub use modes::{reconcile_modes, ModePairing};
pub use relocate::{
    relocate, MovedVariable, RelocateRequest, RelocationOutcome, RelocationWarning,
};
pub use rewire::apply_fixes;
