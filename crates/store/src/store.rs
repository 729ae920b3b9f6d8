use crate::error::Result;
use crate::types::{Collection, ResolvedType, Value, Variable};
use async_trait::async_trait;

/// Async facade over the host application's variable store.
///
/// Every call is a suspension point; the host serializes mutations, so
/// callers must never issue concurrent writes through one logical operation.
/// Lookups return `Ok(None)` for missing identifiers rather than erroring,
/// so callers branch explicitly on absence.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// All local collections, in host order.
    async fn collections(&self) -> Result<Vec<Collection>>;

    /// All local variables, in host enumeration order.
    async fn variables(&self) -> Result<Vec<Variable>>;

    /// Resolve a collection by id.
    async fn collection(&self, id: &str) -> Result<Option<Collection>>;

    /// Resolve a variable by id.
    async fn variable(&self, id: &str) -> Result<Option<Variable>>;

    /// Create a collection with the given display name; returns its fresh id.
    async fn create_collection(&self, name: &str) -> Result<String>;

    /// Create a variable in a collection; returns its fresh id.
    ///
    /// The variable starts with no per-mode values.
    async fn create_variable(
        &self,
        name: &str,
        collection_id: &str,
        resolved_type: ResolvedType,
    ) -> Result<String>;

    /// Add a mode with the given name to a collection.
    ///
    /// The host API does not return the new mode's id; callers re-fetch the
    /// collection and resolve the id by name.
    async fn add_mode(&self, collection_id: &str, name: &str) -> Result<()>;

    /// Set a variable's value for one mode.
    async fn set_value(&self, variable_id: &str, mode_id: &str, value: Value) -> Result<()>;
}
