use crate::error::{Result, StoreError};
use crate::store::VariableStore;
use crate::types::{Collection, Mode, ResolvedType, Value, Variable};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory reference implementation of [`VariableStore`].
///
/// Backs the test suites and any embedder that wants the engine without a
/// live host. Faithful to the host contract: enumeration order is creation
/// order, lookups return `None` for missing ids, and `add_mode` does not
/// hand back the fresh mode id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: Vec<Collection>,
    variables: Vec<Variable>,
    next_id: u64,
}

impl Inner {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve a mode id by collection and mode name.
    ///
    /// Test convenience; the host API itself only offers this through a full
    /// collection fetch.
    pub fn mode_id(&self, collection_id: &str, mode_name: &str) -> Option<String> {
        self.inner()
            .collections
            .iter()
            .find(|collection| collection.id == collection_id)
            .and_then(|collection| collection.mode_named(mode_name))
            .map(|mode| mode.mode_id.clone())
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn collections(&self) -> Result<Vec<Collection>> {
        Ok(self.inner().collections.clone())
    }

    async fn variables(&self) -> Result<Vec<Variable>> {
        Ok(self.inner().variables.clone())
    }

    async fn collection(&self, id: &str) -> Result<Option<Collection>> {
        Ok(self
            .inner()
            .collections
            .iter()
            .find(|collection| collection.id == id)
            .cloned())
    }

    async fn variable(&self, id: &str) -> Result<Option<Variable>> {
        Ok(self
            .inner()
            .variables
            .iter()
            .find(|variable| variable.id == id)
            .cloned())
    }

    async fn create_collection(&self, name: &str) -> Result<String> {
        let mut inner = self.inner();
        let id = inner.fresh_id("collection");
        log::debug!("creating collection '{}' as {}", name, id);
        inner.collections.push(Collection {
            id: id.clone(),
            name: name.to_string(),
            modes: Vec::new(),
        });
        Ok(id)
    }

    async fn create_variable(
        &self,
        name: &str,
        collection_id: &str,
        resolved_type: ResolvedType,
    ) -> Result<String> {
        let mut inner = self.inner();
        if !inner
            .collections
            .iter()
            .any(|collection| collection.id == collection_id)
        {
            return Err(StoreError::CollectionNotFound(collection_id.to_string()));
        }
        let id = inner.fresh_id("variable");
        log::debug!("creating variable '{}' as {} in {}", name, id, collection_id);
        inner.variables.push(Variable {
            id: id.clone(),
            name: name.to_string(),
            resolved_type,
            collection_id: collection_id.to_string(),
            values_by_mode: BTreeMap::new(),
        });
        Ok(id)
    }

    async fn add_mode(&self, collection_id: &str, name: &str) -> Result<()> {
        let mut inner = self.inner();
        let mode_id = inner.fresh_id("mode");
        let collection = inner
            .collections
            .iter_mut()
            .find(|collection| collection.id == collection_id)
            .ok_or_else(|| StoreError::CollectionNotFound(collection_id.to_string()))?;
        collection.modes.push(Mode {
            mode_id,
            name: name.to_string(),
        });
        Ok(())
    }

    async fn set_value(&self, variable_id: &str, mode_id: &str, value: Value) -> Result<()> {
        let mut inner = self.inner();
        let variable = inner
            .variables
            .iter_mut()
            .find(|variable| variable.id == variable_id)
            .ok_or_else(|| StoreError::VariableNotFound(variable_id.to_string()))?;
        variable.values_by_mode.insert(mode_id.to_string(), value);
        Ok(())
    }
}
