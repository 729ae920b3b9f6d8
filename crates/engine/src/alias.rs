use std::collections::HashMap;
use tokenmove_store::{Value, Variable};

/// One alias-valued entry found in the store: `holder`'s value at `mode_id`
/// resolves to `target_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    pub holder_id: String,
    pub holder_name: String,
    pub mode_id: String,
    pub target_id: String,
    /// Display name of the target, resolved from the same snapshot.
    /// Absent when the target id does not resolve.
    pub target_name: Option<String>,
}

/// Point-in-time reverse index of alias references.
///
/// Built once per relocation from a single snapshot of all variables, before
/// any mutation, so it reflects the pre-move alias topology. Never refreshed
/// mid-operation.
#[derive(Debug, Default)]
pub struct AliasIndex {
    records: Vec<AliasRecord>,
}

impl AliasIndex {
    /// Scan every variable's per-mode values for alias entries.
    ///
    /// O(variables x modes); variable counts in this domain are small.
    pub fn build(variables: &[Variable]) -> Self {
        let names: HashMap<&str, &str> = variables
            .iter()
            .map(|variable| (variable.id.as_str(), variable.name.as_str()))
            .collect();

        let mut records = Vec::new();
        for variable in variables {
            for (mode_id, value) in &variable.values_by_mode {
                if let Value::Alias { id } = value {
                    records.push(AliasRecord {
                        holder_id: variable.id.clone(),
                        holder_name: variable.name.clone(),
                        mode_id: mode_id.clone(),
                        target_id: id.clone(),
                        target_name: names.get(id.as_str()).map(|name| name.to_string()),
                    });
                }
            }
        }

        log::debug!(
            "alias index: {} references across {} variables",
            records.len(),
            variables.len()
        );
        Self { records }
    }

    /// All references whose alias target is `target_id`.
    ///
    /// One indirection level only: a chain of aliases pointing at aliases is
    /// not traversed.
    pub fn references_to<'a>(
        &'a self,
        target_id: &'a str,
    ) -> impl Iterator<Item = &'a AliasRecord> {
        self.records
            .iter()
            .filter(move |record| record.target_id == target_id)
    }

    pub fn records(&self) -> &[AliasRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
