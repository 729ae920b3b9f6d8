use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named axis value within a collection (e.g., "Light"/"Dark").
///
/// Mode names are not unique, but reconciliation between collections treats
/// the name as the de-duplication key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Identifier, unique within the owning collection
    pub mode_id: String,

    /// Display name
    pub name: String,
}

/// A named grouping of variables, defining an ordered set of modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Opaque identifier assigned by the host store
    pub id: String,

    /// Display name
    pub name: String,

    /// Modes in host order
    pub modes: Vec<Mode>,
}

impl Collection {
    /// Find a mode by display name.
    pub fn mode_named(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|mode| mode.name == name)
    }
}

/// Resolved value type of a variable, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedType {
    Color,
    Float,
    String,
    Boolean,
}

/// A per-mode value: either a literal or an alias to another variable.
///
/// Aliases are recognized by the structural tag, matching the host wire
/// shape; literals are opaque to the relocation engine and copied verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    #[serde(rename = "VARIABLE_ALIAS")]
    Alias { id: String },
    Color { r: f64, g: f64, b: f64, a: f64 },
    Float { value: f64 },
    Text { value: String },
    Boolean { value: bool },
}

impl Value {
    /// Alias pointing at `target_id`.
    pub fn alias(target_id: impl Into<String>) -> Self {
        Value::Alias {
            id: target_id.into(),
        }
    }

    /// The aliased variable id, if this value is an alias.
    pub fn alias_target(&self) -> Option<&str> {
        match self {
            Value::Alias { id } => Some(id.as_str()),
            _ => None,
        }
    }
}

/// A named, typed token with one value per mode of its owning collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Opaque identifier assigned by the host store
    pub id: String,

    /// Display name; prefix-matched against relocation paths
    pub name: String,

    /// Value type, immutable after creation
    pub resolved_type: ResolvedType,

    /// Owning collection
    pub collection_id: String,

    /// Mode id -> value
    pub values_by_mode: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn alias_target_distinguishes_aliases_from_literals() {
        let alias = Value::alias("variable-7");
        assert_eq!(alias.alias_target(), Some("variable-7"));

        let literal = Value::Float { value: 16.0 };
        assert_eq!(literal.alias_target(), None);
    }

    #[test]
    fn alias_serializes_with_host_tag() {
        let raw = serde_json::to_value(Value::alias("variable-7")).unwrap();
        assert_eq!(raw["type"], "VARIABLE_ALIAS");
        assert_eq!(raw["id"], "variable-7");
    }

    #[test]
    fn mode_named_matches_exact_name() {
        let collection = Collection {
            id: "collection-1".to_string(),
            name: "Primitives".to_string(),
            modes: vec![
                Mode {
                    mode_id: "mode-1".to_string(),
                    name: "Light".to_string(),
                },
                Mode {
                    mode_id: "mode-2".to_string(),
                    name: "Dark".to_string(),
                },
            ],
        };

        assert_eq!(collection.mode_named("Dark").unwrap().mode_id, "mode-2");
        assert!(collection.mode_named("dark").is_none());
    }
}
