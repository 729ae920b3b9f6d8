//! Wire types for the plugin command/event boundary.
//!
//! The UI panel and the core exchange these messages over the host's message
//! channel. Everything here is plain serde data; no behavior beyond the
//! source-token codec.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokenmove_store::ResolvedType;

pub mod token;

pub use token::{SourceToken, TokenError, ID_AND_PATH_DELIMITER};

/// One variable row in a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VariableListing {
    pub id: String,
    pub name: String,
    pub resolved_type: ResolvedType,
    pub collection_id: String,
}

/// One collection with its variables, as shown in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionListing {
    pub id: String,
    pub name: String,
    pub variables: Vec<VariableListing>,
}

/// A committed dependency rewire: point `variable_id`'s value at `mode_id`
/// to an alias targeting `new_variable_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DependencyFix {
    pub variable_id: String,
    pub mode_id: String,
    pub new_variable_id: String,
}

/// A proposed dependency rewire, carrying display names for the
/// user-confirmation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProposedFix {
    pub variable_id: String,
    pub variable_name: String,
    pub mode_id: String,
    pub new_variable_id: String,
    pub collection_name: String,
    pub new_variable_collection_name: String,
}

impl ProposedFix {
    /// Strip display names down to the committed fix record.
    pub fn fix(&self) -> DependencyFix {
        DependencyFix {
            variable_id: self.variable_id.clone(),
            mode_id: self.mode_id.clone(),
            new_variable_id: self.new_variable_id.clone(),
        }
    }
}

/// Inbound commands from the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    FetchCollections,
    DuplicateCollection {
        collection_id: String,
    },
    RelocateVariables {
        /// Source token: variable id and path prefix, delimiter-joined
        /// (see [`SourceToken`])
        from: String,
        /// Target collection id
        to: String,
        update_dependencies: bool,
    },
    ApplyDependencyFixes {
        fixes: Vec<DependencyFix>,
    },
}

/// Outbound events to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CollectionsResult {
        collections: Vec<CollectionListing>,
    },
    RelocationResult {
        /// Ids of the source variables that were duplicated into the target
        moved: Vec<String>,
        /// Human-readable per-item warnings accumulated during the batch
        warnings: Vec<String>,
    },
    DependencyFixesProposed {
        fixes: Vec<ProposedFix>,
    },
}

/// Decode error surfaced when an inbound message is not valid JSON for
/// [`Command`].
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse an inbound command from its JSON wire form.
pub fn decode_command(raw: &str) -> Result<Command, ProtocolError> {
    Ok(serde_json::from_str(raw)?)
}

/// Serialize an outbound event to its JSON wire form.
pub fn encode_event(event: &Event) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}
