use thiserror::Error;

/// Joins the source variable id and the path prefix in the wire form of a
/// relocation request. Host variable ids and token paths never contain it.
pub const ID_AND_PATH_DELIMITER: char = '#';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed source token (expected id{ID_AND_PATH_DELIMITER}path): {0}")]
    Malformed(String),
}

/// Decoded source token of a relocation request: which variable anchors the
/// source collection, and which name prefix selects the variables to move.
///
/// The delimiter-joined encoding is a serialization artifact of the message
/// channel; everything past the boundary works with this structured form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceToken {
    pub variable_id: String,
    pub path: String,
}

impl SourceToken {
    /// Split a wire token into its id and path components.
    ///
    /// An empty path component is preserved; rejecting it is a relocation
    /// precondition, not a parse concern.
    pub fn decode(raw: &str) -> Result<Self, TokenError> {
        let (variable_id, path) = raw
            .split_once(ID_AND_PATH_DELIMITER)
            .ok_or_else(|| TokenError::Malformed(raw.to_string()))?;
        Ok(Self {
            variable_id: variable_id.to_string(),
            path: path.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{ID_AND_PATH_DELIMITER}{}",
            self.variable_id, self.path
        )
    }
}
