use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Path is empty")]
    EmptyPath,

    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("No variables found to move under '{0}'")]
    NoVariablesMatched(String),

    #[error("Store error: {0}")]
    Store(#[from] tokenmove_store::StoreError),
}
