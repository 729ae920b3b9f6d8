use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    #[error("Host store error: {0}")]
    Host(String),
}
