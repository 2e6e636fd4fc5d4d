#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurableError {
    #[error("Property '{field}' is restricted and cannot be changed through set()")]
    AccessDenied { field: String },

    #[error("No configurable property named '{0}'")]
    NotFound(String),

    #[error("Configurable property '{0}' is declared more than once")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, ConfigurableError>;
