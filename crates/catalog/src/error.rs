use thiserror::Error;

/// A product payload that failed validation.
///
/// `field` uses the dotted path of the offending JSON field, e.g. `price.amount`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Product validation failed: {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for a required field that was absent or blank.
    pub fn required(field: &'static str) -> Self {
        Self::new(field, format!("Path `{field}` is required."))
    }
}

/// Errors that can occur when interacting with the product store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product payload was rejected before reaching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backing store could not be reached.
    #[error("Product store unavailable: {0}")]
    Unavailable(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    /// Returns true when the error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
