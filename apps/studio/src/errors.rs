use thiserror::Error;

/// Engine-level error type.
///
/// Mutations on the store never return these; they surface from snapshot
/// loading, pagination and export, where the host decides how to show them.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Export superseded by a newer request")]
    Superseded,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StudioError {
    /// Stable machine-readable code for the host UI.
    pub fn code(&self) -> &'static str {
        match self {
            StudioError::Storage(_) => "STORAGE_ERROR",
            StudioError::Serialization(_) => "SERIALIZATION_ERROR",
            StudioError::Io(_) => "IO_ERROR",
            StudioError::Layout(_) => "LAYOUT_ERROR",
            StudioError::Export(_) => "EXPORT_ERROR",
            StudioError::Superseded => "SUPERSEDED",
            StudioError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Logs the full error and returns a message that is safe to show a user.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::Layout(msg) => {
                tracing::error!("Layout error: {msg}");
                "The resume could not be laid out on the page".to_string()
            }
            StudioError::Export(msg) => {
                tracing::error!("Export error: {msg}");
                "The document could not be generated".to_string()
            }
            StudioError::Superseded => "A newer export replaced this one".to_string(),
            StudioError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                "Saved data could not be accessed".to_string()
            }
            StudioError::Serialization(e) => {
                tracing::error!("Serialization error: {e}");
                "Saved data is unreadable".to_string()
            }
            StudioError::Io(e) => {
                tracing::error!("I/O error: {e}");
                "A file operation failed".to_string()
            }
            StudioError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal error occurred".to_string()
            }
        }
    }
}
