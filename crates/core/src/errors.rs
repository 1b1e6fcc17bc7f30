use std::path::PathBuf;

/// Result type alias for quadra operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for quadra operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Surface-mesh file parsing errors
    #[error("{path}:{line}: {message}")]
    MeshParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Geometry that cannot be processed (degenerate panels, bad indices)
    #[error("invalid geometry: {message}")]
    Geometry { message: String },
}

// Helper methods for creating errors with context
impl Error {
    /// Create a mesh parse error with file position context
    #[must_use]
    pub fn mesh_parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::MeshParse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a geometry error
    #[must_use]
    pub fn geometry(message: impl Into<String>) -> Self {
        Error::Geometry {
            message: message.into(),
        }
    }
}
