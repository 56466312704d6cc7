//! Error types for ragcell.

use thiserror::Error;

/// Main error type for retrieval engine operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied an invalid argument
    #[error("validation error: {0}")]
    Validation(String),

    /// Reading a source file failed
    #[error("read error: {0}")]
    Read(#[from] ReadError),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    /// Document store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Similarity backend failed
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the same call may succeed if retried.
    ///
    /// Collaborator timeouts and transient provider failures are retryable;
    /// validation and dimension errors are not.
    pub fn retryable(&self) -> bool {
        match self {
            Error::Embedding(e) => e.is_retryable(),
            Error::Backend(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Source file reading errors.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("no readable text in {0}")]
    Unreadable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Embedding provider errors.
#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("embedding request timed out")]
    Timeout,

    #[error("malformed provider response: expected {expected} vectors, got {got}")]
    Malformed { expected: usize, got: usize },
}

impl EmbedError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, EmbedError::Timeout | EmbedError::Provider(_))
    }
}

/// Document store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("dimension mismatch: index has {expected}, vector has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Similarity backend errors.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbedError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("similarity scoring timed out")]
    Timeout,
}

impl BackendError {
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Embedding(e) => e.is_retryable(),
            BackendError::Remote(_) | BackendError::Timeout => true,
            BackendError::Store(_) => false,
        }
    }
}

/// Result type alias for retrieval engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    // ========== ReadError Tests ==========

    #[test]
    fn test_read_error_unreadable_display() {
        let err = ReadError::Unreadable("report.pdf".to_string());
        assert_eq!(err.to_string(), "no readable text in report.pdf");
    }

    #[test]
    fn test_read_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReadError = io_err.into();
        assert!(matches!(err, ReadError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    // ========== EmbedError Tests ==========

    #[test]
    fn test_embed_error_provider_display() {
        let err = EmbedError::Provider("HTTP 503".to_string());
        assert_eq!(err.to_string(), "provider error: HTTP 503");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_embed_error_timeout_is_retryable() {
        let err = EmbedError::Timeout;
        assert_eq!(err.to_string(), "embedding request timed out");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_embed_error_malformed_display() {
        let err = EmbedError::Malformed {
            expected: 4,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "malformed provider response: expected 4 vectors, got 2"
        );
        assert!(!err.is_retryable());
    }

    // ========== StoreError Tests ==========

    #[test]
    fn test_store_error_dimension_mismatch_display() {
        let err = StoreError::DimensionMismatch {
            expected: 1536,
            actual: 768,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: index has 1536, vector has 768"
        );
    }

    #[test]
    fn test_store_error_snapshot_display() {
        let err = StoreError::Snapshot("truncated file".to_string());
        assert_eq!(err.to_string(), "snapshot error: truncated file");
    }

    // ========== BackendError Tests ==========

    #[test]
    fn test_backend_error_from_embed_error() {
        let err: BackendError = EmbedError::Timeout.into();
        assert!(matches!(err, BackendError::Embedding(EmbedError::Timeout)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_backend_error_store_not_retryable() {
        let err: BackendError = StoreError::DimensionMismatch {
            expected: 3,
            actual: 2,
        }
        .into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_backend_error_timeout_retryable() {
        assert!(BackendError::Timeout.is_retryable());
        assert!(BackendError::Remote("reset by peer".to_string()).is_retryable());
    }

    // ========== Main Error Tests ==========

    #[test]
    fn test_error_from_read_error() {
        let err: Error = ReadError::Unreadable("a.docx".to_string()).into();
        assert!(matches!(err, Error::Read(_)));
        assert!(err.to_string().contains("a.docx"));
    }

    #[test]
    fn test_error_from_store_error() {
        let err: Error = StoreError::DimensionMismatch {
            expected: 8,
            actual: 4,
        }
        .into();
        assert!(matches!(err, Error::Store(_)));
        assert!(!err.retryable());
    }

    #[test]
    fn test_error_retryable_follows_backend() {
        let err: Error = BackendError::Timeout.into();
        assert!(err.retryable());

        let err: Error = Error::Validation("top_k must be an integer".to_string());
        assert!(!err.retryable());
    }

    #[test]
    fn test_error_chain_embed_to_backend_to_main() {
        let backend_err: BackendError = EmbedError::Provider("overloaded".to_string()).into();
        let main_err: Error = backend_err.into();

        assert!(matches!(
            main_err,
            Error::Backend(BackendError::Embedding(_))
        ));
        assert!(main_err.to_string().contains("overloaded"));
        assert!(main_err.retryable());
    }

    #[test]
    fn test_result_type_alias() {
        fn ok_fn() -> Result<u32> {
            Ok(7)
        }

        fn err_fn() -> Result<u32> {
            Err(Error::Config("missing endpoint".to_string()))
        }

        assert!(ok_fn().is_ok());
        assert!(err_fn().is_err());
    }
}
