//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// テスト生成サービスの統一エラー型
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Malformed request from the client
    #[error("{0}")]
    InvalidRequest(String),

    /// Method extraction failed (parser error, empty output, etc.)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Test synthesis backend error
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Archive assembly error
    #[error("Archive error: {0}")]
    Archive(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result型エイリアス
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_display_is_bare_message() {
        // クライアント向けメッセージはプレフィックスなしで返す
        let err = GeneratorError::InvalidRequest("No files provided".to_string());
        assert_eq!(err.to_string(), "No files provided");
    }

    #[test]
    fn test_extraction_error_display() {
        let err = GeneratorError::Extraction("parser exited with status 1".to_string());
        assert_eq!(
            err.to_string(),
            "Extraction error: parser exited with status 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GeneratorError = io_err.into();
        assert!(matches!(err, GeneratorError::Io(_)));
    }
}
