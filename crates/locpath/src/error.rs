use core::fmt;
use std::sync::Arc;

/// Error codes emitted by the location-path engine.
///
/// Codes follow the W3C xqt-errors naming where a matching code exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Generic dynamic error (adapters, axis and predicate callbacks, document order)
    FOER0000,
    // Invalid argument value (position < 1, step without axis)
    FORG0001,
    // Node test configuration not valid for the requested node kind
    XPST0003,
    // Fallback / unknown (kept last)
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::FOER0000 => "FOER0000",
            ErrorCode::FORG0001 => "FORG0001",
            ErrorCode::XPST0003 => "XPST0003",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    pub fn from_code(s: &str) -> Self {
        match s.strip_prefix("err:").unwrap_or(s) {
            "FOER0000" => ErrorCode::FOER0000,
            "FORG0001" => ErrorCode::FORG0001,
            "XPST0003" => ErrorCode::XPST0003,
            _ => ErrorCode::Unknown,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "err:{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[source]
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>, // optional chained cause
}

impl Error {
    pub fn from_code(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), source: None }
    }

    /// Construction-time rejection of an argument value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::FORG0001, msg)
    }

    /// Construction-time rejection of a node test configuration.
    pub fn invalid_node_test(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::XPST0003, msg)
    }

    /// Generic dynamic failure, typically raised by axis or predicate callbacks.
    pub fn dynamic(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::FOER0000, msg)
    }

    /// Compose an error with a source cause.
    pub fn with_source(mut self, source: impl Into<Option<Arc<dyn std::error::Error + Send + Sync>>>) -> Self {
        self.source = source.into();
        self
    }

    pub fn format_code(&self) -> String {
        self.code.to_string()
    }

    pub fn is_construction_error(&self) -> bool {
        matches!(self.code, ErrorCode::FORG0001 | ErrorCode::XPST0003)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = Error::invalid_argument("position must be >= 1");
        assert_eq!(err.to_string(), "err:FORG0001: position must be >= 1");
        assert!(err.is_construction_error());
    }

    #[test]
    fn code_round_trips_through_prefixed_form() {
        for code in [ErrorCode::FOER0000, ErrorCode::FORG0001, ErrorCode::XPST0003] {
            assert_eq!(ErrorCode::from_code(&code.to_string()), code);
        }
        assert_eq!(ErrorCode::from_code("err:XPTY0004"), ErrorCode::Unknown);
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("backend gone");
        let err = Error::dynamic("axis failed").with_source(Some(Arc::new(io) as Arc<dyn std::error::Error + Send + Sync>));
        let src = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(src.as_deref(), Some("backend gone"));
        assert!(!err.is_construction_error());
    }
}
