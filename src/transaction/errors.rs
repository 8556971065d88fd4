//! Log parsing errors
//!
//! Error codes:
//! - COLLATOR_PARSE_FAILED: a line is not a well-formed transaction record
//! - COLLATOR_INVALID_ENCODING: a line is not valid UTF-8

use std::fmt;

/// Parse error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCode {
    /// Line did not deserialize into a transaction
    CollatorParseFailed,
    /// Line bytes are not UTF-8
    CollatorInvalidEncoding,
}

impl ParseErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorCode::CollatorParseFailed => "COLLATOR_PARSE_FAILED",
            ParseErrorCode::CollatorInvalidEncoding => "COLLATOR_INVALID_ENCODING",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A non-blank log line that could not be turned into a transaction
#[derive(Debug)]
pub struct ParseError {
    code: ParseErrorCode,
    /// 1-based line number in the raw log
    line: usize,
    message: String,
    source: Option<serde_json::Error>,
}

impl ParseError {
    /// Create a parse failure from a serde_json error
    pub fn malformed_record(line: usize, source: serde_json::Error) -> Self {
        Self {
            code: ParseErrorCode::CollatorParseFailed,
            line,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an encoding failure
    pub fn invalid_encoding(line: usize, reason: impl Into<String>) -> Self {
        Self {
            code: ParseErrorCode::CollatorInvalidEncoding,
            line,
            message: reason.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ParseErrorCode {
        self.code
    }

    /// Returns the 1-based line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ERROR] {}: {} (line: {})",
            self.code.code(),
            self.message,
            self.line
        )
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for log parsing
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ParseErrorCode::CollatorParseFailed.code(),
            "COLLATOR_PARSE_FAILED"
        );
        assert_eq!(
            ParseErrorCode::CollatorInvalidEncoding.code(),
            "COLLATOR_INVALID_ENCODING"
        );
    }

    #[test]
    fn test_error_display_carries_line() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ParseError::malformed_record(4, json_err);

        let display = err.to_string();
        assert!(display.starts_with("[ERROR] COLLATOR_PARSE_FAILED"));
        assert!(display.ends_with("(line: 4)"));
        assert_eq!(err.line(), 4);
        assert!(std::error::Error::source(&err).is_some());
    }
}
