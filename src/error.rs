//! Error types.

use thiserror::Error;

/// Errors raised while decoding traces, loading configuration, or doing I/O.
///
/// Predictors and the replay harness never fail; they assume well-formed,
/// ordered input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A trace line could not be decoded.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed configuration file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_error_reports_line() {
        let e = Error::Parse { line: 12, reason: "bad pc".to_string() };
        assert_eq!(e.to_string(), "line 12: bad pc");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
