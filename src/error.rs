use thiserror::Error;

/// Failure classes reported by the remote store.
///
/// Classification drives the writer/reader control flow:
/// - `SchemaMismatch` aborts retries and triggers the base-column fallback
/// - `Transient` is retried with backoff
/// - `Permanent` aborts immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SchemaMismatch,
    Transient,
    Permanent,
}

/// Substrings that mark a failure as transient (network/SSL/rate-limit class).
/// Matched case-insensitively against the error's string representation.
/// "525" covers Cloudflare's SSL handshake failure code seen in front of the store.
const TRANSIENT_MARKERS: &[&str] = &[
    "525",
    "ssl",
    "timeout",
    "connection",
    "network",
    "502",
    "503",
    "504",
];

/// Classify an opaque store error by its string representation.
///
/// PostgREST reports an unrecognized column as `PGRST204` ("... column ... in
/// the schema cache"), which means the analytics migration has not been run on
/// the remote database. That check is case-sensitive for the code itself,
/// case-insensitive for the "schema cache" phrasing. Everything the transient
/// marker table does not catch is permanent.
///
/// All matching rules live here so they are never duplicated across the
/// writer and reader paths.
pub fn classify(detail: &str) -> ErrorKind {
    let lower = detail.to_lowercase();
    if detail.contains("PGRST204") || lower.contains("schema cache") {
        return ErrorKind::SchemaMismatch;
    }
    if TRANSIENT_MARKERS.iter().any(|m| lower.contains(m)) {
        return ErrorKind::Transient;
    }
    ErrorKind::Permanent
}

/// Store-level error, tagged with its classification.
///
/// This is the only signal that crosses from the low-level insert/select
/// helpers up to the writer/reader orchestration; both convert it into a
/// structured outcome before returning to their callers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote schema does not recognize one or more submitted columns.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    /// Network/SSL/rate-limit class failure expected to self-resolve on retry.
    #[error("transient store failure: {0}")]
    Transient(String),
    /// Anything else; retrying will not help.
    #[error("store failure: {0}")]
    Permanent(String),
}

impl StoreError {
    /// Wrap a raw error string, classifying it.
    pub fn from_detail(detail: String) -> Self {
        match classify(&detail) {
            ErrorKind::SchemaMismatch => Self::SchemaMismatch(detail),
            ErrorKind::Transient => Self::Transient(detail),
            ErrorKind::Permanent => Self::Permanent(detail),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            Self::Transient(_) => ErrorKind::Transient,
            Self::Permanent(_) => ErrorKind::Permanent,
        }
    }

    /// The raw detail string, without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::SchemaMismatch(d) | Self::Transient(d) | Self::Permanent(d) => d,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        // Connect failures and timeouts are transient regardless of how
        // reqwest phrases them; everything else goes through the classifier.
        if err.is_connect() || err.is_timeout() {
            Self::Transient(err.to_string())
        } else {
            Self::from_detail(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_schema_mismatch() {
        assert_eq!(
            classify("HTTP 400: {\"code\":\"PGRST204\",\"message\":\"Could not find the 'sentiment' column\"}"),
            ErrorKind::SchemaMismatch
        );
        assert_eq!(
            classify("column 'call_hour' not found in Schema Cache"),
            ErrorKind::SchemaMismatch
        );
    }

    #[test]
    fn test_classify_transient_codes() {
        assert_eq!(classify("HTTP 502: bad gateway"), ErrorKind::Transient);
        assert_eq!(classify("HTTP 503: service unavailable"), ErrorKind::Transient);
        assert_eq!(classify("HTTP 504: gateway timeout"), ErrorKind::Transient);
        assert_eq!(classify("HTTP 525: SSL handshake failed"), ErrorKind::Transient);
    }

    #[test]
    fn test_classify_transient_substrings_case_insensitive() {
        assert_eq!(classify("SSL routine error"), ErrorKind::Transient);
        assert_eq!(classify("Connection reset by peer"), ErrorKind::Transient);
        assert_eq!(classify("request TIMEOUT after 30s"), ErrorKind::Transient);
        assert_eq!(classify("Network is unreachable"), ErrorKind::Transient);
    }

    #[test]
    fn test_classify_permanent() {
        assert_eq!(classify("HTTP 401: invalid API key"), ErrorKind::Permanent);
        assert_eq!(
            classify("HTTP 400: value too long for column"),
            ErrorKind::Permanent
        );
    }

    #[test]
    fn test_schema_mismatch_takes_precedence() {
        // A PGRST204 body must never be retried as transient, even when the
        // message also mentions a connection.
        assert_eq!(
            classify("PGRST204: could not reload connection schema cache"),
            ErrorKind::SchemaMismatch
        );
    }

    #[test]
    fn test_pgrst_code_is_case_sensitive() {
        // A lowercase "pgrst204" is not the PostgREST code; without the
        // "schema cache" phrasing it falls through to permanent.
        assert_eq!(classify("pgrst204 something"), ErrorKind::Permanent);
    }

    #[test]
    fn test_from_detail_tags_variant() {
        let err = StoreError::from_detail("HTTP 503: unavailable".to_string());
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(err.detail(), "HTTP 503: unavailable");
        assert_eq!(
            err.to_string(),
            "transient store failure: HTTP 503: unavailable"
        );
    }
}
