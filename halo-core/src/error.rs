use thiserror::Error;

use crate::transport::TransportError;

/// Failure of a single Weatherbit request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 204: upstream has nothing for the query.
    #[error("The weather information for the requested location is not found.")]
    NotFound,

    /// HTTP 429.
    #[error("The API rate limit has been reached. Please wait till it resets.")]
    RateLimitReached,

    /// Any other non-200 status.
    #[error(
        "Weather service unavailable (status {status}). Please make sure your API key is valid or try again later."
    )]
    Unavailable { status: u16 },

    /// No response was received.
    #[error("Connectivity problem. Check your internet connection or try again later.")]
    Connectivity(#[source] TransportError),

    /// A 200 response whose body does not have the expected shape.
    #[error("Unexpected response payload from '{slug}': {reason}")]
    BadPayload { slug: String, reason: String },

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),
}

/// Coarse classification of [`ApiError`].
///
/// `Generic` covers every failure that is neither a missing location nor a
/// throttled request and is not caused by the caller's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    RateLimitReached,
    Generic,
    BadPayload,
    InvalidTimezone,
}

impl ApiError {
    /// Coarse kind, for callers that only care about the category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::RateLimitReached => ErrorKind::RateLimitReached,
            ApiError::Unavailable { .. } | ApiError::Connectivity(_) => ErrorKind::Generic,
            ApiError::BadPayload { .. } => ErrorKind::BadPayload,
            ApiError::InvalidTimezone(_) => ErrorKind::InvalidTimezone,
        }
    }

    /// Map a non-200 status to its error. Returns `None` for 200.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200 => None,
            204 => Some(ApiError::NotFound),
            429 => Some(ApiError::RateLimitReached),
            status => Some(ApiError::Unavailable { status }),
        }
    }

    pub(crate) fn bad_payload(slug: &str, reason: impl ToString) -> Self {
        ApiError::BadPayload { slug: slug.to_string(), reason: reason.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn status_mapping() {
        assert!(ApiError::from_status(200).is_none());
        assert_eq!(ApiError::from_status(204).unwrap().kind(), ErrorKind::NotFound);
        assert_eq!(ApiError::from_status(429).unwrap().kind(), ErrorKind::RateLimitReached);

        for status in [201, 301, 400, 401, 403, 404, 500, 503] {
            let err = ApiError::from_status(status).unwrap();
            assert_eq!(err.kind(), ErrorKind::Generic, "status {status}");
        }
    }

    #[test]
    fn connectivity_keeps_source() {
        let err = ApiError::Connectivity("connection refused".into());
        assert_eq!(err.kind(), ErrorKind::Generic);
        assert!(err.to_string().contains("Connectivity problem"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("connection refused".to_string()));
    }

    #[test]
    fn unavailable_message_mentions_api_key() {
        let err = ApiError::Unavailable { status: 403 };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("API key"));
    }
}
