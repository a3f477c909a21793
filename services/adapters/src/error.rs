//! Error types for the adapters module

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Transport-level failure of a single upstream call
///
/// Every variant except `Cancelled` is transient and consumes one retry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Body could not be parsed as the expected format
    #[error("Malformed body from {url}: {reason}")]
    MalformedBody {
        /// Requested URL
        url: String,
        /// Parser message
        reason: String,
    },

    /// Body exceeded the fetcher's size cap and was abandoned
    #[error("Body from {url} exceeds {limit} bytes")]
    BodyTooLarge {
        /// Requested URL
        url: String,
        /// Configured cap in bytes
        limit: usize,
    },

    /// Cancellation token fired while the call was in flight
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::Cancelled)
    }
}

/// Pipeline-level failure for one source
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Every attempt failed; carries the last transport error
    #[error("Source {source_id} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Source identifier
        source_id: String,
        /// Attempts made, including the first
        attempts: u32,
        /// Error from the final attempt
        #[source]
        last: FetchError,
    },

    /// Payload arrived but its top-level shape is unusable
    #[error("Malformed payload from {source_id}: {reason}")]
    MalformedPayload {
        /// Source identifier
        source_id: String,
        /// What was wrong with it
        reason: String,
    },

    /// Detail lookup for one room failed; the room is omitted
    #[error("Room {room} of {source_id} skipped: {reason}")]
    PartialRoom {
        /// Source identifier
        source_id: String,
        /// Upstream room id
        room: String,
        /// Underlying failure
        reason: String,
    },

    /// Poll aborted through the cancellation token
    #[error("Poll of {source_id} cancelled")]
    Cancelled {
        /// Source identifier
        source_id: String,
    },

    /// Configuration error in source settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdapterError {
    /// Shorthand for [`AdapterError::MalformedPayload`]
    pub fn malformed(source_id: &str, reason: impl Into<String>) -> Self {
        AdapterError::MalformedPayload {
            source_id: source_id.to_string(),
            reason: reason.into(),
        }
    }

    /// True for cancellation, which callers treat as shutdown rather than failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AdapterError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_transience() {
        let status = FetchError::Status {
            url: "http://host/rooms".to_string(),
            status: 503,
            body: "busy".to_string(),
        };
        assert!(status.is_transient());
        assert!(!FetchError::Cancelled.is_transient());
    }

    #[test]
    fn test_exhaustion_message_carries_status_and_body() {
        let err = AdapterError::RetriesExhausted {
            source_id: "motorstorm_pr".to_string(),
            attempts: 4,
            last: FetchError::Status {
                url: "http://host/rooms".to_string(),
                status: 502,
                body: "bad gateway".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("4 attempts"));
        assert!(message.contains("502"));
        assert!(message.contains("bad gateway"));
        assert!(!err.is_cancelled());
    }
}
