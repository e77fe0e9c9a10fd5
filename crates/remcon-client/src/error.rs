//! Client error types.

/// Errors surfaced by the remediation console clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport failure.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{endpoint} answered with status {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Endpoint that answered.
        endpoint: String,
    },

    /// A configured base URL is unusable.
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),

    /// The all-systems fetch hit its hard page ceiling.
    #[error("page ceiling hit after {pages} pages: fetched {fetched} of {total} systems")]
    PageOverflow {
        /// Pages fetched before giving up.
        pages: u32,
        /// Systems accumulated so far.
        fetched: usize,
        /// Total last reported by the service.
        total: u64,
    },

    /// The service reported a total it then failed to serve.
    #[error("systems total mismatch: service reported {total} but served {fetched}")]
    TotalMismatch {
        /// Systems actually served.
        fetched: usize,
        /// Total last reported by the service.
        total: u64,
    },

    /// Payload decoding failure.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_names_the_endpoint() {
        let err = ClientError::Api {
            status: 412,
            endpoint: "/remediations/x/playbook_runs".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "/remediations/x/playbook_runs answered with status 412"
        );
    }

    #[test]
    fn overflow_display_carries_counts() {
        let err = ClientError::PageOverflow {
            pages: 100,
            fetched: 10_000,
            total: 10_500,
        };
        assert_eq!(
            err.to_string(),
            "page ceiling hit after 100 pages: fetched 10000 of 10500 systems"
        );
    }
}
