use thiserror::Error;

/// Failure talking to a content or video provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} API key not configured")]
    MissingCredential(&'static str),

    #[error("{service} request failed: {message}")]
    Http {
        service: &'static str,
        message: String,
    },

    #[error("{service} error: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} returned an unexpected response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub(crate) fn http(service: &'static str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        UpstreamError::Http { service, message }
    }

    pub(crate) fn parse(service: &'static str, message: impl Into<String>) -> Self {
        UpstreamError::Parse {
            service,
            message: message.into(),
        }
    }
}
