/// Error types shared across the application
///
/// `ApiError` captures everything that can go wrong talking to the
/// profile backend. The variants hold plain strings so the type stays
/// `Clone` and can travel inside `Message` payloads back to the UI.
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Could not reach the backend at all (DNS, refused, timeout)
    #[error("connection failed: {0}")]
    Connection(String),

    /// The backend answered with a non-success HTTP status
    #[error("server returned status {0}")]
    Status(u16),

    /// The response body could not be decoded as the expected JSON
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The file selected for upload could not be read
    #[error("could not read upload file: {0}")]
    UploadFile(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Connection(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ApiError::Status(404);
        assert_eq!(err.to_string(), "server returned status 404");

        let err = ApiError::Connection("refused".to_string());
        assert!(err.to_string().contains("refused"));
    }
}
