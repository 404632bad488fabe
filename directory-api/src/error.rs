use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum DirectoryApiError {
    Api(StatusCode, String),
    Dataset(String),
    Internal(ApiError),
}

impl DirectoryApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DirectoryApiError::Api(status, _) => Some(*status),
            _ => None,
        }
    }

    /// True for 401/403, which the server uses for missing or rejected admin tokens.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }
}

impl From<ApiError> for DirectoryApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                let message = match serde_json::from_str::<ErrorResponse>(&detail) {
                    Ok(response) => response.error,
                    Err(_) => detail,
                };
                DirectoryApiError::Api(status, message)
            }
            e => DirectoryApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for DirectoryApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryApiError::Internal(e) => write!(f, "Internal error: {}", e),
            DirectoryApiError::Dataset(message) => write!(f, "City dataset error: {}", message),
            DirectoryApiError::Api(status, message) => write!(f, "({}) {}", status, message),
        }
    }
}

impl std::error::Error for DirectoryApiError {}

/// Error body returned by the directory server: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
