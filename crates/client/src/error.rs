use serde::Deserialize;
use thiserror::Error;

/// Gateway failure. `Remote` carries the backend's own message when the
/// error body has one; the other variants surface the caller's generic
/// per-operation message and keep the technical cause out of user view.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Decode { message: String },
}

impl ApiError {
    /// True when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Remote { status: 401, .. })
    }

    /// True when the backend reported the resource missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: 404, .. })
    }
}

/// Shape of the backend's structured error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Pulls the backend's `message` out of an error body, falling back to the
/// operation's generic message when the body is empty or unstructured.
pub(crate) fn remote_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub(crate) fn map_transport(error: reqwest::Error, fallback: &str) -> ApiError {
    tracing::warn!(error = %error, "request failed before a response arrived");
    ApiError::Transport {
        message: fallback.to_string(),
        source: error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_backend_message() {
        let message = remote_message(r#"{"message":"Email già in uso"}"#, "failed to update");
        assert_eq!(message, "Email già in uso");
    }

    #[test]
    fn falls_back_on_unstructured_bodies() {
        assert_eq!(
            remote_message("<html>502</html>", "failed to fetch records"),
            "failed to fetch records"
        );
        assert_eq!(remote_message("", "failed to fetch records"), "failed to fetch records");
        assert_eq!(
            remote_message(r#"{"message":""}"#, "failed to fetch records"),
            "failed to fetch records"
        );
    }
}
