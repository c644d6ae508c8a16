use anyhow::Context;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found")]
    NotFound,

    #[error("This post is not published")]
    PostNotPublished,

    #[error("Comment cannot be empty")]
    EmptyCommentBody,

    #[error("Title and body are required")]
    EmptyPostField,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Request timed out")]
    TimedOut,

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl Error {
    /// Maps a hosted-backend REST response into the shared taxonomy. The
    /// backend reports failures as a JSON object with a `message` field and
    /// an HTTP status; anything unparseable degrades to `Unknown`.
    pub fn from_backend(status: u16, body: &[u8]) -> Error {
        let message = || -> anyhow::Result<String> {
            let data: serde_json::Value =
                serde_json::from_slice(body).context("parsing error contents")?;
            Ok(data
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("")
                .to_string())
        };
        match status {
            401 | 403 => Error::PermissionDenied,
            404 | 406 => Error::NotFound,
            _ => Error::Unknown(message().unwrap_or_else(|_| format!("status {}", status))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_statuses_map_to_taxonomy() {
        assert_eq!(Error::from_backend(403, b"{}"), Error::PermissionDenied);
        assert_eq!(Error::from_backend(404, b"not json"), Error::NotFound);
        assert_eq!(
            Error::from_backend(500, br#"{"message":"boom"}"#),
            Error::Unknown(String::from("boom"))
        );
        assert_eq!(
            Error::from_backend(500, b"garbage"),
            Error::Unknown(String::from("status 500"))
        );
    }
}
