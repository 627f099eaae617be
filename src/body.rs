use bytes::Bytes;

/// Outgoing request body shapes supported by the executor.
pub enum Body {
    /// No body (GET, empty POST).
    Empty,
    /// UTF-8 text sent verbatim with the given content type.
    Json {
        text: String,
        content_type: String,
    },
    /// Raw bytes sent as a single multipart form part.
    Binary(Bytes),
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Empty => write!(f, "Body::Empty"),
            Body::Json { content_type, text } => f
                .debug_struct("Body::Json")
                .field("content_type", content_type)
                .field("len", &text.len())
                .finish(),
            Body::Binary(bytes) => f.debug_tuple("Body::Binary").field(&bytes.len()).finish(),
        }
    }
}

impl Body {
    /// Create an empty body
    pub fn empty() -> Self {
        Body::Empty
    }

    /// Create a JSON text body with the default `application/json` content type
    pub fn json(text: impl Into<String>) -> Self {
        Body::Json {
            text: text.into(),
            content_type: "application/json".to_string(),
        }
    }

    /// Create a text body with a caller-supplied content type
    pub fn json_with_content_type(text: impl Into<String>, content_type: impl Into<String>) -> Self {
        Body::Json {
            text: text.into(),
            content_type: content_type.into(),
        }
    }

    /// Create a binary body from raw bytes
    pub fn binary(bytes: impl Into<Bytes>) -> Self {
        Body::Binary(bytes.into())
    }

    /// Check if body is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Empty
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Binary(Bytes::from(v))
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Binary(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults_content_type() {
        let Body::Json { content_type, .. } = Body::json("{}") else {
            panic!("expected Body::Json");
        };
        assert_eq!(content_type, "application/json");
    }

    #[test]
    fn test_bytes_become_binary() {
        let body: Body = vec![0u8, 1, 2].into();
        assert!(matches!(body, Body::Binary(b) if b.len() == 3));
    }

    #[test]
    fn test_debug_hides_content() {
        let body = Body::binary(vec![1u8; 64]);
        assert_eq!(format!("{body:?}"), "Body::Binary(64)");
    }
}
