use bytes::Bytes;
use http::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// `status` value the API uses to report success.
pub const STATUS_SUCCESS: &str = "success";
/// `status` value used for every normalized failure.
pub const STATUS_ERROR: &str = "error";

/// Raw result of one network attempt, before normalization: either the
/// transport completed and produced a status code plus body bytes, or it
/// failed outright (DNS, TLS, connection refusal, timeout).
#[derive(Debug)]
pub(crate) enum RawOutcome {
    Completed { status: StatusCode, body: Bytes },
    Failed(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Uniform response envelope returned by every operation.
///
/// `status`, `message`, and `message_detail` come from the API verbatim when
/// the server produced a parseable body; otherwise they are synthesized by
/// [`normalize`]. The payload type `D` carries the endpoint-specific `data`
/// shape. All fields are lenient on deserialization so whatever the server
/// sent is passed through unaltered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "D: Deserialize<'de>"))]
pub struct ApiResponse<D> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "messageDetail")]
    pub message_detail: Option<String>,
    #[serde(default)]
    pub data: Option<D>,
}

impl<D> ApiResponse<D> {
    /// Whether the API reported success
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Synthesize an error envelope from a message/detail pair
    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: Some(message.into()),
            message_detail: Some(detail.into()),
            data: None,
        }
    }

    /// Synthesize an error envelope for a status code outside {200, 400, 401}
    fn http_error(status: StatusCode) -> Self {
        Self::error(
            status.as_u16().to_string(),
            status.canonical_reason().unwrap_or("unknown status"),
        )
    }

    /// Synthesize an error envelope from a transport or deserialization failure
    fn from_failure(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::error(err.to_string(), error_detail(err))
    }
}

/// Convert a raw transport outcome into the uniform envelope.
///
/// 200, 400, and 401 are the codes for which this API puts its own error
/// semantics inside the JSON body, so those bodies are deserialized and
/// trusted verbatim. Any other status is assumed to carry no parseable body
/// (gateway or framework failure) and is normalized generically. Transport
/// and deserialization failures take the exception path. This function never
/// fails: every outcome becomes exactly one envelope.
pub(crate) fn normalize<D: DeserializeOwned>(outcome: RawOutcome) -> ApiResponse<D> {
    match outcome {
        RawOutcome::Completed { status, body }
            if status == StatusCode::OK
                || status == StatusCode::BAD_REQUEST
                || status == StatusCode::UNAUTHORIZED =>
        {
            match serde_json::from_slice::<ApiResponse<D>>(&body) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(%status, error = %err, "response body did not deserialize");
                    ApiResponse::from_failure(&err)
                }
            }
        }
        RawOutcome::Completed { status, .. } => {
            warn!(%status, "unexpected status, normalizing generically");
            ApiResponse::http_error(status)
        }
        RawOutcome::Failed(err) => {
            warn!(error = %err, "transport failure");
            ApiResponse::from_failure(err.as_ref())
        }
    }
}

/// Walk the error's cause chain and concatenate the messages
fn error_detail(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = Vec::new();
    let mut cause = err.source();
    while let Some(c) = cause {
        parts.push(c.to_string());
        cause = c.source();
    }
    if parts.is_empty() {
        "no further detail".to_string()
    } else {
        parts.join(": ")
    }
}
