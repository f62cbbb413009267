/// Failures talking to the backend.
///
/// A `success: false` body is not an error here: it decodes fine and the
/// controllers surface the backend's own message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response ({status}): {reason}")]
    Decode { status: u16, reason: String },

    #[error("could not build request: {0}")]
    Encode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Failures acquiring or sampling the camera.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
    #[error("camera is not supported on this device")]
    Unsupported,

    #[error("camera access denied: {0}")]
    Denied(String),

    #[error("no camera session is open")]
    NoSession,

    #[error("camera feed has no frame yet")]
    NotReady,

    #[error("could not encode snapshot: {0}")]
    Encode(String),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Reasons a submit is refused before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("no image selected")]
    NoImage,

    #[error("a request is already in flight")]
    InFlight,
}
