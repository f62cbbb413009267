use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Classification context picked on the exclusive mode selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    #[default]
    Food,
    Place,
}

impl ClassificationMode {
    pub const ALL: [ClassificationMode; 2] = [ClassificationMode::Food, ClassificationMode::Place];

    /// Value sent as the `choice` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationMode::Food => "food",
            ClassificationMode::Place => "place",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClassificationMode::Food => "Dish",
            ClassificationMode::Place => "Landmark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "food" => Some(ClassificationMode::Food),
            "place" => Some(ClassificationMode::Place),
            _ => None,
        }
    }
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag reported by the classifier.
///
/// The backend has shipped both English and Vietnamese tags, so both spellings
/// map onto the same variant.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ResultKind {
    Food,
    Place,
    Unknown,
    Other(String),
}

impl From<String> for ResultKind {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "place" | "địa điểm" => ResultKind::Place,
            "food" | "món ăn" => ResultKind::Food,
            "unknown" => ResultKind::Unknown,
            _ => ResultKind::Other(raw),
        }
    }
}

impl From<&str> for ResultKind {
    fn from(raw: &str) -> Self {
        ResultKind::from(raw.to_string())
    }
}

/// A JPEG snapshot taken from the live camera feed.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub width: u32,
    pub height: u32,
}

pub const CAPTURE_FILE_NAME: &str = "captured.jpg";
pub const CAPTURE_MIME: &str = "image/jpeg";

/// Where the pending image came from.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    File {
        name: String,
        mime: String,
        bytes: Vec<u8>,
    },
    Captured(CapturedImage),
}

impl ImageSource {
    pub fn from_file(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name).to_string();
        ImageSource::File { name, mime, bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ImageSource::File { bytes, .. } => bytes,
            ImageSource::Captured(image) => &image.bytes,
        }
    }

    pub fn mime(&self) -> &str {
        match self {
            ImageSource::File { mime, .. } => mime,
            ImageSource::Captured(image) => &image.mime,
        }
    }

    /// File name used for the multipart `image` part.
    pub fn upload_name(&self) -> &str {
        match self {
            ImageSource::File { name, .. } if !name.trim().is_empty() => name,
            ImageSource::File { .. } => "upload.jpg",
            ImageSource::Captured(_) => CAPTURE_FILE_NAME,
        }
    }
}

/// Best-effort MIME type from a file extension. No validation is done on the
/// content itself.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Everything needed to build one `POST /predict` body.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
    pub mode: ClassificationMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusTone {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusTone::Info => "status-info",
            StatusTone::Success => "status-success",
            StatusTone::Warning => "status-warning",
            StatusTone::Error => "status-error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusLine {
    pub tone: StatusTone,
    pub text: String,
}

impl StatusLine {
    pub fn new(tone: StatusTone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Body of `POST /predict`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub low_confidence: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub kind: Option<ResultKind>,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatSource {
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
}

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub sources: Vec<ChatSource>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn css_class(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Bot => "bot",
        }
    }
}

/// Content of a transcript bubble. `Text` is always escaped on display;
/// `Markup` has already been produced by a markdown renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnBody {
    Text(String),
    Markup(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub body: TurnBody,
    pub pending: bool,
    pub created_at: Option<OffsetDateTime>,
}
