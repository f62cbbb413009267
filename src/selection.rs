use crate::types::{ClassificationMode, ImageSource, UploadPayload};

/// Displayable handle for the pending image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Preview {
    /// Blob-backed URL the page created and must revoke.
    ObjectUrl(String),
    /// Self-contained URL (data URL, file path) with nothing to release.
    Inline(String),
}

impl Preview {
    pub fn url(&self) -> &str {
        match self {
            Preview::ObjectUrl(url) | Preview::Inline(url) => url,
        }
    }
}

/// Holds at most one pending image and its preview.
///
/// Mutators hand back the superseded object URL, if any, so the caller can
/// release it. Nothing else here touches the browser.
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Option<ImageSource>,
    preview: Option<Preview>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, source: ImageSource, preview: Option<Preview>) -> Option<String> {
        let released = self.take_releasable();
        self.current = Some(source);
        self.preview = preview;
        released
    }

    pub fn clear(&mut self) -> Option<String> {
        let released = self.take_releasable();
        self.current = None;
        self.preview = None;
        released
    }

    pub fn current(&self) -> Option<&ImageSource> {
        self.current.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Placeholder shows whenever nothing is selected.
    pub fn shows_placeholder(&self) -> bool {
        self.current.is_none()
    }

    pub fn payload(&self, mode: ClassificationMode) -> Option<UploadPayload> {
        self.current.as_ref().map(|source| UploadPayload {
            bytes: source.bytes().to_vec(),
            file_name: source.upload_name().to_string(),
            mime: source.mime().to_string(),
            mode,
        })
    }

    fn take_releasable(&mut self) -> Option<String> {
        match self.preview.take() {
            Some(Preview::ObjectUrl(url)) => Some(url),
            _ => None,
        }
    }
}
