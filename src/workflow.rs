use crate::error::{ApiError, SubmitRejected};
use crate::render::MarkdownRenderer;
use crate::selection::{Preview, SelectionState};
use crate::submit::{Resolution, SubmissionController, SubmitTicket};
use crate::types::{ClassificationMode, ImageSource, PredictResponse, StatusLine, StatusTone};

pub const STARTING_CAMERA_TEXT: &str = "Starting camera…";
pub const CAMERA_FAILED_TEXT: &str = "Cannot access the camera.";

/// The upload card: one pending image, the chosen mode, and the submit
/// lifecycle. Keeps the selection and the stale-response guard in step.
#[derive(Debug)]
pub struct UploadWorkflow {
    selection: SelectionState,
    submission: SubmissionController,
    mode: ClassificationMode,
}

impl UploadWorkflow {
    pub fn new(mode: ClassificationMode, map_threshold: f64) -> Self {
        Self {
            selection: SelectionState::new(),
            submission: SubmissionController::new(map_threshold),
            mode,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn submission(&self) -> &SubmissionController {
        &self.submission
    }

    pub fn mode(&self) -> ClassificationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ClassificationMode) {
        self.mode = mode;
    }

    /// Replace the pending image. Returns an object URL to revoke.
    pub fn select(&mut self, source: ImageSource, preview: Option<Preview>) -> Option<String> {
        self.submission.supersede();
        self.selection.set(source, preview)
    }

    /// Drop the image and the result display. Returns an object URL to revoke.
    pub fn clear(&mut self) -> Option<String> {
        self.submission.reset();
        self.selection.clear()
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        let upload = self.selection.payload(self.mode);
        self.submission.begin(upload)
    }

    pub fn finish_submit(
        &mut self,
        ticket: &SubmitTicket,
        outcome: Result<PredictResponse, ApiError>,
        renderer: Option<&dyn MarkdownRenderer>,
    ) -> Resolution {
        self.submission.finish(ticket, outcome, renderer)
    }

    pub fn camera_starting(&mut self) {
        self.submission
            .show_status(StatusLine::new(StatusTone::Info, STARTING_CAMERA_TEXT));
    }

    pub fn camera_started(&mut self) {
        if self.submission.status().text == STARTING_CAMERA_TEXT {
            self.submission.show_status(StatusLine::new(StatusTone::Info, ""));
        }
    }

    pub fn camera_failed(&mut self) {
        self.submission
            .show_status(StatusLine::new(StatusTone::Error, CAMERA_FAILED_TEXT));
    }
}
