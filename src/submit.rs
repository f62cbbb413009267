use crate::error::{ApiError, SubmitRejected};
use crate::render::{MarkdownRenderer, RenderedResult, render_result};
use crate::types::{PredictResponse, StatusLine, StatusTone, UploadPayload};
use tracing::{debug, info, warn};

pub const PLACEHOLDER_TEXT: &str = "Results will appear here…";
pub const NO_IMAGE_TEXT: &str = "Please choose an image first.";
pub const ANALYZING_TEXT: &str = "Analyzing…";
pub const DONE_TEXT: &str = "Done.";
pub const LOW_CONFIDENCE_TEXT: &str = "Low confidence. Treat this result with care.";
pub const GENERIC_FAILURE_TEXT: &str = "Something went wrong.";
pub const CONNECTION_ERROR_TEXT: &str = "Connection error.";

/// One outbound classification request. The generation ties the response
/// back to the state it was issued from.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitTicket {
    pub generation: u64,
    pub upload: UploadPayload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The page moved on while the request was out; only the control was
    /// re-enabled.
    Stale,
}

/// Status line, result display and the single in-flight slot of the
/// upload card.
#[derive(Debug)]
pub struct SubmissionController {
    in_flight: bool,
    generation: u64,
    status: StatusLine,
    result: Option<RenderedResult>,
    map_threshold: f64,
}

impl SubmissionController {
    pub fn new(map_threshold: f64) -> Self {
        Self {
            in_flight: false,
            generation: 0,
            status: StatusLine::new(StatusTone::Info, PLACEHOLDER_TEXT),
            result: None,
            map_threshold,
        }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn result(&self) -> Option<&RenderedResult> {
        self.result.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_submit_enabled(&self) -> bool {
        !self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn show_status(&mut self, status: StatusLine) {
        self.status = status;
    }

    /// Start a submit for `upload`. `None` means nothing is selected: the
    /// status says so and no request may be made.
    pub fn begin(&mut self, upload: Option<UploadPayload>) -> Result<SubmitTicket, SubmitRejected> {
        if self.in_flight {
            return Err(SubmitRejected::InFlight);
        }
        let Some(upload) = upload else {
            self.status = StatusLine::new(StatusTone::Error, NO_IMAGE_TEXT);
            return Err(SubmitRejected::NoImage);
        };

        self.in_flight = true;
        self.status = StatusLine::new(StatusTone::Info, ANALYZING_TEXT);
        self.result = None;
        info!(mode = %upload.mode, generation = self.generation, "submitting image");
        Ok(SubmitTicket {
            generation: self.generation,
            upload,
        })
    }

    /// Apply the outcome of `ticket`'s request. Always re-enables submit.
    pub fn finish(
        &mut self,
        ticket: &SubmitTicket,
        outcome: Result<PredictResponse, ApiError>,
        renderer: Option<&dyn MarkdownRenderer>,
    ) -> Resolution {
        self.in_flight = false;

        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale classification response"
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(response) if !response.success => {
                let text = response
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_TEXT.to_string());
                warn!(error = %text, "backend rejected the image");
                self.status = StatusLine::new(StatusTone::Error, text);
            }
            Ok(response) => {
                self.status = if response.low_confidence {
                    StatusLine::new(StatusTone::Warning, LOW_CONFIDENCE_TEXT)
                } else {
                    StatusLine::new(StatusTone::Success, DONE_TEXT)
                };
                self.result = Some(render_result(&response, renderer, self.map_threshold));
                info!(low_confidence = response.low_confidence, "classification complete");
            }
            Err(err) => {
                warn!(%err, "classification request failed");
                self.status = StatusLine::new(StatusTone::Error, CONNECTION_ERROR_TEXT);
            }
        }
        Resolution::Applied
    }

    /// A new image replaced the old one; any outstanding response is stale.
    pub fn supersede(&mut self) {
        self.generation += 1;
        if self.in_flight {
            self.status = StatusLine::new(StatusTone::Info, PLACEHOLDER_TEXT);
        }
    }

    /// Back to the empty card: stale guard bumped, result and status cleared.
    pub fn reset(&mut self) {
        self.supersede();
        self.result = None;
        self.status = StatusLine::new(StatusTone::Info, PLACEHOLDER_TEXT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PlainTextRenderer;
    use crate::types::{ClassificationMode, ResultKind};

    fn upload() -> UploadPayload {
        UploadPayload {
            bytes: vec![1, 2, 3],
            file_name: "pho.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            mode: ClassificationMode::Food,
        }
    }

    fn response(low_confidence: bool) -> PredictResponse {
        PredictResponse {
            success: true,
            error: None,
            low_confidence,
            message: "Noodle soup.".to_string(),
            kind: Some(ResultKind::Food),
            class_name: Some("Phở".to_string()),
            confidence: Some(0.91),
        }
    }

    #[test]
    fn test_no_image_sets_status_and_stays_enabled() {
        let mut controller = SubmissionController::new(0.8);
        assert_eq!(controller.begin(None), Err(SubmitRejected::NoImage));
        assert_eq!(controller.status().text, NO_IMAGE_TEXT);
        assert_eq!(controller.status().tone, StatusTone::Error);
        assert!(controller.is_submit_enabled());
    }

    #[test]
    fn test_second_begin_while_in_flight_is_refused() {
        let mut controller = SubmissionController::new(0.8);
        let ticket = controller.begin(Some(upload())).unwrap();
        assert!(!controller.is_submit_enabled());
        assert_eq!(controller.status().text, ANALYZING_TEXT);
        assert_eq!(controller.begin(Some(upload())), Err(SubmitRejected::InFlight));

        controller.finish(&ticket, Ok(response(false)), Some(&PlainTextRenderer));
        assert!(controller.is_submit_enabled());
        assert_eq!(controller.status().tone, StatusTone::Success);
    }

    #[test]
    fn test_low_confidence_uses_warning_tone() {
        let mut controller = SubmissionController::new(0.8);
        let ticket = controller.begin(Some(upload())).unwrap();
        controller.finish(&ticket, Ok(response(true)), None);
        assert_eq!(controller.status().tone, StatusTone::Warning);
        assert!(controller.result().is_some());
    }

    #[test]
    fn test_failure_body_uses_backend_text_or_fallback() {
        let mut controller = SubmissionController::new(0.8);
        let ticket = controller.begin(Some(upload())).unwrap();
        let mut failed = response(false);
        failed.success = false;
        failed.error = Some("Corrupt image".to_string());
        controller.finish(&ticket, Ok(failed.clone()), None);
        assert_eq!(controller.status().text, "Corrupt image");
        assert!(controller.result().is_none());

        let ticket = controller.begin(Some(upload())).unwrap();
        failed.error = None;
        controller.finish(&ticket, Ok(failed), None);
        assert_eq!(controller.status().text, GENERIC_FAILURE_TEXT);
        assert!(controller.is_submit_enabled());
    }

    #[test]
    fn test_reset_discards_late_response() {
        let mut controller = SubmissionController::new(0.8);
        let ticket = controller.begin(Some(upload())).unwrap();
        controller.reset();
        let resolution = controller.finish(&ticket, Ok(response(false)), None);
        assert_eq!(resolution, Resolution::Stale);
        assert!(controller.result().is_none());
        assert_eq!(controller.status().text, PLACEHOLDER_TEXT);
        assert!(controller.is_submit_enabled());
    }
}
