//! Integration tests for the capture-and-submit workflow
//!
//! Drives `UploadWorkflow` against a scripted backend the same way the
//! upload view does: begin, await the backend, finish.

mod common;

use common::{ScriptedBackend, place_result};
use lens::api::LensBackend;
use lens::error::{ApiError, SubmitRejected};
use lens::render::ComrakRenderer;
use lens::selection::Preview;
use lens::submit::{
    CONNECTION_ERROR_TEXT, GENERIC_FAILURE_TEXT, LOW_CONFIDENCE_TEXT, NO_IMAGE_TEXT,
    PLACEHOLDER_TEXT, Resolution,
};
use lens::types::{CapturedImage, ClassificationMode, ImageSource, PredictResponse, StatusTone};
use lens::workflow::UploadWorkflow;

fn workflow() -> UploadWorkflow {
    UploadWorkflow::new(ClassificationMode::Food, 0.8)
}

fn snapshot() -> ImageSource {
    ImageSource::Captured(CapturedImage {
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        mime: "image/jpeg".to_string(),
        width: 1280,
        height: 720,
    })
}

async fn run_submit(
    workflow: &mut UploadWorkflow,
    backend: &ScriptedBackend,
) -> Result<Resolution, SubmitRejected> {
    let ticket = workflow.begin_submit()?;
    assert!(!workflow.submission().is_submit_enabled());
    let outcome = backend.predict(&ticket.upload).await;
    Ok(workflow.finish_submit(&ticket, outcome, Some(&ComrakRenderer)))
}

mod submit_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_selection_makes_no_request() {
        let backend = ScriptedBackend::predicting(Ok(place_result(0.9)));
        let mut workflow = workflow();

        let result = run_submit(&mut workflow, &backend).await;

        assert_eq!(result, Err(SubmitRejected::NoImage));
        assert_eq!(backend.calls(), 0);
        assert_eq!(workflow.submission().status().text, NO_IMAGE_TEXT);
        assert!(workflow.submission().is_submit_enabled());
    }

    #[tokio::test]
    async fn test_success_renders_result_and_map_link() {
        let backend = ScriptedBackend::predicting(Ok(place_result(0.8675)));
        let mut workflow = workflow();
        workflow.set_mode(ClassificationMode::Place);
        workflow.select(snapshot(), None);

        let resolution = run_submit(&mut workflow, &backend).await.unwrap();
        assert_eq!(resolution, Resolution::Applied);

        let upload = &backend.uploads.borrow()[0];
        assert_eq!(upload.mode, ClassificationMode::Place);
        assert_eq!(upload.file_name, "captured.jpg");

        let submission = workflow.submission();
        assert!(submission.is_submit_enabled());
        assert_eq!(submission.status().tone, StatusTone::Success);
        let result = submission.result().expect("result rendered");
        assert!(result.body_html.contains("<strong>1966</strong>"));
        assert!(result.map_link.is_some());
        assert_eq!(result.confidence_text, "86.8%");
    }

    #[tokio::test]
    async fn test_low_confidence_warning() {
        let mut response = place_result(0.42);
        response.low_confidence = true;
        let backend = ScriptedBackend::predicting(Ok(response));
        let mut workflow = workflow();
        workflow.select(ImageSource::from_file("palace.jpg", vec![1, 2]), None);

        run_submit(&mut workflow, &backend).await.unwrap();

        let status = workflow.submission().status();
        assert_eq!(status.tone, StatusTone::Warning);
        assert_eq!(status.text, LOW_CONFIDENCE_TEXT);
        assert!(workflow.submission().result().unwrap().map_link.is_none());
    }

    #[tokio::test]
    async fn test_every_outcome_reenables_submit() {
        let rejected = PredictResponse {
            success: false,
            error: None,
            low_confidence: false,
            message: String::new(),
            kind: None,
            class_name: None,
            confidence: None,
        };
        let outcomes = vec![
            (Ok(place_result(0.9)), StatusTone::Success, None),
            (Ok(rejected), StatusTone::Error, Some(GENERIC_FAILURE_TEXT)),
            (
                Err(ApiError::Transport("connection refused".into())),
                StatusTone::Error,
                Some(CONNECTION_ERROR_TEXT),
            ),
            (
                Err(ApiError::Decode {
                    status: 500,
                    reason: "expected value".into(),
                }),
                StatusTone::Error,
                Some(CONNECTION_ERROR_TEXT),
            ),
        ];

        for (outcome, tone, text) in outcomes {
            let backend = ScriptedBackend::predicting(outcome);
            let mut workflow = workflow();
            workflow.select(snapshot(), None);

            run_submit(&mut workflow, &backend).await.unwrap();

            assert!(workflow.submission().is_submit_enabled());
            assert_eq!(workflow.submission().status().tone, tone);
            if let Some(text) = text {
                assert_eq!(workflow.submission().status().text, text);
            }
        }
    }
}

mod stale_response_tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_during_request_discards_response() {
        let backend = ScriptedBackend::predicting(Ok(place_result(0.95)));
        let mut workflow = workflow();
        workflow.select(snapshot(), None);

        let ticket = workflow.begin_submit().unwrap();
        workflow.clear();
        let outcome = backend.predict(&ticket.upload).await;
        let resolution = workflow.finish_submit(&ticket, outcome, None);

        assert_eq!(resolution, Resolution::Stale);
        assert!(workflow.submission().result().is_none());
        assert_eq!(workflow.submission().status().text, PLACEHOLDER_TEXT);
        assert!(workflow.submission().is_submit_enabled());
    }

    #[tokio::test]
    async fn test_new_selection_during_request_discards_response() {
        let backend = ScriptedBackend::predicting(Ok(place_result(0.95)));
        let mut workflow = workflow();
        workflow.select(snapshot(), None);

        let ticket = workflow.begin_submit().unwrap();
        workflow.select(ImageSource::from_file("pho.jpg", vec![7]), None);
        let outcome = backend.predict(&ticket.upload).await;

        assert_eq!(
            workflow.finish_submit(&ticket, outcome, None),
            Resolution::Stale
        );
        assert!(workflow.submission().result().is_none());
        assert_eq!(workflow.submission().status().text, PLACEHOLDER_TEXT);
    }
}

mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_hides_preview_and_result() {
        let backend = ScriptedBackend::predicting(Ok(place_result(0.9)));
        let mut workflow = workflow();
        workflow.select(snapshot(), Some(Preview::ObjectUrl("blob:one".into())));
        run_submit(&mut workflow, &backend).await.unwrap();
        assert!(workflow.submission().result().is_some());

        let released = workflow.clear();

        assert_eq!(released.as_deref(), Some("blob:one"));
        assert!(workflow.selection().shows_placeholder());
        assert!(workflow.selection().preview().is_none());
        assert!(workflow.selection().current().is_none());
        assert!(workflow.submission().result().is_none());
        assert_eq!(workflow.submission().status().text, PLACEHOLDER_TEXT);

        assert_eq!(workflow.clear(), None);
    }

    #[test]
    fn test_capture_replaces_file() {
        let mut workflow = workflow();
        workflow.select(
            ImageSource::from_file("pho.png", vec![1]),
            Some(Preview::ObjectUrl("blob:file".into())),
        );
        let released = workflow.select(snapshot(), Some(Preview::ObjectUrl("blob:snap".into())));

        assert_eq!(released.as_deref(), Some("blob:file"));
        assert!(matches!(
            workflow.selection().current(),
            Some(ImageSource::Captured(_))
        ));
    }
}
