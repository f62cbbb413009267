//! Shared fakes for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lens::api::LensBackend;
use lens::error::{ApiError, ApiResult};
use lens::types::{ChatResponse, PredictResponse, ResultKind, UploadPayload};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Backend that replays canned outcomes and records every call.
#[derive(Default)]
pub struct ScriptedBackend {
    pub predictions: RefCell<VecDeque<ApiResult<PredictResponse>>>,
    pub answers: RefCell<VecDeque<ApiResult<ChatResponse>>>,
    pub uploads: RefCell<Vec<UploadPayload>>,
    pub messages: RefCell<Vec<String>>,
}

impl ScriptedBackend {
    pub fn predicting(outcome: ApiResult<PredictResponse>) -> Self {
        let backend = Self::default();
        backend.predictions.borrow_mut().push_back(outcome);
        backend
    }

    pub fn answering(outcome: ApiResult<ChatResponse>) -> Self {
        let backend = Self::default();
        backend.answers.borrow_mut().push_back(outcome);
        backend
    }

    pub fn calls(&self) -> usize {
        self.uploads.borrow().len() + self.messages.borrow().len()
    }
}

#[async_trait(?Send)]
impl LensBackend for ScriptedBackend {
    async fn predict(&self, upload: &UploadPayload) -> ApiResult<PredictResponse> {
        self.uploads.borrow_mut().push(upload.clone());
        self.predictions
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".into())))
    }

    async fn chat(&self, message: &str) -> ApiResult<ChatResponse> {
        self.messages.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".into())))
    }
}

pub fn place_result(confidence: f64) -> PredictResponse {
    PredictResponse {
        success: true,
        error: None,
        low_confidence: false,
        message: "## Independence Palace\nOpened in **1966**.".to_string(),
        kind: Some(ResultKind::Place),
        class_name: Some("Independence Palace".to_string()),
        confidence: Some(confidence),
    }
}
