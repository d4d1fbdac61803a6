#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use scholarship_dashboard::client::{Backend, ClientError};
use scholarship_dashboard::model::{DatasetStatsResponse, ModelInfoResponse, PredictionRequest, PredictionResponse};

pub const STATS_OK: &str = r#"{"success":true,"stats":{"total_samples":2000,"eligible_count":812,"not_eligible_count":1188,"eligible_percentage":40.6}}"#;

pub const MODELS_OK: &str = r#"{"success":true,"results":{
    "Logistic Regression":{"accuracy":0.8825,"precision":0.86,"recall":0.84,"f1_score":0.85},
    "Decision Tree":{"accuracy":0.9,"precision":0.88,"recall":0.89,"f1_score":0.885},
    "Random Forest":{"accuracy":0.9375,"precision":0.93,"recall":0.92,"f1_score":0.925}
}}"#;

pub const PREDICT_OK: &str = r#"{"success":true,"prediction":1,"probability":{"not_eligible":0.266,"eligible":0.734},
    "all_predictions":{"Random Forest":1,"Decision Tree":0},
    "all_probabilities":{"Random Forest":{"eligible":0.734},"Decision Tree":{"eligible":0.41}},
    "model_used":"Random Forest"}"#;

/// Canned backend: each endpoint answers with a JSON body, or fails with a
/// transport error when the body is `Err`.
pub struct FakeBackend {
    pub predict_body: Result<String, String>,
    pub stats_body: Result<String, String>,
    pub models_body: Result<String, String>,
    pub predict_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub models_calls: AtomicUsize,
    pub last_request: Mutex<Option<PredictionRequest>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend {
            predict_body: Ok(PREDICT_OK.to_string()),
            stats_body: Ok(STATS_OK.to_string()),
            models_body: Ok(MODELS_OK.to_string()),
            predict_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
            models_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_predict(mut self, body: &str) -> Self {
        self.predict_body = Ok(body.to_string());
        self
    }

    pub fn with_models(mut self, body: Result<&str, &str>) -> Self {
        self.models_body = body.map(str::to_string).map_err(str::to_string);
        self
    }

    pub fn with_stats(mut self, body: Result<&str, &str>) -> Self {
        self.stats_body = body.map(str::to_string).map_err(str::to_string);
        self
    }

    pub fn failing_predict(mut self, message: &str) -> Self {
        self.predict_body = Err(message.to_string());
        self
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.predict_calls.load(Ordering::SeqCst),
            self.stats_calls.load(Ordering::SeqCst),
            self.models_calls.load(Ordering::SeqCst),
        )
    }
}

fn answer<T: serde::de::DeserializeOwned>(body: &Result<String, String>) -> Result<T, ClientError> {
    match body {
        Ok(json) => serde_json::from_str(json).map_err(|e| ClientError::Decode(e.to_string())),
        Err(message) => Err(ClientError::Transport(message.clone())),
    }
}

impl Backend for FakeBackend {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ClientError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        answer(&self.predict_body)
    }

    fn dataset_stats(&self) -> Result<DatasetStatsResponse, ClientError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.stats_body)
    }

    fn model_info(&self) -> Result<ModelInfoResponse, ClientError> {
        self.models_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.models_body)
    }
}
