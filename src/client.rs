//! HTTP client for the prediction service.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::model::{DatasetStatsResponse, ModelInfoResponse, PredictionRequest, PredictionResponse};

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// The three endpoints the dashboard consumes.
pub trait Backend: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ClientError>;
    fn dataset_stats(&self) -> Result<DatasetStatsResponse, ClientError>;
    fn model_info(&self) -> Result<ModelInfoResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .build();
        HttpBackend { agent, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(path, "GET");
        decode(self.agent.get(&self.url(path)).call())
    }
}

impl Backend for HttpBackend {
    fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, ClientError> {
        debug!(?request, "POST /predict");
        let body = serde_json::to_string(request).map_err(|e| ClientError::Decode(e.to_string()))?;
        decode(
            self.agent
                .post(&self.url("/predict"))
                .set("Content-Type", "application/json")
                .send_string(&body),
        )
    }

    fn dataset_stats(&self) -> Result<DatasetStatsResponse, ClientError> {
        self.get_json("/dataset_stats")
    }

    fn model_info(&self) -> Result<ModelInfoResponse, ClientError> {
        self.get_json("/model_info")
    }
}

// The service answers failures with a JSON envelope on 4xx/5xx, so an error
// status is decoded like any other body and only reported when that fails.
fn decode<T: DeserializeOwned>(result: Result<ureq::Response, ureq::Error>) -> Result<T, ClientError> {
    match result {
        Ok(response) => {
            let body = read_body(response)?;
            serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
        }
        Err(ureq::Error::Status(status, response)) => {
            let body = read_body(response)?;
            serde_json::from_str(&body).map_err(|_| ClientError::Status { status, body })
        }
        Err(ureq::Error::Transport(transport)) => Err(ClientError::Transport(transport.to_string())),
    }
}

fn read_body(response: ureq::Response) -> Result<String, ClientError> {
    use std::io::Read;

    let mut body = String::new();
    response
        .into_reader()
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_string(&mut body)
        .map_err(|e| ClientError::Transport(e.to_string()))?;
    if body.len() > MAX_BODY_BYTES {
        return Err(ClientError::Decode(format!("response exceeded {MAX_BODY_BYTES} bytes")));
    }
    Ok(body)
}
