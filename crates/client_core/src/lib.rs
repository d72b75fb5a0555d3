use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::ErrorBody,
    protocol::{
        ExtractedFields, FeedbackAck, FeedbackRequest, PredictRequest, PredictionResult,
        EXTRACT_FILE_FIELD, EXTRACT_PATH, FEEDBACK_PATH, PREDICT_PATH,
    },
};
use tracing::{debug, info, warn};
use url::Url;

pub mod controller;
pub mod error;
pub mod form;
pub mod status;

pub use controller::{
    feedback::FeedbackController, prediction::PredictionController, upload::UploadController,
    ControllerOutcome,
};
pub use error::ClientError;
pub use form::{FeedbackForm, FileInput, ManualForm, TriggerControl, TriggerGuard};
pub use status::{render_prediction, show, Container, RegionView, StatusRegion};

/// A document picked for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The three calls the analyser page makes against its backend.
#[async_trait]
pub trait AnalyserApi: Send + Sync {
    async fn extract(&self, file: UploadFile) -> Result<ExtractedFields, ClientError>;
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, ClientError>;
    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct AnalyserClient {
    http: Client,
    base_url: Url,
}

impl AnalyserClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http(base_url, Client::new())
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Self::with_http(base_url, http)
    }

    pub fn with_http(base_url: &str, http: Client) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url.trim())?;
        // Endpoint paths are joined relative to the base, which needs a trailing slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl AnalyserApi for AnalyserClient {
    async fn extract(&self, file: UploadFile) -> Result<ExtractedFields, ClientError> {
        let url = self.endpoint(EXTRACT_PATH)?;
        info!(%url, filename = %file.filename, size_bytes = file.bytes.len(), "uploading report for extraction");

        let mut part = Part::bytes(file.bytes).file_name(file.filename);
        if let Some(mime_type) = file.mime_type.as_deref() {
            part = part.mime_str(mime_type).map_err(|err| {
                ClientError::InvalidUpload(format!("mime type {mime_type}: {err}"))
            })?;
        }
        let form = Form::new().part(EXTRACT_FILE_FIELD, part);

        let response = self.http.post(url).multipart(form).send().await?;
        let fields: ExtractedFields = read_json(response).await?;
        debug!(present = fields.present_values().len(), "extraction response parsed");
        Ok(fields)
    }

    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, ClientError> {
        let url = self.endpoint(PREDICT_PATH)?;
        info!(%url, fields = request.fields.len(), "submitting health metrics for prediction");
        let response = self.http.post(url).json(request).send().await?;
        read_json(response).await
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), ClientError> {
        let url = self.endpoint(FEEDBACK_PATH)?;
        info!(%url, "submitting feedback");
        let response = self.http.post(url).json(request).send().await?;
        let body: serde_json::Value = read_json(response).await?;
        if let Ok(FeedbackAck {
            success: Some(ack),
        }) = serde_json::from_value::<FeedbackAck>(body)
        {
            debug!(%ack, "feedback acknowledged");
        }
        Ok(())
    }
}

/// Decodes a success body, or turns a non-success status into
/// [`ClientError::Server`] carrying the body's `error` field when there is one.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message().map(str::to_string),
            Err(err) => {
                debug!(%status, error = %err, "error response carried no usable body");
                None
            }
        };
        warn!(%status, message = message.as_deref().unwrap_or(""), "analyser service rejected request");
        return Err(ClientError::Server { status, message });
    }
    Ok(response.json::<T>().await?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
