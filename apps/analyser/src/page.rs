//! The analyser and contact pages wired to their controllers.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use client_core::{
    controller::{feedback::FEEDBACK_LABEL, prediction::PREDICT_LABEL, upload::UPLOAD_LABEL},
    AnalyserApi, Container, FeedbackController, FeedbackForm, FileInput, ManualForm,
    PredictionController, StatusRegion, TriggerControl, UploadController, UploadFile,
};
use shared::domain::FormField;

pub struct AnalyserPage {
    pub file_input: FileInput,
    pub upload_status: StatusRegion,
    pub manual_form: ManualForm,
    pub result_text: StatusRegion,
    pub feedback_form: FeedbackForm,
    pub feedback_status: StatusRegion,
    pub upload: UploadController,
    pub prediction: PredictionController,
    pub feedback: FeedbackController,
}

impl AnalyserPage {
    pub fn new(api: Arc<dyn AnalyserApi>) -> Self {
        let file_input = FileInput::new();
        let upload_status = StatusRegion::new();
        let manual_form = ManualForm::new();
        let result_text = StatusRegion::new();
        let results_section = Container::hidden();
        let feedback_form = FeedbackForm::new();
        let feedback_status = StatusRegion::new();

        let upload = UploadController::new(
            Arc::clone(&api),
            file_input.clone(),
            TriggerControl::new(UPLOAD_LABEL),
            upload_status.clone(),
            manual_form.clone(),
        );
        let prediction = PredictionController::new(
            Arc::clone(&api),
            manual_form.clone(),
            TriggerControl::new(PREDICT_LABEL),
            result_text.clone(),
            results_section,
        );
        let feedback = FeedbackController::new(
            api,
            feedback_form.clone(),
            TriggerControl::new(FEEDBACK_LABEL),
            feedback_status.clone(),
        );

        Self {
            file_input,
            upload_status,
            manual_form,
            result_text,
            feedback_form,
            feedback_status,
            upload,
            prediction,
            feedback,
        }
    }

    /// Non-empty manual-form inputs, in page order.
    pub fn filled_fields(&self) -> Vec<(FormField, String)> {
        FormField::ALL
            .into_iter()
            .map(|field| (field, self.manual_form.get(field)))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }
}

pub async fn read_report(path: &Path) -> Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read report {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("report path has no file name: {}", path.display()))?;

    let file = UploadFile::new(filename, bytes);
    Ok(match mime_guess::from_path(path).first_raw() {
        Some(mime_type) => file.with_mime_type(mime_type),
        None => file,
    })
}

/// One-line rendering of a region for terminal output.
pub fn describe(region: &StatusRegion) -> String {
    let view = region.view();
    match view.kind() {
        Some(kind) => format!("[{}] {}", kind.as_str(), view.text()),
        None => view.text(),
    }
}
