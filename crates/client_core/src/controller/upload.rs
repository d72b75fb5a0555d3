use std::sync::Arc;

use shared::domain::StatusKind;
use tracing::{info, warn};

use crate::{
    controller::ControllerOutcome,
    form::{FileInput, ManualForm, TriggerControl},
    status::{show, StatusRegion},
    AnalyserApi,
};

pub const UPLOAD_LABEL: &str = "Upload and Extract Data";
pub const UPLOAD_BUSY_LABEL: &str = "Processing...";

const NO_FILE_MESSAGE: &str = "Please select a file first.";
const LOADING_MESSAGE: &str = "Uploading and processing... This may take a moment.";
const SUCCESS_MESSAGE: &str = "Data extracted successfully! Please review the fields.";
const FALLBACK_ERROR: &str = "Failed to extract data.";

/// Uploads the selected report and fills the manual form from the OCR result.
pub struct UploadController {
    api: Arc<dyn AnalyserApi>,
    file_input: FileInput,
    trigger: TriggerControl,
    status: StatusRegion,
    form: ManualForm,
}

impl UploadController {
    pub fn new(
        api: Arc<dyn AnalyserApi>,
        file_input: FileInput,
        trigger: TriggerControl,
        status: StatusRegion,
        form: ManualForm,
    ) -> Self {
        Self {
            api,
            file_input,
            trigger,
            status,
            form,
        }
    }

    pub async fn on_upload(&self) -> ControllerOutcome {
        if !self.trigger.is_enabled() {
            return ControllerOutcome::Busy;
        }

        let Some(file) = self.file_input.selected() else {
            show(&self.status, NO_FILE_MESSAGE, StatusKind::Error, None);
            return ControllerOutcome::Rejected(NO_FILE_MESSAGE.to_string());
        };

        let Some(_guard) = self.trigger.begin(Some(UPLOAD_BUSY_LABEL)) else {
            return ControllerOutcome::Busy;
        };
        show(&self.status, LOADING_MESSAGE, StatusKind::Loading, None);

        let filename = file.filename.clone();
        match self.api.extract(file).await {
            Ok(fields) => {
                let written = self.form.apply_extracted(&fields);
                info!(%filename, populated = written.len(), "report fields extracted");
                show(&self.status, SUCCESS_MESSAGE, StatusKind::Success, None);
                ControllerOutcome::Succeeded
            }
            Err(err) => {
                warn!(%filename, error = %err, "report extraction failed");
                let message = err.user_message(FALLBACK_ERROR);
                show(&self.status, message.clone(), StatusKind::Error, None);
                ControllerOutcome::Failed(message)
            }
        }
    }
}
