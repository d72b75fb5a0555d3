use std::sync::Arc;

use shared::domain::StatusKind;
use tracing::{info, warn};

use crate::{
    controller::ControllerOutcome,
    form::{FeedbackForm, TriggerControl},
    status::{show, StatusRegion},
    AnalyserApi,
};

pub const FEEDBACK_LABEL: &str = "Submit";

const EMPTY_REVIEW_MESSAGE: &str = "Please enter your feedback.";
const LOADING_MESSAGE: &str = "Submitting...";
const SUCCESS_MESSAGE: &str = "Thank you for your feedback!";
const FALLBACK_ERROR: &str = "Failed to submit feedback.";

pub struct FeedbackController {
    api: Arc<dyn AnalyserApi>,
    form: FeedbackForm,
    trigger: TriggerControl,
    status: StatusRegion,
}

impl FeedbackController {
    pub fn new(
        api: Arc<dyn AnalyserApi>,
        form: FeedbackForm,
        trigger: TriggerControl,
        status: StatusRegion,
    ) -> Self {
        Self {
            api,
            form,
            trigger,
            status,
        }
    }

    pub async fn on_submit(&self) -> ControllerOutcome {
        let Some(_guard) = self.trigger.begin(None) else {
            return ControllerOutcome::Busy;
        };

        let request = self.form.submission();
        if request.review.is_empty() {
            show(&self.status, EMPTY_REVIEW_MESSAGE, StatusKind::Error, None);
            return ControllerOutcome::Rejected(EMPTY_REVIEW_MESSAGE.to_string());
        }

        show(&self.status, LOADING_MESSAGE, StatusKind::Loading, None);
        match self.api.submit_feedback(&request).await {
            Ok(()) => {
                info!(named = !request.name.is_empty(), "feedback submitted");
                show(&self.status, SUCCESS_MESSAGE, StatusKind::Success, None);
                self.form.reset();
                ControllerOutcome::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "feedback submission failed");
                let message = err.user_message(FALLBACK_ERROR);
                show(&self.status, message.clone(), StatusKind::Error, None);
                ControllerOutcome::Failed(message)
            }
        }
    }
}
