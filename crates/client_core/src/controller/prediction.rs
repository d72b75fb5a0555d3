use std::sync::Arc;

use shared::domain::StatusKind;
use tracing::{info, warn};

use crate::{
    controller::ControllerOutcome,
    form::{ManualForm, TriggerControl},
    status::{render_prediction, show, Container, StatusRegion},
    AnalyserApi,
};

pub const PREDICT_LABEL: &str = "Analyse";

const LOADING_MESSAGE: &str = "Analysing...";
const FALLBACK_ERROR: &str = "Prediction failed.";

/// Submits the manual form and renders the risk tier into the results section.
pub struct PredictionController {
    api: Arc<dyn AnalyserApi>,
    form: ManualForm,
    trigger: TriggerControl,
    result: StatusRegion,
    results_section: Container,
}

impl PredictionController {
    pub fn new(
        api: Arc<dyn AnalyserApi>,
        form: ManualForm,
        trigger: TriggerControl,
        result: StatusRegion,
        results_section: Container,
    ) -> Self {
        Self {
            api,
            form,
            trigger,
            result,
            results_section,
        }
    }

    pub async fn on_submit(&self) -> ControllerOutcome {
        let Some(_guard) = self.trigger.begin(None) else {
            return ControllerOutcome::Busy;
        };
        show(
            &self.result,
            LOADING_MESSAGE,
            StatusKind::Loading,
            Some(&self.results_section),
        );

        let request = self.form.submission();
        match self.api.predict(&request).await {
            Ok(prediction) => {
                let view = render_prediction(&prediction);
                info!(
                    prediction = prediction.prediction,
                    probability = prediction.probability,
                    tier = %prediction.tier(),
                    "prediction rendered"
                );
                self.results_section.reveal();
                self.result.set(view);
                ControllerOutcome::Succeeded
            }
            Err(err) => {
                warn!(error = %err, "prediction request failed");
                let message = err.user_message(FALLBACK_ERROR);
                show(
                    &self.result,
                    message.clone(),
                    StatusKind::Error,
                    Some(&self.results_section),
                );
                ControllerOutcome::Failed(message)
            }
        }
    }
}
