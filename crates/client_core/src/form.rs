//! Form inputs and trigger controls the controllers read from and write to.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    domain::{FormField, Gender},
    protocol::{ExtractedFields, FeedbackRequest, PredictRequest},
};
use tracing::debug;

use crate::UploadFile;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The manual health-metrics form. Every input starts empty.
#[derive(Debug, Clone)]
pub struct ManualForm {
    values: Arc<Mutex<BTreeMap<FormField, String>>>,
}

impl Default for ManualForm {
    fn default() -> Self {
        let values = FormField::ALL
            .into_iter()
            .map(|field| (field, String::new()))
            .collect();
        Self {
            values: Arc::new(Mutex::new(values)),
        }
    }
}

impl ManualForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FormField) -> String {
        lock(&self.values).get(&field).cloned().unwrap_or_default()
    }

    pub fn set(&self, field: FormField, value: impl Into<String>) {
        lock(&self.values).insert(field, value.into());
    }

    /// Applies the present keys of an extraction result and returns the
    /// inputs that were written. Unrecognised gender values are skipped.
    pub fn apply_extracted(&self, fields: &ExtractedFields) -> Vec<FormField> {
        let mut values = lock(&self.values);
        let mut written = Vec::new();

        for (key, value) in fields.present_values() {
            let target = key.target();
            values.insert(target, value.to_input_value());
            written.push(target);
        }

        if let Some(raw) = fields.gender() {
            match Gender::from_extracted(raw) {
                Some(gender) => {
                    values.insert(FormField::Gender, gender.option_value().to_string());
                    written.push(FormField::Gender);
                }
                None => debug!(gender = raw, "ignoring unrecognised extracted gender"),
            }
        }

        written
    }

    /// Every input by submission name, empty ones included.
    pub fn submission(&self) -> PredictRequest {
        let fields = lock(&self.values)
            .iter()
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect();
        PredictRequest { fields }
    }
}

#[derive(Debug, Default)]
struct FeedbackInputs {
    name: String,
    review: String,
}

/// Reviewer name and review text inputs of the contact page.
#[derive(Debug, Clone, Default)]
pub struct FeedbackForm {
    inputs: Arc<Mutex<FeedbackInputs>>,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        lock(&self.inputs).name = name.into();
    }

    pub fn set_review(&self, review: impl Into<String>) {
        lock(&self.inputs).review = review.into();
    }

    pub fn name(&self) -> String {
        lock(&self.inputs).name.clone()
    }

    pub fn review(&self) -> String {
        lock(&self.inputs).review.clone()
    }

    pub fn submission(&self) -> FeedbackRequest {
        let inputs = lock(&self.inputs);
        FeedbackRequest {
            name: inputs.name.clone(),
            review: inputs.review.clone(),
        }
    }

    pub fn reset(&self) {
        *lock(&self.inputs) = FeedbackInputs::default();
    }
}

/// File picker. Holds at most one selected document.
#[derive(Debug, Clone, Default)]
pub struct FileInput {
    selected: Arc<Mutex<Option<UploadFile>>>,
}

impl FileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&self, file: UploadFile) {
        *lock(&self.selected) = Some(file);
    }

    pub fn clear(&self) {
        *lock(&self.selected) = None;
    }

    pub fn selected(&self) -> Option<UploadFile> {
        lock(&self.selected).clone()
    }
}

#[derive(Debug)]
struct TriggerState {
    enabled: bool,
    label: String,
}

/// A button that starts a controller action.
#[derive(Debug, Clone)]
pub struct TriggerControl {
    state: Arc<Mutex<TriggerState>>,
}

impl TriggerControl {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TriggerState {
                enabled: true,
                label: label.into(),
            })),
        }
    }

    pub fn is_enabled(&self) -> bool {
        lock(&self.state).enabled
    }

    pub fn label(&self) -> String {
        lock(&self.state).label.clone()
    }

    /// Disables the control, optionally swapping its label, until the
    /// returned guard drops. `None` when the control is already disabled.
    pub fn begin(&self, busy_label: Option<&str>) -> Option<TriggerGuard> {
        let mut state = lock(&self.state);
        if !state.enabled {
            return None;
        }
        state.enabled = false;
        let restore_label = match busy_label {
            Some(busy) => std::mem::replace(&mut state.label, busy.to_string()),
            None => state.label.clone(),
        };
        Some(TriggerGuard {
            state: Arc::clone(&self.state),
            restore_label,
        })
    }
}

/// Re-enables its control and restores the label on drop, on every exit path.
#[derive(Debug)]
pub struct TriggerGuard {
    state: Arc<Mutex<TriggerState>>,
    restore_label: String,
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.enabled = true;
        state.label = std::mem::take(&mut self.restore_label);
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
