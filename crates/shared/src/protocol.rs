use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ExtractedField, RiskTier};

pub const EXTRACT_PATH: &str = "extract";
pub const PREDICT_PATH: &str = "predict";
pub const FEEDBACK_PATH: &str = "feedback";

/// Multipart field carrying the uploaded report.
pub const EXTRACT_FILE_FIELD: &str = "file";

/// Scalar produced by OCR extraction. The service sends digits as strings but
/// numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    /// Empty strings and zero are treated the same as a missing key.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        }
    }

    /// Text as it should appear in a form input.
    pub fn to_input_value(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Number(number) if number.is_f64() => number
                .as_f64()
                .map(|value| value.to_string())
                .unwrap_or_else(|| number.to_string()),
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Success body of `POST /extract`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_hi: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_lo: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glucose: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ExtractedFields {
    fn slot(&self, field: ExtractedField) -> Option<&FieldValue> {
        match field {
            ExtractedField::Age => self.age.as_ref(),
            ExtractedField::Height => self.height.as_ref(),
            ExtractedField::Weight => self.weight.as_ref(),
            ExtractedField::ApHi => self.ap_hi.as_ref(),
            ExtractedField::ApLo => self.ap_lo.as_ref(),
            ExtractedField::Cholesterol => self.cholesterol.as_ref(),
            ExtractedField::Glucose => self.glucose.as_ref(),
        }
    }

    /// Numeric keys carrying a usable value, in page order.
    pub fn present_values(&self) -> Vec<(ExtractedField, &FieldValue)> {
        [
            ExtractedField::Age,
            ExtractedField::Height,
            ExtractedField::Weight,
            ExtractedField::ApHi,
            ExtractedField::ApLo,
            ExtractedField::Cholesterol,
            ExtractedField::Glucose,
        ]
        .into_iter()
        .filter_map(|field| {
            self.slot(field)
                .filter(|value| value.is_present())
                .map(|value| (field, value))
        })
        .collect()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref().filter(|raw| !raw.is_empty())
    }
}

/// Body of `POST /predict`: every manual-form input by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictRequest {
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: i64,
    pub probability: f64,
}

impl PredictionResult {
    pub fn tier(&self) -> RiskTier {
        RiskTier::classify(self.prediction, self.probability)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub name: String,
    pub review: String,
}

/// Success body of `POST /feedback`. Contents are not relied upon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}
