use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownFieldError;

/// Inputs of the manual health-metrics form, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Age,
    Gender,
    Height,
    Weight,
    ApHi,
    ApLo,
    Cholesterol,
    Gluc,
    Smoke,
    Alco,
    Active,
}

impl FormField {
    pub const ALL: [FormField; 11] = [
        FormField::Age,
        FormField::Gender,
        FormField::Height,
        FormField::Weight,
        FormField::ApHi,
        FormField::ApLo,
        FormField::Cholesterol,
        FormField::Gluc,
        FormField::Smoke,
        FormField::Alco,
        FormField::Active,
    ];

    /// Name the input is submitted under.
    pub fn name(self) -> &'static str {
        match self {
            FormField::Age => "age",
            FormField::Gender => "gender",
            FormField::Height => "height",
            FormField::Weight => "weight",
            FormField::ApHi => "ap_hi",
            FormField::ApLo => "ap_lo",
            FormField::Cholesterol => "cholesterol",
            FormField::Gluc => "gluc",
            FormField::Smoke => "smoke",
            FormField::Alco => "alco",
            FormField::Active => "active",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownFieldError::new(wanted))
    }
}

/// Numeric keys the extraction endpoint may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractedField {
    Age,
    Height,
    Weight,
    ApHi,
    ApLo,
    Cholesterol,
    Glucose,
}

impl ExtractedField {
    pub fn key(self) -> &'static str {
        match self {
            ExtractedField::Age => "age",
            ExtractedField::Height => "height",
            ExtractedField::Weight => "weight",
            ExtractedField::ApHi => "ap_hi",
            ExtractedField::ApLo => "ap_lo",
            ExtractedField::Cholesterol => "cholesterol",
            ExtractedField::Glucose => "glucose",
        }
    }

    /// Form input populated by this key. `glucose` lands in the `gluc` input.
    pub fn target(self) -> FormField {
        match self {
            ExtractedField::Age => FormField::Age,
            ExtractedField::Height => FormField::Height,
            ExtractedField::Weight => FormField::Weight,
            ExtractedField::ApHi => FormField::ApHi,
            ExtractedField::ApLo => FormField::ApLo,
            ExtractedField::Cholesterol => FormField::Cholesterol,
            ExtractedField::Glucose => FormField::Gluc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive match of an extracted value; anything else is `None`.
    pub fn from_extracted(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn option_value(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    High,
    Moderate,
    Low,
}

impl RiskTier {
    pub const HIGH_ABOVE: f64 = 75.0;
    pub const MODERATE_FROM: f64 = 60.0;

    /// Only a positive classification can raise the tier above `Low`.
    /// High is strictly above 75; 60..=75 is Moderate.
    pub fn classify(prediction: i64, probability: f64) -> Self {
        if prediction != 1 {
            return RiskTier::Low;
        }
        if probability > Self::HIGH_ABOVE {
            RiskTier::High
        } else if probability >= Self::MODERATE_FROM {
            RiskTier::Moderate
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::High => "High Risk",
            RiskTier::Moderate => "Moderate Risk",
            RiskTier::Low => "Low Risk",
        }
    }

    pub fn color_token(self) -> &'static str {
        match self {
            RiskTier::High => "var(--danger-color)",
            RiskTier::Moderate => "#FFB74D",
            RiskTier::Low => "var(--success-color)",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
