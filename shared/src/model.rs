use crate::error::{ClientError, ValidationError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

pub fn is_image_type(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// One image selected for analysis. The payload type depends on the platform:
/// the browser carries a file handle, native code carries the raw bytes.
#[derive(Debug, Clone)]
pub struct AnalysisRequest<P> {
    id: Uuid,
    filename: String,
    mime_type: String,
    payload: P,
}

impl<P> AnalysisRequest<P> {
    pub fn new(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        payload: P,
    ) -> Result<Self, ValidationError> {
        let filename = filename.into();
        let mime_type = mime_type.into();
        if !is_image_type(&mime_type) {
            return Err(ValidationError::NotAnImage { filename, mime_type });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            filename,
            mime_type,
            payload,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Label {
    Cancerous,
    NonCancerous,
    Uncertain,
}

impl Label {
    /// Maps any textual label onto one of the three outcomes. Unknown tokens
    /// are not an error, they become `Uncertain`.
    pub fn normalize(raw: &str) -> Self {
        Label::from_str(raw.trim()).unwrap_or(Label::Uncertain)
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Label::Cancerous => "Cancerous Tissue Detected",
            Label::NonCancerous => "No Cancer Detected",
            Label::Uncertain => "Inconclusive Result",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Label::Cancerous => {
                "The scan shows indicators consistent with cancerous tissue. Please consult with a healthcare professional for a complete diagnosis."
            }
            Label::NonCancerous => {
                "The scan appears to be normal. However, always consult with a healthcare professional for a complete evaluation."
            }
            Label::Uncertain => {
                "The model could not reach a confident decision for this scan. Please consult with a healthcare professional."
            }
        }
    }
}

/// Percentage in `[0, 100]`, shown with two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, derive_more::Display)]
#[display(fmt = "{:.2}", _0)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Option<Self> {
        value.is_finite().then(|| Confidence(value.clamp(0.0, 100.0)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Body returned by the prediction endpoint, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    pub prediction: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

impl RawPrediction {
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        serde_json::from_str(body).map_err(|e| ClientError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    label: Label,
    confidence: Confidence,
    processing_time_ms: Option<f64>,
    simulated: bool,
}

impl PredictionResult {
    pub fn from_raw(raw: RawPrediction) -> Result<Self, ClientError> {
        let confidence = Confidence::new(raw.confidence).ok_or_else(|| {
            ClientError::Malformed(format!("confidence is not a number: {}", raw.confidence))
        })?;
        let processing_time_ms = raw
            .processing_time_ms
            .filter(|ms| ms.is_finite() && *ms >= 0.0);

        Ok(Self {
            label: Label::normalize(&raw.prediction),
            confidence,
            processing_time_ms,
            simulated: false,
        })
    }

    /// Stand-in result for demo deployments. Both samples are expected in `[0, 1)`.
    pub fn simulated(label_sample: f64, confidence_sample: f64) -> Self {
        let label = if label_sample > 0.5 {
            Label::Cancerous
        } else {
            Label::NonCancerous
        };
        let sample = if (0.0..1.0).contains(&confidence_sample) {
            confidence_sample
        } else {
            0.0
        };
        Self {
            label,
            confidence: Confidence((70.0 + sample * 25.0).min(94.99)),
            processing_time_ms: None,
            simulated: true,
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn processing_time_ms(&self) -> Option<f64> {
        self.processing_time_ms
    }

    /// True for demo stand-ins. These never leave the browser.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }
}
