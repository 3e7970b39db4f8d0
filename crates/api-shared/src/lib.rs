//! # API Shared
//!
//! Wire types and shared services for the symptom service API.
//!
//! Contains:
//! - Request/response bodies for `/health` and `/parse_input` (serde + OpenAPI schemas)
//! - `HealthService`
//!
//! Used by `api-rest` and the `symptom` CLI so both produce the same JSON shapes.

pub mod health;

use serde::{Deserialize, Serialize};
use symptom_core::{EngineOutput, Mention};
use utoipa::ToSchema;

pub use health::HealthService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: String,
}

/// Body of `POST /parse_input`.
///
/// Describes the OpenAPI schema only. The handler reads `input` from the raw JSON so that a
/// missing, null or non-string value gets the same "Input field is empty" answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParseInputReq {
    /// Free text describing how the user feels.
    pub input: String,
}

/// Summary response: confirmed symptoms only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SymptomsRes {
    pub symptoms: Vec<String>,
}

/// One resolved mention in a detailed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MentionRes {
    pub symptom: String,
    /// One of `past`, `present`, `future`, `unknown`.
    pub tense: String,
    pub current: bool,
    pub negated: bool,
}

/// Detailed response: every mention plus a feedback line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetailedRes {
    pub feedback: String,
    pub details: Vec<MentionRes>,
}

/// Body of a successful `POST /parse_input`, shaped by the configured output mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ParseInputRes {
    Summary(SymptomsRes),
    Detailed(DetailedRes),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<Mention> for MentionRes {
    fn from(m: Mention) -> Self {
        Self {
            symptom: m.symptom,
            tense: m.tense.to_string(),
            current: m.current,
            negated: m.negated,
        }
    }
}

impl From<EngineOutput> for ParseInputRes {
    fn from(output: EngineOutput) -> Self {
        match output {
            EngineOutput::Summary { symptoms } => ParseInputRes::Summary(SymptomsRes { symptoms }),
            EngineOutput::Detailed { feedback, details } => ParseInputRes::Detailed(DetailedRes {
                feedback,
                details: details.into_iter().map(MentionRes::from).collect(),
            }),
        }
    }
}
