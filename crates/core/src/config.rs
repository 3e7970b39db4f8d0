//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the engine. The
//! helpers here take already-read values rather than reading environment variables themselves,
//! so request handling and tests never depend on process-wide state.

use crate::engine::OutputMode;
use crate::matcher::SymptomVocabulary;
use crate::{SymptomError, SymptomResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    vocabulary: SymptomVocabulary,
    output_mode: OutputMode,
}

impl CoreConfig {
    pub fn new(vocabulary: SymptomVocabulary, output_mode: OutputMode) -> Self {
        Self {
            vocabulary,
            output_mode,
        }
    }

    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }
}

/// Parse the output mode from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`OutputMode::Summary`].
pub fn output_mode_from_env_value(value: Option<String>) -> SymptomResult<OutputMode> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<OutputMode>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Parse a comma-separated symptom vocabulary from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default vocabulary.
///
/// # Errors
///
/// Returns `SymptomError::InvalidInput` if a value is given but contains no phrases
/// (e.g. `" , ,"`).
pub fn vocabulary_from_env_value(value: Option<String>) -> SymptomResult<SymptomVocabulary> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(SymptomVocabulary::default());
    };

    let vocabulary = SymptomVocabulary::new(value.split(','));
    if vocabulary.is_empty() {
        return Err(SymptomError::InvalidInput(
            "symptom vocabulary override contains no phrases".into(),
        ));
    }
    Ok(vocabulary)
}
