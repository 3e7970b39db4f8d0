//! The seam to the external dependency parser.

use crate::doc::Doc;
use crate::engine::{EngineOutput, SymptomEngine};
use crate::SymptomResult;
use symptom_types::InputText;

/// Turns lowercase text into a validated token tree.
///
/// Implementations own whatever connection or model they need and must be safe to share
/// across concurrent requests. Each call returns a fresh `Doc` owned by the caller.
#[async_trait::async_trait]
pub trait DependencyParser: Send + Sync {
    async fn parse(&self, text: &str) -> SymptomResult<Doc>;
}

/// Normalise raw user input before parsing.
pub fn preprocess(input: &str) -> String {
    input.to_lowercase()
}

/// Run the whole pipeline for one request: preprocess, parse, resolve and render.
///
/// # Errors
///
/// Returns whatever error the parser reports; the engine itself never fails.
pub async fn extract_symptoms<P>(
    parser: &P,
    engine: &SymptomEngine,
    input: &InputText,
) -> SymptomResult<EngineOutput>
where
    P: DependencyParser + ?Sized,
{
    let text = preprocess(input.as_str());
    let doc = parser.parse(&text).await?;
    Ok(engine.evaluate(&doc))
}
