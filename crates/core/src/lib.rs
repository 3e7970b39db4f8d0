//! # Symptom Core
//!
//! Rule engine that decides which symptom mentions in a user's sentence describe how they feel
//! right now.
//!
//! The engine works over a dependency parse produced elsewhere:
//! - phrase matching of the configured symptom vocabulary ([`matcher`])
//! - negation scope ([`negation`]), verb tense ([`tense`]) and contrast/recovery
//!   ([`contrast`]) heuristics
//! - the verdict combiner and output shaping ([`engine`])
//!
//! **No API concerns**: HTTP routes, request validation and the parser client belong in
//! `api-rest`, `api-shared` and `symptom-parser`.

pub mod config;
pub mod constants;
pub mod contrast;
pub mod doc;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod negation;
pub mod parser;
pub mod tense;

pub use config::CoreConfig;
pub use doc::{Doc, ParsedDoc, Span, Token, TokenRecord};
pub use engine::{EngineOutput, Mention, OutputMode, SymptomEngine};
pub use error::{SymptomError, SymptomResult};
pub use matcher::{PhraseMatcher, SymptomVocabulary};
pub use parser::{extract_symptoms, preprocess, DependencyParser};
pub use symptom_types::{InputText, TextError};
pub use tense::Tense;
