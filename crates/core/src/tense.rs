//! Tense classification of the verb governing a mention.

use crate::constants::{FUTURE_CUES, PAST_TAGS, PRESENT_TAGS};
use crate::doc::Token;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Present,
    Future,
    Unknown,
}

impl Tense {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tense::Past => "past",
            Tense::Present => "present",
            Tense::Future => "future",
            Tense::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Tense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of verb categories, mapped once from raw tagger output.
///
/// Tag-based categories take priority: a token only becomes a `FutureCue` when its tag is
/// neither past nor present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbClass {
    Past,
    Present,
    FutureCue,
    Other,
}

impl VerbClass {
    pub fn of(verb: &Token<'_>) -> Self {
        let tag = verb.tag();
        if PAST_TAGS.contains(&tag) {
            VerbClass::Past
        } else if PRESENT_TAGS.contains(&tag) {
            VerbClass::Present
        } else if FUTURE_CUES.contains(&verb.lower()) {
            VerbClass::FutureCue
        } else {
            VerbClass::Other
        }
    }
}

impl From<VerbClass> for Tense {
    fn from(class: VerbClass) -> Self {
        match class {
            VerbClass::Past => Tense::Past,
            VerbClass::Present => Tense::Present,
            VerbClass::FutureCue => Tense::Future,
            VerbClass::Other => Tense::Unknown,
        }
    }
}

/// Classify the tense of the verb that governs `token` (its head).
pub fn classify_tense(token: Token<'_>) -> Tense {
    VerbClass::of(&token.head()).into()
}
