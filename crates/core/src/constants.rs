//! Word lists and labels used by the symptom resolution rules.
//!
//! Every list here is matched against lowercase token text. They are process-wide constants and
//! are never mutated after startup.

/// Symptom phrases recognised when no vocabulary override is configured.
pub const DEFAULT_SYMPTOMS: &[&str] = &[
    "headache",
    "cough",
    "fever",
    "sore throat",
    "runny nose",
    "muscle pain",
];

/// Tokens that put a mention inside negation scope.
///
/// Contracted forms are whole-token matches; "don't" is never split into "do" + "n't" here.
pub const NEGATION_WORDS: &[&str] = &[
    "no", "not", "n't", "don't", "doesn't", "never", "without", "lack",
];

/// Dependency label the parser assigns to grammatical negation modifiers.
pub const NEGATION_DEPENDENCY: &str = "neg";

/// Conjunctions that introduce a contrasting clause.
pub const CONTRAST_WORDS: &[&str] = &["but", "however"];

/// Words that, inside a contrasting clause, signal the user has recovered.
pub const RECOVERY_WORDS: &[&str] = &["fine", "better", "well", "okay", "recovered"];

/// Fine-grained tags for past tense and past participle verbs.
pub const PAST_TAGS: &[&str] = &["VBD", "VBN"];

/// Fine-grained tags for present tense verbs (3rd person singular and non-3rd person).
pub const PRESENT_TAGS: &[&str] = &["VBZ", "VBP"];

/// Governing words that mark a future construction.
pub const FUTURE_CUES: &[&str] = &["will", "going"];

/// Prefix of the human-readable feedback line in detailed output.
pub const FEEDBACK_PREFIX: &str = "Detected symptoms: ";

/// Placeholder used in the feedback line when nothing is confirmed.
pub const FEEDBACK_NONE: &str = "none";
