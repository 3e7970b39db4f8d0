//! The symptom resolution engine.
//!
//! Combines phrase matching with the negation, tense and contrast rules into one verdict per
//! distinct mention root, then shapes the verdicts for the configured [`OutputMode`].

use crate::config::CoreConfig;
use crate::constants::{FEEDBACK_NONE, FEEDBACK_PREFIX};
use crate::contrast::resolves_to_recovery;
use crate::doc::Doc;
use crate::matcher::{PhraseMatcher, SymptomVocabulary};
use crate::negation::is_negated;
use crate::tense::{classify_tense, Tense};
use crate::SymptomError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How resolved mentions are reported back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Only the texts of confirmed symptoms.
    #[default]
    Summary,
    /// Every mention with its verdicts, plus a feedback line.
    Detailed,
}

impl std::str::FromStr for OutputMode {
    type Err = SymptomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputMode::Summary),
            "detailed" => Ok(OutputMode::Detailed),
            other => Err(SymptomError::InvalidInput(format!(
                "unknown output mode '{other}' (expected 'summary' or 'detailed')"
            ))),
        }
    }
}

/// The resolved observation for one mention root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub symptom: String,
    pub tense: Tense,
    pub current: bool,
    pub negated: bool,
}

impl Mention {
    /// Current and not negated: the user has this symptom now.
    pub fn is_confirmed(&self) -> bool {
        self.current && !self.negated
    }
}

/// Engine result in the configured output mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EngineOutput {
    Summary {
        symptoms: Vec<String>,
    },
    Detailed {
        feedback: String,
        details: Vec<Mention>,
    },
}

/// Read-only engine shared by every request.
#[derive(Debug, Clone)]
pub struct SymptomEngine {
    matcher: PhraseMatcher,
    output_mode: OutputMode,
}

impl SymptomEngine {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_vocabulary(cfg.vocabulary(), cfg.output_mode())
    }

    pub fn with_vocabulary(vocabulary: &SymptomVocabulary, output_mode: OutputMode) -> Self {
        Self {
            matcher: PhraseMatcher::new(vocabulary),
            output_mode,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn vocabulary(&self) -> &SymptomVocabulary {
        self.matcher.vocabulary()
    }

    /// Resolve every matched phrase into a [`Mention`], one per distinct root token.
    ///
    /// Matches are visited in document order; when several share a root only the first is
    /// kept. A mention is current unless its governing verb is past tense, and the
    /// document-wide contrast verdict vetoes currency for every mention.
    pub fn resolve(&self, doc: &Doc) -> Vec<Mention> {
        let recovered = resolves_to_recovery(doc);

        let mut processed_roots = HashSet::new();
        let mut mentions = Vec::new();
        for found in self.matcher.find(doc) {
            let root = found.span.root();
            if !processed_roots.insert(root.i()) {
                continue;
            }

            let negated = is_negated(root);
            let tense = classify_tense(root);
            let mut current = tense != Tense::Past;
            if recovered {
                current = false;
            }

            mentions.push(Mention {
                symptom: found.text().to_owned(),
                tense,
                current,
                negated,
            });
        }

        tracing::debug!(
            mentions = mentions.len(),
            recovered,
            "resolved symptom mentions"
        );
        mentions
    }

    /// Resolve and shape the result for the configured output mode.
    pub fn evaluate(&self, doc: &Doc) -> EngineOutput {
        render(self.output_mode, self.resolve(doc))
    }
}

/// Shape resolved mentions for `mode`.
pub fn render(mode: OutputMode, mentions: Vec<Mention>) -> EngineOutput {
    match mode {
        OutputMode::Summary => EngineOutput::Summary {
            symptoms: mentions
                .into_iter()
                .filter(Mention::is_confirmed)
                .map(|m| m.symptom)
                .collect(),
        },
        OutputMode::Detailed => {
            let confirmed: Vec<&str> = mentions
                .iter()
                .filter(|m| m.is_confirmed())
                .map(|m| m.symptom.as_str())
                .collect();
            EngineOutput::Detailed {
                feedback: feedback_line(&confirmed),
                details: mentions,
            }
        }
    }
}

fn feedback_line(confirmed: &[&str]) -> String {
    if confirmed.is_empty() {
        format!("{FEEDBACK_PREFIX}{FEEDBACK_NONE}")
    } else {
        format!("{FEEDBACK_PREFIX}{}", confirmed.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::testing::DocBuilder;

    fn engine(mode: OutputMode) -> SymptomEngine {
        SymptomEngine::with_vocabulary(&SymptomVocabulary::default(), mode)
    }

    fn symptoms(output: EngineOutput) -> Vec<String> {
        match output {
            EngineOutput::Summary { symptoms } => symptoms,
            other => panic!("expected summary output, got {other:?}"),
        }
    }

    /// i have a headache
    fn have_headache() -> Doc {
        DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("have", "VBP", "ROOT", 1)
            .tok("a", "DT", "det", 3)
            .tok("headache", "NN", "dobj", 1)
            .build()
    }

    /// i don't have a headache
    fn dont_have_headache() -> Doc {
        DocBuilder::new()
            .tok("i", "PRP", "nsubj", 3)
            .tok("do", "VBP", "aux", 3)
            .glued("n't", "RB", "neg", 3)
            .tok("have", "VB", "ROOT", 3)
            .tok("a", "DT", "det", 5)
            .tok("headache", "NN", "dobj", 3)
            .build()
    }

    /// i had a fever yesterday
    fn had_fever() -> Doc {
        DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("had", "VBD", "ROOT", 1)
            .tok("a", "DT", "det", 3)
            .tok("fever", "NN", "dobj", 1)
            .tok("yesterday", "NN", "npadvmod", 1)
            .build()
    }

    /// i had a cough but i feel fine now
    fn had_cough_but_fine() -> Doc {
        DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("had", "VBD", "ROOT", 1)
            .tok("a", "DT", "det", 3)
            .tok("cough", "NN", "dobj", 1)
            .tok("but", "CC", "cc", 1)
            .tok("i", "PRP", "nsubj", 6)
            .tok("feel", "VBP", "conj", 4)
            .tok("fine", "JJ", "acomp", 6)
            .tok("now", "RB", "advmod", 6)
            .build()
    }

    /// i have a sore throat but i'm fine
    fn sore_throat_but_fine() -> Doc {
        DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("have", "VBP", "ROOT", 1)
            .tok("a", "DT", "det", 4)
            .tok("sore", "JJ", "amod", 4)
            .tok("throat", "NN", "dobj", 1)
            .tok("but", "CC", "cc", 1)
            .tok("i", "PRP", "nsubj", 7)
            .glued("'m", "VBP", "conj", 5)
            .tok("fine", "JJ", "acomp", 7)
            .build()
    }

    /// i have a headache and a cough but i feel better
    fn two_symptoms_then_better() -> Doc {
        DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("have", "VBP", "ROOT", 1)
            .tok("a", "DT", "det", 3)
            .tok("headache", "NN", "dobj", 1)
            .tok("and", "CC", "cc", 3)
            .tok("a", "DT", "det", 6)
            .tok("cough", "NN", "conj", 3)
            .tok("but", "CC", "cc", 1)
            .tok("i", "PRP", "nsubj", 9)
            .tok("feel", "VBP", "conj", 7)
            .tok("better", "JJR", "acomp", 9)
            .build()
    }

    #[test]
    fn present_symptom_is_reported() {
        let out = engine(OutputMode::Summary).evaluate(&have_headache());
        assert_eq!(symptoms(out), vec!["headache"]);
    }

    #[test]
    fn negated_symptom_is_not_reported() {
        let out = engine(OutputMode::Summary).evaluate(&dont_have_headache());
        assert!(symptoms(out).is_empty());

        let mentions = engine(OutputMode::Summary).resolve(&dont_have_headache());
        assert_eq!(mentions.len(), 1);
        assert!(mentions[0].negated);
        assert_eq!(mentions[0].tense, Tense::Unknown);
        assert!(mentions[0].current);
    }

    #[test]
    fn past_symptom_is_not_current() {
        let mentions = engine(OutputMode::Summary).resolve(&had_fever());
        assert_eq!(
            mentions,
            vec![Mention {
                symptom: "fever".into(),
                tense: Tense::Past,
                current: false,
                negated: false,
            }]
        );
        assert!(symptoms(engine(OutputMode::Summary).evaluate(&had_fever())).is_empty());
    }

    #[test]
    fn detailed_output_reports_past_cough_before_recovery() {
        let out = engine(OutputMode::Detailed).evaluate(&had_cough_but_fine());
        let EngineOutput::Detailed { feedback, details } = out else {
            panic!("expected detailed output");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].symptom, "cough");
        assert_eq!(details[0].tense, Tense::Past);
        assert!(!details[0].current);
        assert_eq!(feedback, "Detected symptoms: none");
    }

    #[test]
    fn contrast_with_recovery_vetoes_present_tense() {
        let mentions = engine(OutputMode::Summary).resolve(&sore_throat_but_fine());
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].symptom, "sore throat");
        assert_eq!(mentions[0].tense, Tense::Present);
        assert!(!mentions[0].current);
        assert!(symptoms(engine(OutputMode::Summary).evaluate(&sore_throat_but_fine())).is_empty());
    }

    #[test]
    fn contrast_override_applies_to_every_mention() {
        let mentions = engine(OutputMode::Summary).resolve(&two_symptoms_then_better());
        let names: Vec<&str> = mentions.iter().map(|m| m.symptom.as_str()).collect();
        assert_eq!(names, vec!["headache", "cough"]);
        assert!(mentions.iter().all(|m| !m.current));
    }

    #[test]
    fn mentions_sharing_a_root_keep_the_earliest_match() {
        let vocab = SymptomVocabulary::new(["throat", "sore throat"]);
        let engine = SymptomEngine::with_vocabulary(&vocab, OutputMode::Detailed);
        // i have a sore throat
        let doc = DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("have", "VBP", "ROOT", 1)
            .tok("a", "DT", "det", 4)
            .tok("sore", "JJ", "amod", 4)
            .tok("throat", "NN", "dobj", 1)
            .build();
        let mentions = engine.resolve(&doc);
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].symptom, "sore throat");
    }

    #[test]
    fn detailed_feedback_lists_confirmed_symptoms() {
        let vocab = SymptomVocabulary::new(["headache", "cough", "fever"]);
        let engine = SymptomEngine::with_vocabulary(&vocab, OutputMode::Detailed);
        // i have a headache and a cough after a fever
        let doc = DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("have", "VBP", "ROOT", 1)
            .tok("a", "DT", "det", 3)
            .tok("headache", "NN", "dobj", 1)
            .tok("and", "CC", "cc", 3)
            .tok("a", "DT", "det", 6)
            .tok("cough", "NN", "conj", 3)
            .tok("after", "IN", "prep", 1)
            .tok("a", "DT", "det", 9)
            .tok("fever", "NN", "pobj", 7)
            .build();
        let EngineOutput::Detailed { feedback, details } = engine.evaluate(&doc) else {
            panic!("expected detailed output");
        };
        assert_eq!(feedback, "Detected symptoms: headache, cough, fever");
        assert_eq!(details.len(), 3);
        assert_eq!(details[0].tense, Tense::Present);
        // "cough" hangs off "headache" and "fever" off "after": neither head is a verb
        assert_eq!(details[1].tense, Tense::Unknown);
        assert_eq!(details[2].tense, Tense::Unknown);
    }

    #[test]
    fn no_matches_yield_empty_results() {
        // i feel great
        let doc = DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("feel", "VBP", "ROOT", 1)
            .tok("great", "JJ", "acomp", 1)
            .build();
        assert!(symptoms(engine(OutputMode::Summary).evaluate(&doc)).is_empty());
        assert_eq!(
            engine(OutputMode::Detailed).evaluate(&doc),
            EngineOutput::Detailed {
                feedback: "Detected symptoms: none".into(),
                details: vec![],
            }
        );
    }

    #[test]
    fn evaluation_is_deterministic_and_verbatim() {
        let engine = engine(OutputMode::Detailed);
        for doc in [
            have_headache(),
            dont_have_headache(),
            had_fever(),
            had_cough_but_fine(),
            sore_throat_but_fine(),
            two_symptoms_then_better(),
        ] {
            let first = engine.evaluate(&doc);
            assert_eq!(first, engine.evaluate(&doc));
            for mention in engine.resolve(&doc) {
                assert!(doc.text().contains(&mention.symptom));
            }
        }
    }

    #[test]
    fn adding_governing_tokens_keeps_ancestor_negation() {
        // not a headache
        let short = DocBuilder::new()
            .tok("not", "RB", "ROOT", 0)
            .tok("a", "DT", "det", 2)
            .tok("headache", "NN", "pobj", 0)
            .build();
        // i said not a headache
        let long = DocBuilder::new()
            .tok("i", "PRP", "nsubj", 1)
            .tok("said", "VBD", "ROOT", 1)
            .tok("not", "RB", "ccomp", 1)
            .tok("a", "DT", "det", 4)
            .tok("headache", "NN", "pobj", 2)
            .build();
        let engine = engine(OutputMode::Summary);
        assert!(engine.resolve(&short)[0].negated);
        assert!(engine.resolve(&long)[0].negated);
    }

    #[test]
    fn output_mode_parses_case_insensitively() {
        assert_eq!("Detailed".parse::<OutputMode>().unwrap(), OutputMode::Detailed);
        assert_eq!(" summary ".parse::<OutputMode>().unwrap(), OutputMode::Summary);
        assert!(matches!(
            "verbose".parse::<OutputMode>(),
            Err(SymptomError::InvalidInput(msg)) if msg.contains("verbose")
        ));
    }

    #[test]
    fn summary_serialises_as_symptom_list() {
        let out = render(
            OutputMode::Summary,
            vec![Mention {
                symptom: "cough".into(),
                tense: Tense::Present,
                current: true,
                negated: false,
            }],
        );
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            serde_json::json!({"symptoms": ["cough"]})
        );
    }
}
