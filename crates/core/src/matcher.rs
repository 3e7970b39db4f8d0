//! Literal symptom phrase matching over parsed documents.

use crate::constants::DEFAULT_SYMPTOMS;
use crate::doc::{Doc, Span};

/// The configured symptom phrases, normalised and de-duplicated.
///
/// Phrases are lowercased and internal whitespace is collapsed to single spaces. Blank entries
/// are dropped and repeated phrases keep only their first position, so building a vocabulary
/// from the same list twice (or from a list with duplicates) yields an identical matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomVocabulary {
    phrases: Vec<String>,
}

impl SymptomVocabulary {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalised: Vec<String> = Vec::new();
        for phrase in phrases {
            let phrase = normalise(phrase.as_ref());
            if !phrase.is_empty() && !normalised.contains(&phrase) {
                normalised.push(phrase);
            }
        }
        Self { phrases: normalised }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

impl Default for SymptomVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SYMPTOMS)
    }
}

fn normalise(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One occurrence of a configured phrase.
#[derive(Debug, Clone, Copy)]
pub struct PhraseMatch<'m, 'd> {
    /// The configured phrase that matched.
    pub phrase: &'m str,
    pub span: Span<'d>,
}

impl<'d> PhraseMatch<'_, 'd> {
    /// The verbatim document text covered by the match.
    pub fn text(&self) -> &'d str {
        self.span.text()
    }
}

/// Token-aligned phrase matcher over a [`SymptomVocabulary`].
///
/// A phrase matches a run of tokens when the document text covering the run, lowercased and
/// with whitespace collapsed, equals the phrase. Phrases are therefore split wherever the parser
/// splits the document, so "runny-nose" or "can't sleep" match however the parser tokenizes
/// the punctuation. Runs must start and end on token boundaries.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    vocabulary: SymptomVocabulary,
}

impl PhraseMatcher {
    pub fn new(vocabulary: &SymptomVocabulary) -> Self {
        Self {
            vocabulary: vocabulary.clone(),
        }
    }

    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    /// Every occurrence of every phrase, ordered by span start and then span end.
    ///
    /// Overlapping occurrences are all reported; resolving them is left to the caller.
    pub fn find<'m, 'd>(&'m self, doc: &'d Doc) -> Vec<PhraseMatch<'m, 'd>> {
        let mut matches = Vec::new();
        for start in 0..doc.len() {
            for phrase in self.vocabulary.phrases() {
                if let Some(span) = run_matching(doc, start, phrase) {
                    matches.push(PhraseMatch {
                        phrase: phrase.as_str(),
                        span,
                    });
                }
            }
        }

        matches.sort_by_key(|m| (m.span.start(), m.span.end()));
        matches
    }
}

/// The shortest token run beginning at `start` whose normalised text equals `phrase`.
fn run_matching<'d>(doc: &'d Doc, start: usize, phrase: &str) -> Option<Span<'d>> {
    for end in start + 1..=doc.len() {
        let span = doc.span(start, end)?;
        let covered = normalise(span.text());
        if covered == phrase {
            return Some(span);
        }
        if !phrase.starts_with(covered.as_str()) {
            return None;
        }
    }
    None
}
