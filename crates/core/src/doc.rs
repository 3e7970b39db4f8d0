//! Dependency-parsed documents.
//!
//! A [`Doc`] is the token tree produced by the external parser for one request. It owns every
//! token and is dropped when the request completes. Tokens are exposed as cheap borrowed views
//! ([`Token`]) that can walk the tree in both directions.
//!
//! ## Wire format
//! Parses arrive as the subset of spaCy's `Doc.to_json()` shown below. Offsets are *character*
//! offsets into `text`, `head` is an absolute token index and a sentence root points at itself.
//!
//! ```json
//! {"text": "i have a headache",
//!  "tokens": [{"id": 0, "start": 0, "end": 1, "tag": "PRP", "dep": "nsubj", "head": 1}]}
//! ```

use crate::{SymptomError, SymptomResult};
use serde::{Deserialize, Serialize};

/// One token as serialised by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: usize,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub dep: String,
    pub head: usize,
}

/// A parse as serialised by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDoc {
    pub text: String,
    pub tokens: Vec<TokenRecord>,
}

impl ParsedDoc {
    pub fn from_json(json: &str) -> SymptomResult<Self> {
        serde_json::from_str(json).map_err(SymptomError::Deserialization)
    }
}

#[derive(Debug, Clone)]
struct TokenData {
    // byte offsets into `Doc::text`
    start: usize,
    end: usize,
    lower: String,
    tag: String,
    dep: String,
    head: usize,
}

/// A validated token tree.
///
/// Construction guarantees that every token's text lies on character boundaries of the
/// document text and that every head chain terminates at a sentence root, so the tree walks on
/// [`Token`] always terminate.
#[derive(Debug, Clone)]
pub struct Doc {
    text: String,
    tokens: Vec<TokenData>,
}

impl Doc {
    /// Validate a parser payload and build the token tree.
    ///
    /// # Errors
    ///
    /// Returns `SymptomError::MalformedParse` if:
    /// - a token id does not match its position,
    /// - an offset is out of range or reversed,
    /// - a head index is out of range, or
    /// - following heads from some token never reaches a root (a cycle).
    pub fn from_parsed(parsed: ParsedDoc) -> SymptomResult<Self> {
        let ParsedDoc { text, tokens } = parsed;

        // character offset -> byte offset, with one extra entry for the end of the text
        let byte_at: Vec<usize> = text
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(text.len()))
            .collect();

        let count = tokens.len();
        let mut data = Vec::with_capacity(count);
        for (i, record) in tokens.into_iter().enumerate() {
            if record.id != i {
                return Err(SymptomError::MalformedParse(format!(
                    "token at position {i} has id {}",
                    record.id
                )));
            }
            if record.start > record.end {
                return Err(SymptomError::MalformedParse(format!(
                    "token {i} ends before it starts"
                )));
            }
            let (Some(&start), Some(&end)) = (byte_at.get(record.start), byte_at.get(record.end))
            else {
                return Err(SymptomError::MalformedParse(format!(
                    "token {i} offsets {}..{} exceed text length",
                    record.start, record.end
                )));
            };
            if record.head >= count {
                return Err(SymptomError::MalformedParse(format!(
                    "token {i} has head {} outside the document",
                    record.head
                )));
            }
            data.push(TokenData {
                start,
                end,
                lower: text[start..end].to_lowercase(),
                tag: record.tag,
                dep: record.dep,
                head: record.head,
            });
        }

        for i in 0..count {
            let mut current = i;
            let mut steps = 0;
            while data[current].head != current {
                current = data[current].head;
                steps += 1;
                if steps > count {
                    return Err(SymptomError::MalformedParse(format!(
                        "head chain from token {i} does not reach a root"
                    )));
                }
            }
        }

        Ok(Self { text, tokens: data })
    }

    /// Parse a JSON payload straight into a validated `Doc`.
    pub fn from_json(json: &str) -> SymptomResult<Self> {
        Self::from_parsed(ParsedDoc::from_json(json)?)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Token<'_>> {
        (i < self.tokens.len()).then_some(Token { doc: self, i })
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = Token<'_>> + '_ {
        (0..self.tokens.len()).map(move |i| Token { doc: self, i })
    }

    /// The tokens `start..end` as a span.
    ///
    /// Returns `None` for an empty or out-of-range range.
    pub fn span(&self, start: usize, end: usize) -> Option<Span<'_>> {
        (start < end && end <= self.tokens.len()).then_some(Span {
            doc: self,
            start,
            end,
        })
    }
}

/// A borrowed view of one token. Identity is its position in the document.
#[derive(Debug, Clone, Copy)]
pub struct Token<'d> {
    doc: &'d Doc,
    i: usize,
}

impl PartialEq for Token<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.i == other.i
    }
}

impl Eq for Token<'_> {}

impl<'d> Token<'d> {
    fn data(&self) -> &'d TokenData {
        &self.doc.tokens[self.i]
    }

    /// Position of the token in its document.
    pub fn i(&self) -> usize {
        self.i
    }

    pub fn text(&self) -> &'d str {
        let data = self.data();
        &self.doc.text[data.start..data.end]
    }

    pub fn lower(&self) -> &'d str {
        &self.data().lower
    }

    /// Fine-grained part-of-speech tag, e.g. `VBD`.
    pub fn tag(&self) -> &'d str {
        &self.data().tag
    }

    /// Dependency relation to the head, e.g. `nsubj`.
    pub fn dep(&self) -> &'d str {
        &self.data().dep
    }

    /// The governing token. A sentence root is its own head.
    pub fn head(&self) -> Token<'d> {
        Token {
            doc: self.doc,
            i: self.data().head,
        }
    }

    pub fn is_sentence_root(&self) -> bool {
        self.data().head == self.i
    }

    /// Heads from this token's head up to and including the sentence root.
    pub fn ancestors(&self) -> Ancestors<'d> {
        Ancestors {
            doc: self.doc,
            current: self.i,
        }
    }

    /// Whether `self` governs `other`, directly or transitively.
    pub fn is_ancestor_of(&self, other: &Token<'d>) -> bool {
        other.ancestors().any(|a| a == *self)
    }

    /// Direct dependents in document order.
    pub fn children(&self) -> impl Iterator<Item = Token<'d>> + 'd {
        let doc = self.doc;
        let i = self.i;
        (0..doc.tokens.len())
            .filter(move |&j| j != i && doc.tokens[j].head == i)
            .map(move |j| Token { doc, i: j })
    }

    /// This token and everything it governs, in document order.
    pub fn subtree(&self) -> impl Iterator<Item = Token<'d>> + 'd {
        let root = *self;
        root.doc
            .tokens()
            .filter(move |t| *t == root || root.is_ancestor_of(t))
    }
}

/// Iterator over a token's governing chain. See [`Token::ancestors`].
pub struct Ancestors<'d> {
    doc: &'d Doc,
    current: usize,
}

impl<'d> Iterator for Ancestors<'d> {
    type Item = Token<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.doc.tokens[self.current].head;
        if head == self.current {
            return None;
        }
        self.current = head;
        Some(Token {
            doc: self.doc,
            i: head,
        })
    }
}

/// A contiguous, non-empty run of tokens.
#[derive(Debug, Clone, Copy)]
pub struct Span<'d> {
    doc: &'d Doc,
    start: usize,
    end: usize,
}

impl<'d> Span<'d> {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The covered document text, including any whitespace between tokens.
    pub fn text(&self) -> &'d str {
        let first = &self.doc.tokens[self.start];
        let last = &self.doc.tokens[self.end - 1];
        &self.doc.text[first.start..last.end]
    }

    pub fn tokens(&self) -> impl Iterator<Item = Token<'d>> + 'd {
        let doc = self.doc;
        (self.start..self.end).map(move |i| Token { doc, i })
    }

    fn contains(&self, token: &Token<'d>) -> bool {
        (self.start..self.end).contains(&token.i)
    }

    /// The syntactic head of the phrase.
    ///
    /// Candidates are the tokens whose head lies outside the span (or that are a sentence
    /// root). The candidate closest to the sentence root wins; ties go to the earliest token.
    pub fn root(&self) -> Token<'d> {
        let mut best: Option<(usize, Token<'d>)> = None;
        for token in self.tokens() {
            if !token.is_sentence_root() && self.contains(&token.head()) {
                continue;
            }
            let depth = token.ancestors().count();
            match best {
                Some((best_depth, _)) if best_depth <= depth => {}
                _ => best = Some((depth, token)),
            }
        }
        // A non-empty acyclic span always has a token whose head escapes it.
        best.map(|(_, token)| token).unwrap_or(Token {
            doc: self.doc,
            i: self.start,
        })
    }
}
