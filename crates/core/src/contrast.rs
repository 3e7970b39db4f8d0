//! Sentence-level contrast and recovery detection.

use crate::constants::{CONTRAST_WORDS, RECOVERY_WORDS};
use crate::doc::Doc;

/// Whether the document contains a contrastive conjunction whose subtree mentions recovery,
/// as in "... but i'm fine".
///
/// The verdict is document-wide: it is not bound to the clause, or the symptoms, the
/// conjunction actually governs.
pub fn resolves_to_recovery(doc: &Doc) -> bool {
    doc.tokens()
        .filter(|token| CONTRAST_WORDS.contains(&token.lower()))
        .any(|contrast| {
            contrast
                .subtree()
                .any(|descendant| RECOVERY_WORDS.contains(&descendant.lower()))
        })
}
