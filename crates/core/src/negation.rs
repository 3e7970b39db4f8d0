//! Negation scope detection.

use crate::constants::{NEGATION_DEPENDENCY, NEGATION_WORDS};
use crate::doc::Token;

fn is_negation_word(token: &Token<'_>) -> bool {
    NEGATION_WORDS.contains(&token.lower())
}

/// Whether a mention anchored at `token` sits inside negation scope.
///
/// Two checks, in order:
/// 1. any token on the full ancestor chain is a negation word;
/// 2. any direct child of the token's *head* carries the `neg` relation or is a negation word.
///
/// The token's own children are never inspected.
pub fn is_negated(token: Token<'_>) -> bool {
    if token.ancestors().any(|ancestor| is_negation_word(&ancestor)) {
        return true;
    }

    token
        .head()
        .children()
        .any(|child| child.dep() == NEGATION_DEPENDENCY || is_negation_word(&child))
}
