//! Sentence boundary scanner
//!
//! A boundary is a maximal run of `.`, `!` or `?` followed by:
//! - whitespace then an uppercase letter,
//! - only whitespace until the end of the text,
//! - optional whitespace then an opening quote or parenthesis.
//!
//! The run itself belongs to neither side. A period closing a vocabulary
//! abbreviation is ordinary text and cannot start a run.

use crate::Abbreviations;

const ACCENTED_UPPER: &str = "ÀÂÄÉÈÊËÏÎÔÖÙÛÜŸÇ";

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_sentence_initial(c: char) -> bool {
    c.is_ascii_uppercase() || ACCENTED_UPPER.contains(c)
}

fn is_opener(c: char) -> bool {
    matches!(c, '"' | '\'' | '(')
}

fn closes_sentence(rest: &[(usize, char)]) -> bool {
    let gap = rest.iter().take_while(|(_, c)| c.is_whitespace()).count();
    match rest.get(gap) {
        None => true,
        Some(&(_, c)) if is_opener(c) => true,
        Some(&(_, c)) => gap > 0 && is_sentence_initial(c),
    }
}

/// Split `text` into raw sentence pieces, in order of appearance.
///
/// Pieces are slices of `text` and are neither trimmed nor filtered; a text
/// ending on a boundary yields a trailing empty piece.
pub fn split_sentences<'a>(text: &'a str, abbreviations: &Abbreviations) -> Vec<&'a str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !is_terminal(c) || (c == '.' && abbreviations.protects(text, pos)) {
            i += 1;
            continue;
        }

        let mut end = i;
        while end < chars.len() && is_terminal(chars[end].1) {
            end += 1;
        }

        if closes_sentence(&chars[end..]) {
            pieces.push(&text[start..pos]);
            start = chars.get(end).map_or(text.len(), |&(p, _)| p);
        }
        i = end;
    }

    pieces.push(&text[start..]);
    pieces
}

/// Trim and collapse every whitespace run to a single space.
pub fn normalize_whitespace(piece: &str) -> String {
    piece.split_whitespace().collect::<Vec<_>>().join(" ")
}
