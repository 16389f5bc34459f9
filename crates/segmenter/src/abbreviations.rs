//! Fixed abbreviation vocabulary
//!
//! Each entry is the stem of an abbreviation conventionally written with a
//! trailing period. A period that closes one of these stems never ends a
//! sentence.

use std::collections::HashSet;

pub const VOCABULARY: &[&str] = &[
    // titles and honorifics
    "M", "Mme", "Mlle", "Dr", "Pr", "St", "Ste", "Jr", "Sr", "Lt", "Col", "Gen", "Cdt", "Cpt",
    "MM", "Mmes", "Mlles", "Drs", "Prs", "Sts", "Stes",
    // latin and references
    "etc", "cf", "vs", "p", "pp", "vol", "n°", "art", "ch", "sect", "al", "op", "loc", "ibid", "id",
    // addresses
    "av", "bd", "rue", "pl", "sq", "imp", "all",
    // months
    "janv", "févr", "mars", "avr", "mai", "juin", "juill", "août", "sept", "oct", "nov", "déc",
];

#[derive(Clone, Debug)]
pub struct Abbreviations {
    stems: HashSet<String>,
    max_chars: usize,
}

impl Abbreviations {
    pub fn new<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stems: HashSet<String> = stems.into_iter().map(Into::into).collect();
        let max_chars = stems.iter().map(|s| s.chars().count()).max().unwrap_or(0);
        Self { stems, max_chars }
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// Whether the period at byte offset `dot` closes a known abbreviation.
    ///
    /// The stem must sit directly before the period and start a word: it is
    /// either at the start of `text` or preceded by a non-alphanumeric char.
    /// Matching is case-sensitive.
    pub fn protects(&self, text: &str, dot: usize) -> bool {
        let (Some(head), Some(tail)) = (text.get(..dot), text.get(dot..)) else {
            return false;
        };
        if !tail.starts_with('.') {
            return false;
        }
        head.char_indices()
            .rev()
            .take(self.max_chars)
            .any(|(start, _)| self.stems.contains(&head[start..]) && starts_word(head, start))
    }
}

impl Default for Abbreviations {
    fn default() -> Self {
        Self::new(VOCABULARY.iter().copied())
    }
}

fn starts_word(head: &str, start: usize) -> bool {
    head[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}
