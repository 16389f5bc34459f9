//! Sentence-level phrase extraction
//!
//! Splits article prose into phrases while treating a fixed vocabulary of
//! abbreviations (titles, months, references) as non-terminating periods.

mod abbreviations;
mod scanner;
mod schema;

pub use abbreviations::{Abbreviations, VOCABULARY};
pub use scanner::{normalize_whitespace, split_sentences};
pub use schema::{ArticleMetadata, Phrase};

use std::sync::OnceLock;

/// Phrases shorter than this (in characters, after normalization) are dropped.
pub const MIN_PHRASE_CHARS: usize = 15;

fn vocabulary() -> &'static Abbreviations {
    static ABBREVIATIONS: OnceLock<Abbreviations> = OnceLock::new();
    ABBREVIATIONS.get_or_init(Abbreviations::default)
}

/// Extract the phrases of one article.
///
/// Never fails: empty or fragment-only input yields an empty vector.
/// `sentence_index` counts retained phrases only, in order of appearance.
pub fn extract_phrases(text: &str, article_index: usize, metadata: &ArticleMetadata) -> Vec<Phrase> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }

    let phrases: Vec<Phrase> = split_sentences(text, vocabulary())
        .into_iter()
        .map(normalize_whitespace)
        .filter(|s| s.chars().count() >= MIN_PHRASE_CHARS)
        .enumerate()
        .map(|(sentence_index, text)| Phrase {
            text,
            article_index,
            sentence_index,
            metadata: metadata.clone(),
            shuffled_index: 0,
        })
        .collect();

    tracing::trace!(article_index, phrases = phrases.len(), "extracted phrases");
    phrases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ArticleMetadata {
        ArticleMetadata {
            headline: "Titre".into(),
            url: "https://example.org/a".into(),
            date_published: "2024-03-01".into(),
            article_index: 3,
            original_article_index: 7,
        }
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extract_phrases("", 0, &meta()).is_empty());
        assert!(extract_phrases("   \n\t ", 0, &meta()).is_empty());
    }

    #[test]
    fn test_abbreviation_does_not_split() {
        let text = "Dr. Martin est arrivé hier soir. Il a souri à toute la salle.";
        let phrases = extract_phrases(text, 0, &meta());
        let texts: Vec<&str> = phrases.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Dr. Martin est arrivé hier soir", "Il a souri à toute la salle"]);
    }

    #[test]
    fn test_short_fragments_dropped_and_indices_gapless() {
        let text = "Oui. Le gouvernement a annoncé un plan. Non! La réforme entrera en vigueur demain.";
        let phrases = extract_phrases(text, 2, &meta());
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].sentence_index, 0);
        assert_eq!(phrases[1].sentence_index, 1);
        assert_eq!(phrases[1].text, "La réforme entrera en vigueur demain");
        assert!(phrases.iter().all(|p| p.article_index == 2));
    }

    #[test]
    fn test_whitespace_normalized() {
        let text = "  Le   marché\n\na   reculé\tde deux points.  ";
        let phrases = extract_phrases(text, 0, &meta());
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].text, "Le marché a reculé de deux points");
    }

    #[test]
    fn test_metadata_is_owned_per_phrase() {
        let text = "Première phrase assez longue. Deuxième phrase assez longue.";
        let mut phrases = extract_phrases(text, 0, &meta());
        assert_eq!(phrases.len(), 2);
        phrases[0].metadata.headline.push_str(" modifié");
        assert_eq!(phrases[1].metadata.headline, "Titre");
        assert_eq!(phrases[1].metadata.original_article_index, 7);
    }
}
