use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use segmenter::{ArticleMetadata, Phrase};

const PHRASE_KEY_SEP: &str = "_phrase_";

/// One input row of a dataset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Article {
    pub row: usize, // 0-based data row in the source file
    pub content: String,
    pub headline: String,
    pub url: String,
    pub date_published: String,
}

/// One human judgment, denormalized from the phrase it was made on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub annotation: u8, // 0 or 1
    pub timestamp: String,
    pub content: String,
    pub article_index: usize,
    pub sentence_index: usize,
    pub shuffled_index: usize,
    pub original_article_index: usize,
    pub metadata: ArticleMetadata,
}

impl Annotation {
    pub fn from_phrase(value: u8, phrase: &Phrase) -> Self {
        Self {
            annotation: value,
            timestamp: chrono::Local::now().to_rfc3339(),
            content: phrase.text.clone(),
            article_index: phrase.metadata.article_index,
            sentence_index: phrase.sentence_index,
            shuffled_index: phrase.shuffled_index,
            original_article_index: phrase.metadata.original_article_index,
            metadata: phrase.metadata.clone(),
        }
    }
}

/// Full progress record, written on every annotation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current_file: Option<String>,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub annotations: BTreeMap<String, Annotation>,
    #[serde(default)]
    pub last_updated: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub current_file: Option<String>,
    pub progress: usize,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ItemMetadata {
    pub headline: String,
    pub url: String,
    pub date_published: String,
    pub article_index: usize,
    pub sentence_index: usize,
    pub shuffled_index: usize,
    pub phrase_info: String,
}

/// The phrase under the cursor, shaped for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrentItem {
    pub index: usize,
    pub total: usize,
    pub content: String,
    pub metadata: ItemMetadata,
}

impl CurrentItem {
    pub fn new(index: usize, total: usize, phrase: &Phrase) -> Self {
        let meta = &phrase.metadata;
        Self {
            index,
            total,
            content: phrase.text.clone(),
            metadata: ItemMetadata {
                headline: meta.headline.clone(),
                url: meta.url.clone(),
                date_published: meta.date_published.clone(),
                article_index: meta.article_index,
                sentence_index: phrase.sentence_index,
                shuffled_index: phrase.shuffled_index,
                phrase_info: format!(
                    "Phrase {} from shuffled article {} (randomized order)",
                    phrase.sentence_index + 1,
                    meta.article_index + 1
                ),
            },
        }
    }
}

/// One exported row; field order is the column order of the output file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub phrase_index: usize,
    pub content: String,
    pub annotation: u8,
    pub shuffled_index: usize,
    pub article_index: usize,
    pub sentence_index: usize,
    pub original_article_index: usize,
    pub headline: String,
    pub url: String,
    pub date_published: String,
    pub timestamp: String,
    pub source_file: String,
}

impl ExportRow {
    pub fn new(phrase_index: usize, source_file: &str, a: &Annotation) -> Self {
        Self {
            phrase_index,
            content: a.content.clone(),
            annotation: a.annotation,
            shuffled_index: a.shuffled_index,
            article_index: a.article_index,
            sentence_index: a.sentence_index,
            original_article_index: a.original_article_index,
            headline: a.metadata.headline.clone(),
            url: a.metadata.url.clone(),
            date_published: a.metadata.date_published.clone(),
            timestamp: a.timestamp.clone(),
            source_file: source_file.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub file: String,
    pub articles: usize,
    pub phrases: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded and shuffled {} articles with {} phrases from {}",
            self.articles, self.phrases, self.file
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub files: Vec<String>,
    /// Source files whose artifact could not be written.
    pub skipped: Vec<String>,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Exported {} phrase annotation files", self.files.len())
    }
}

/// Annotation map key: `<file>_phrase_<ordinal>`.
pub fn item_key(file: &str, ordinal: usize) -> String {
    format!("{file}{PHRASE_KEY_SEP}{ordinal}")
}

/// Inverse of [`item_key`]; splits at the last separator. Foreign keys give `None`.
pub fn parse_item_key(key: &str) -> Option<(&str, usize)> {
    let (file, ordinal) = key.rsplit_once(PHRASE_KEY_SEP)?;
    if ordinal.is_empty() || !ordinal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((file, ordinal.parse().ok()?))
}
