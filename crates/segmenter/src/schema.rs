use serde::{Deserialize, Serialize};

/// Article-level fields copied onto every phrase at extraction time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub date_published: String,
    pub article_index: usize,       // post-shuffle article position
    #[serde(default)]
    pub original_article_index: usize, // data row in the source file
}

/// One sentence-level unit extracted from one article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    pub article_index: usize,
    pub sentence_index: usize,
    pub metadata: ArticleMetadata,
    /// Presentation position; assigned by the session after the global shuffle.
    pub shuffled_index: usize,
}
