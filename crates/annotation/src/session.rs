//! Annotation session: the shuffled phrase list, the cursor and the
//! accumulated judgments.

use std::collections::BTreeMap;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use segmenter::{extract_phrases, ArticleMetadata, Phrase};
use tracing::{debug, info, warn};

use crate::{
    item_key, parse_item_key, Annotation, AnnotationError, ArtifactSink, Article, CurrentItem,
    ExportRow, ExportSummary, LoadSummary, ProgressSnapshot, ProgressStats, ProgressStore, Result,
};

/// Seed of the article-level reorder.
pub const ARTICLE_SEED: u64 = 42;
/// Seed of the phrase-level shuffle that fixes presentation order.
pub const PHRASE_SEED: u64 = 42;

fn seeded_shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);
}

pub struct Session {
    current_file: Option<String>,
    phrases: Vec<Phrase>,
    current_index: usize,
    total_items: usize,
    annotations: BTreeMap<String, Annotation>,
    store: Box<dyn ProgressStore>,
}

impl Session {
    /// Hydrate from `store`. An unreadable or malformed store starts empty.
    pub fn open(store: Box<dyn ProgressStore>) -> Self {
        let mut session = Self {
            current_file: None,
            phrases: Vec::new(),
            current_index: 0,
            total_items: 0,
            annotations: BTreeMap::new(),
            store,
        };

        match session.store.load() {
            Ok(Some(snap)) => {
                info!(
                    "Restored progress: {} annotations, cursor {} in {:?}",
                    snap.annotations.len(),
                    snap.current_index,
                    snap.current_file
                );
                session.current_file = snap.current_file;
                session.current_index = snap.current_index;
                session.total_items = snap.total_items;
                session.annotations = snap.annotations;
            }
            Ok(None) => {}
            Err(e) => warn!("Error loading progress, starting fresh: {e}"),
        }
        session
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn annotations(&self) -> &BTreeMap<String, Annotation> {
        &self.annotations
    }

    /// Replace the active dataset with `articles` from `name`.
    ///
    /// Reloading the same file keeps the cursor unless it no longer fits.
    pub fn load(&mut self, name: &str, articles: Vec<Article>) -> LoadSummary {
        let mut articles: Vec<Article> = articles
            .into_iter()
            .filter(|a| !a.content.trim().is_empty())
            .collect();
        seeded_shuffle(&mut articles, ARTICLE_SEED);
        debug!("Shuffled {} articles", articles.len());

        let mut phrases = Vec::new();
        for (article_index, article) in articles.iter().enumerate() {
            let metadata = ArticleMetadata {
                headline: article.headline.clone(),
                url: article.url.clone(),
                date_published: article.date_published.clone(),
                article_index,
                original_article_index: article.row,
            };
            phrases.extend(extract_phrases(&article.content, article_index, &metadata));
        }

        seeded_shuffle(&mut phrases, PHRASE_SEED);
        for (i, phrase) in phrases.iter_mut().enumerate() {
            phrase.shuffled_index = i;
        }
        debug!("Shuffled {} phrases", phrases.len());

        let total = phrases.len();
        if self.current_file.as_deref() != Some(name) || self.current_index > total {
            self.current_index = 0;
        }
        self.current_file = Some(name.to_string());
        self.phrases = phrases;
        self.total_items = total;

        let summary = LoadSummary {
            file: name.to_string(),
            articles: articles.len(),
            phrases: total,
        };
        info!("{summary}");
        summary
    }

    /// The phrase under the cursor, or `None` when nothing is left.
    pub fn current(&self) -> Option<CurrentItem> {
        if self.current_index >= self.total_items {
            return None;
        }
        let phrase = self.phrases.get(self.current_index)?;
        Some(CurrentItem::new(self.current_index, self.total_items, phrase))
    }

    /// Record `value` (0 or 1) for the current phrase and advance the cursor.
    ///
    /// The progress write is best-effort: a failed save is logged and the
    /// judgment stays recorded in memory.
    pub fn annotate(&mut self, value: i64) -> Result<()> {
        let value = match value {
            0 | 1 => value as u8,
            _ => return Err(AnnotationError::Validation("Invalid annotation value".into())),
        };
        let Some(file) = self.current_file.as_deref().filter(|_| !self.phrases.is_empty()) else {
            return Err(AnnotationError::NoData("No phrases loaded".into()));
        };
        let Some(phrase) = self.phrases.get(self.current_index) else {
            return Err(AnnotationError::Exhausted);
        };

        let key = item_key(file, self.current_index);
        let record = Annotation::from_phrase(value, phrase);
        self.annotations.insert(key, record);
        self.current_index += 1;

        self.persist();
        Ok(())
    }

    pub fn stats(&self) -> ProgressStats {
        let Some(file) = self.current_file.as_deref() else {
            return ProgressStats::default();
        };

        let completed = self
            .annotations
            .keys()
            .filter_map(|k| parse_item_key(k))
            .filter(|(f, _)| *f == file)
            .count();
        let percentage = if self.total_items > 0 {
            (completed as f64 / self.total_items as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        ProgressStats {
            current_file: Some(file.to_string()),
            progress: self.current_index,
            completed,
            total: self.total_items,
            percentage,
        }
    }

    /// Drop the active dataset. Recorded annotations are kept for export.
    pub fn reset(&mut self) {
        self.current_file = None;
        self.phrases.clear();
        self.current_index = 0;
        self.total_items = 0;
        info!("Progress reset; {} annotations retained", self.annotations.len());
    }

    /// Write one artifact per source file, rows ordered by phrase ordinal.
    ///
    /// A file whose artifact cannot be written is skipped and reported in
    /// [`ExportSummary::skipped`].
    pub fn export(&self, sink: &dyn ArtifactSink) -> Result<ExportSummary> {
        if self.annotations.is_empty() {
            return Err(AnnotationError::NoData("No annotations to export".into()));
        }

        let mut groups: BTreeMap<&str, Vec<ExportRow>> = BTreeMap::new();
        for (key, annotation) in &self.annotations {
            let Some((file, ordinal)) = parse_item_key(key) else { continue };
            groups
                .entry(file)
                .or_default()
                .push(ExportRow::new(ordinal, file, annotation));
        }

        let mut summary = ExportSummary::default();
        for (file, mut rows) in groups {
            rows.sort_by_key(|r| r.phrase_index);
            match sink.write(file, &rows) {
                Ok(name) => {
                    info!("Exported {} rows of {file} to {name}", rows.len());
                    summary.files.push(name);
                }
                Err(e) => {
                    warn!("Error exporting {file}: {e}");
                    summary.skipped.push(file.to_string());
                }
            }
        }
        Ok(summary)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            current_file: self.current_file.clone(),
            current_index: self.current_index,
            total_items: self.total_items,
            annotations: self.annotations.clone(),
            last_updated: chrono::Local::now().to_rfc3339(),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.snapshot()) {
            warn!("Error saving progress: {e}");
        }
    }
}
