//! Keyphrase extraction for project descriptions.
//!
//! Descriptions are compacted to their most relevant phrases before being
//! embedded for domain classification. Extraction is similarity-based:
//! candidate 1-3 word phrases are embedded alongside the full description
//! and ranked by cosine similarity to it. Stop words and one-character
//! tokens never appear inside candidates.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

use super::{cosine_similarity, Embedder, EmbeddingError};

/// Maximum number of keyphrases kept per description
pub const MAX_KEYPHRASES: usize = 10;

/// Largest candidate phrase length in tokens
const MAX_NGRAM: usize = 3;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being",
        "in", "on", "at", "to", "for", "of", "with", "by", "from", "as",
        "and", "or", "but", "not", "no", "so", "if", "then", "it", "its",
        "this", "that", "these", "those", "we", "our", "you", "your",
        "will", "would", "can", "could", "have", "has", "had", "do", "does",
    ]
    .into_iter()
    .collect()
});

/// A single extracted phrase with its relevance to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyphrase {
    pub phrase: String,
    pub relevance: f32,
}

/// Text-in/phrases-out contract for keyphrase extraction.
///
/// Returns at most `MAX_KEYPHRASES` phrases in descending relevance order.
/// Callers are expected to reject empty input before delegating here.
pub trait KeyphraseExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<Keyphrase>, EmbeddingError>;
}

/// Join extracted phrases into a single embedding input, relevance order.
pub fn join_phrases(phrases: &[Keyphrase]) -> String {
    phrases
        .iter()
        .map(|k| k.phrase.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity-ranked keyphrase extractor backed by the embedding model.
///
/// One batch call embeds the full text plus every unique candidate phrase;
/// candidates are then scored against the full-text embedding. Ties keep
/// first-occurrence order (stable sort).
pub struct SimilarityKeyphraseExtractor {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityKeyphraseExtractor {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

impl KeyphraseExtractor for SimilarityKeyphraseExtractor {
    fn extract(&self, text: &str) -> Result<Vec<Keyphrase>, EmbeddingError> {
        let candidates = candidate_phrases(text);
        if candidates.is_empty() {
            // Nothing survived tokenization (all stop words / punctuation).
            // Fall back to the raw text so the caller still gets an
            // embeddable phrase.
            return Ok(vec![Keyphrase {
                phrase: text.trim().to_string(),
                relevance: 0.0,
            }]);
        }

        let mut batch = Vec::with_capacity(candidates.len() + 1);
        batch.push(text.to_string());
        batch.extend(candidates.iter().cloned());

        let vectors = self.embedder.embed_batch(&batch)?;
        let (doc_vector, candidate_vectors) = vectors
            .split_first()
            .ok_or_else(|| EmbeddingError::EmbeddingFailed("No embedding returned".to_string()))?;

        let mut scored: Vec<Keyphrase> = candidates
            .into_iter()
            .zip(candidate_vectors.iter())
            .map(|(phrase, vector)| Keyphrase {
                phrase,
                relevance: cosine_similarity(doc_vector, vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(MAX_KEYPHRASES);

        Ok(scored)
    }
}

/// Tokenize text into lowercase terms.
/// Filters out very short terms (1 char) and common stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|s| s.to_lowercase())
        .filter(|s| s.len() > 1 && !STOP_WORDS.contains(s.as_str()))
        .collect()
}

/// Build unique candidate n-grams (n = 1..=MAX_NGRAM) in occurrence order.
fn candidate_phrases(text: &str) -> Vec<String> {
    let tokens = tokenize(text);

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for n in 1..=MAX_NGRAM {
        for window in tokens.windows(n) {
            let phrase = window.join(" ");
            if seen.insert(phrase.clone()) {
                candidates.push(phrase);
            }
        }
    }
    candidates
}
