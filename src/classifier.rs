//! Nearest-neighbor domain classifier.
//!
//! Maps a free-text project description to the K=3 most similar domains in
//! the catalog. Brute force over the catalog is deliberate: it holds tens
//! of entries and never changes, so determinism beats index structures.

use std::sync::Arc;

use crate::domains::DomainCatalog;
use crate::embedding::keyphrases::join_phrases;
use crate::embedding::{cosine_similarity, Embedder, EmbeddingError, KeyphraseExtractor};

/// Number of domain predictions returned per query
pub const K_NEAREST: usize = 3;

/// One predicted domain with its cosine distance to the query.
/// Distance is raw (1 - cosine similarity): 0 means identical, larger
/// means less similar. It is not normalized to any fixed range.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainPrediction {
    pub label: String,
    pub distance: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("project description cannot be empty")]
    EmptyDescription,

    #[error("query dimension mismatch: catalog has {expected}, query has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding backend error: {0}")]
    Embedding(#[from] EmbeddingError),
}

pub struct DomainClassifier {
    catalog: DomainCatalog,
    embedder: Arc<dyn Embedder>,
    extractor: Box<dyn KeyphraseExtractor>,
}

impl DomainClassifier {
    pub fn new(
        catalog: DomainCatalog,
        embedder: Arc<dyn Embedder>,
        extractor: Box<dyn KeyphraseExtractor>,
    ) -> Self {
        Self {
            catalog,
            embedder,
            extractor,
        }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    /// Classify a description against the domain catalog.
    ///
    /// Returns `min(K_NEAREST, catalog.len())` predictions in ascending
    /// distance order. Ties keep catalog insertion order (stable sort).
    pub fn classify(&self, description: &str) -> Result<Vec<DomainPrediction>, ClassifyError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ClassifyError::EmptyDescription);
        }

        let phrases = self.extractor.extract(description)?;
        let query_text = join_phrases(&phrases);
        log::debug!("keyphrases for classification: {query_text:?}");

        let query = self.embedder.embed(&query_text)?;
        if query.len() != self.catalog.dimensions() {
            // Embedder and catalog disagree on D. This is a wiring bug,
            // not a property of the request.
            return Err(ClassifyError::DimensionMismatch {
                expected: self.catalog.dimensions(),
                got: query.len(),
            });
        }

        let mut predictions: Vec<DomainPrediction> = self
            .catalog
            .iter()
            .map(|entry| DomainPrediction {
                label: entry.label.clone(),
                distance: 1.0 - cosine_similarity(&query, &entry.vector),
            })
            .collect();

        // Stable sort: equal distances keep catalog order
        predictions.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        predictions.truncate(K_NEAREST.min(self.catalog.len()));

        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::DomainEntry;

    /// Deterministic embedder: maps known strings to fixed unit vectors.
    struct FakeEmbedder {
        dimensions: usize,
    }

    impl FakeEmbedder {
        fn vector_for(&self, text: &str) -> Vec<f32> {
            match text {
                t if t.contains("bank") => vec![1.0, 0.0, 0.0],
                t if t.contains("health") => vec![0.0, 1.0, 0.0],
                t if t.contains("farm") => vec![0.0, 0.0, 1.0],
                _ => vec![0.5, 0.5, 0.5],
            }
        }
    }

    impl Embedder for FakeEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            Ok(self.vector_for(text))
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|t| self.vector_for(t)).collect())
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    /// Pass-through extractor: the whole description is one phrase.
    struct PassthroughExtractor;

    impl KeyphraseExtractor for PassthroughExtractor {
        fn extract(
            &self,
            text: &str,
        ) -> Result<Vec<crate::embedding::Keyphrase>, EmbeddingError> {
            Ok(vec![crate::embedding::Keyphrase {
                phrase: text.to_string(),
                relevance: 1.0,
            }])
        }
    }

    fn test_classifier(entries: Vec<DomainEntry>) -> DomainClassifier {
        let catalog = DomainCatalog::from_entries(entries).unwrap();
        DomainClassifier::new(
            catalog,
            Arc::new(FakeEmbedder { dimensions: 3 }),
            Box::new(PassthroughExtractor),
        )
    }

    fn four_domain_entries() -> Vec<DomainEntry> {
        vec![
            DomainEntry { label: "FinTech".into(), vector: vec![1.0, 0.0, 0.0] },
            DomainEntry { label: "Healthcare".into(), vector: vec![0.0, 1.0, 0.0] },
            DomainEntry { label: "AgriTech".into(), vector: vec![0.0, 0.0, 1.0] },
            DomainEntry { label: "IoT".into(), vector: vec![0.6, 0.6, 0.0] },
        ]
    }

    #[test]
    fn test_empty_description_rejected() {
        let classifier = test_classifier(four_domain_entries());
        assert!(matches!(
            classifier.classify(""),
            Err(ClassifyError::EmptyDescription)
        ));
        assert!(matches!(
            classifier.classify("   \n\t"),
            Err(ClassifyError::EmptyDescription)
        ));
    }

    #[test]
    fn test_returns_k_results_ascending() {
        let classifier = test_classifier(four_domain_entries());
        let predictions = classifier.classify("bank fraud platform").unwrap();

        assert_eq!(predictions.len(), K_NEAREST);
        assert_eq!(predictions[0].label, "FinTech");
        assert!((predictions[0].distance).abs() < 1e-6);
        for pair in predictions.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
    }

    #[test]
    fn test_small_catalog_returns_all() {
        let classifier = test_classifier(vec![
            DomainEntry { label: "FinTech".into(), vector: vec![1.0, 0.0, 0.0] },
            DomainEntry { label: "Healthcare".into(), vector: vec![0.0, 1.0, 0.0] },
        ]);

        let predictions = classifier.classify("bank fraud platform").unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].label, "FinTech");
    }

    #[test]
    fn test_deterministic_repeat_calls() {
        let classifier = test_classifier(four_domain_entries());
        let first = classifier.classify("health monitoring wearables").unwrap();
        let second = classifier.classify("health monitoring wearables").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tie_break_keeps_catalog_order() {
        // Two identical reference vectors: the earlier catalog entry must
        // come first in the prediction list.
        let classifier = test_classifier(vec![
            DomainEntry { label: "Security".into(), vector: vec![1.0, 0.0, 0.0] },
            DomainEntry { label: "Cybersecurity".into(), vector: vec![1.0, 0.0, 0.0] },
            DomainEntry { label: "Healthcare".into(), vector: vec![0.0, 1.0, 0.0] },
        ]);

        let predictions = classifier.classify("bank fraud platform").unwrap();
        assert_eq!(predictions[0].label, "Security");
        assert_eq!(predictions[1].label, "Cybersecurity");
    }

    #[test]
    fn test_dimension_mismatch_is_fatal_error() {
        let catalog = DomainCatalog::from_entries(vec![DomainEntry {
            label: "FinTech".into(),
            vector: vec![1.0, 0.0, 0.0, 0.0],
        }])
        .unwrap();
        let classifier = DomainClassifier::new(
            catalog,
            Arc::new(FakeEmbedder { dimensions: 3 }),
            Box::new(PassthroughExtractor),
        );

        assert!(matches!(
            classifier.classify("bank fraud platform"),
            Err(ClassifyError::DimensionMismatch { expected: 4, got: 3 })
        ));
    }
}
