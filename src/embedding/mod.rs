//! Text embedding infrastructure.
//!
//! - `model`: wraps fastembed for fixed-length embedding generation
//! - `keyphrases`: keyphrase extraction used to compact descriptions
//!   before embedding
//!
//! The `Embedder` trait is the seam between the core and the embedding
//! backend; production code uses `EmbeddingModel`, tests substitute a
//! deterministic fake.

pub mod keyphrases;
pub mod model;

pub use keyphrases::{Keyphrase, KeyphraseExtractor, SimilarityKeyphraseExtractor};
pub use model::{EmbeddingError, EmbeddingModel};

/// Default embedding model name (the domain seed catalog was tuned
/// against MiniLM vectors)
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Text-in/vector-out contract for the embedding backend.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
    fn dimensions(&self) -> usize;
}

impl Embedder for EmbeddingModel {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        EmbeddingModel::embed(self, text)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        EmbeddingModel::embed_batch(self, texts)
    }

    fn dimensions(&self) -> usize {
        EmbeddingModel::dimensions(self)
    }
}

/// Compute L2 norm of a vector.
pub(crate) fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Compute cosine similarity between two vectors.
/// Returns 0.0 when either vector has (near-)zero norm.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a < f32::EPSILON || norm_b < f32::EPSILON {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot_product / (norm_a * norm_b)
}
