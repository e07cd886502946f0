//! fastembed-backed implementation of the `Embedder` contract.
//!
//! Model files are fetched into the cache directory on first use. The
//! fetch runs under the configured deadline, so a stalled download fails
//! startup instead of wedging it. Embedding calls serialize on an
//! internal Mutex because fastembed's `embed` needs `&mut self`.

use fastembed::{InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::time::Duration;

/// Download deadline when the config does not set one (5 minutes)
const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Names accepted in `embedding.model`. Any of these works as a backend:
/// the domain seed catalog is re-embedded at startup with whichever model
/// is configured, so catalog and query vectors always share a space.
const SUPPORTED_MODELS: &[(&str, fastembed::EmbeddingModel)] = &[
    ("all-minilm-l6-v2", fastembed::EmbeddingModel::AllMiniLML6V2),
    ("bge-small-en-v1.5", fastembed::EmbeddingModel::BGESmallENV15),
    ("bge-base-en-v1.5", fastembed::EmbeddingModel::BGEBaseENV15),
    ("bge-large-en-v1.5", fastembed::EmbeddingModel::BGELargeENV15),
];

pub struct EmbeddingModel {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

impl std::fmt::Debug for EmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("model setup failed: {0}")]
    InitFailed(String),

    #[error("model download timed out after {0}s")]
    DownloadTimeout(u64),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("unsupported model {0:?}; known models: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5")]
    InvalidModel(String),
}

impl EmbeddingModel {
    /// Load the named model, downloading it into `cache_dir/models` if
    /// the cache is cold. The download (and any load work) must finish
    /// within `download_timeout` or `DownloadTimeout` is returned.
    pub fn new(
        model_name: &str,
        cache_dir: PathBuf,
        download_timeout: Option<Duration>,
    ) -> Result<Self, EmbeddingError> {
        let model_kind = lookup_model(model_name)?;
        let timeout = download_timeout.unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT);

        let models_dir = cache_dir.join("models");
        std::fs::create_dir_all(&models_dir).map_err(|e| {
            EmbeddingError::InitFailed(format!("cannot create {}: {e}", models_dir.display()))
        })?;

        let options = InitOptions::new(model_kind)
            .with_cache_dir(models_dir)
            .with_show_download_progress(true);

        let loaded = run_with_deadline(move || TextEmbedding::try_new(options), timeout)
            .ok_or(EmbeddingError::DownloadTimeout(timeout.as_secs()))?;
        let mut model = loaded.map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        let dimensions = probe_dimensions(&mut model)?;
        log::debug!("embedding model {model_name} ready ({dimensions} dimensions)");

        Ok(Self {
            model: Mutex::new(model),
            model_name: model_name.to_string(),
            dimensions,
        })
    }

    pub fn name(&self) -> &str {
        &self.model_name
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed one text.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::EmbeddingFailed("model returned nothing".to_string()))
    }

    /// Embed a batch of texts in one model call.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut model = self
            .model
            .lock()
            .map_err(|_| EmbeddingError::EmbeddingFailed("model lock poisoned".to_string()))?;

        model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::EmbeddingFailed(e.to_string()))
    }
}

/// Case-insensitive lookup in the supported-model table.
fn lookup_model(name: &str) -> Result<fastembed::EmbeddingModel, EmbeddingError> {
    let normalized = name.trim().to_lowercase();
    SUPPORTED_MODELS
        .iter()
        .find(|(known, _)| *known == normalized)
        .map(|(_, kind)| kind.clone())
        .ok_or_else(|| EmbeddingError::InvalidModel(name.to_string()))
}

/// Embed a throwaway string to learn the vector width. The width feeds
/// the catalog dimension checks, so a model that reports nothing here is
/// unusable.
fn probe_dimensions(model: &mut TextEmbedding) -> Result<usize, EmbeddingError> {
    let probe = model
        .embed(vec!["dimension probe"], None)
        .map_err(|e| EmbeddingError::InitFailed(format!("dimension probe failed: {e}")))?;

    match probe.first() {
        Some(vector) if !vector.is_empty() => Ok(vector.len()),
        _ => Err(EmbeddingError::InitFailed(
            "dimension probe returned no vector".to_string(),
        )),
    }
}

/// Run `task` on its own thread, waiting at most `deadline` for the
/// result. On timeout the thread is abandoned; whatever it eventually
/// produces is dropped with the channel.
fn run_with_deadline<T, F>(task: F, deadline: Duration) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(task());
    });
    rx.recv_timeout(deadline).ok()
}
