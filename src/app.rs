//! Application facade: wires the catalogs, classifier, ranker, and thread
//! store together and exposes the four core operations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::chat::{ChatError, Message, ThreadStore};
use crate::classifier::{ClassifyError, DomainClassifier, DomainPrediction};
use crate::config::Config;
use crate::domains::DomainCatalog;
use crate::embedding::{EmbeddingError, EmbeddingModel, SimilarityKeyphraseExtractor};
use crate::investors::InvestorCatalog;
use crate::ranker::{self, RankError, RankOutcome, ScoringWeights};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("project description cannot be empty")]
    EmptyDescription,

    #[error("selected domain cannot be empty")]
    EmptyDomain,

    #[error("sender, receiver, and message cannot be empty")]
    EmptyMessageField,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("embedding backend error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("unexpected error: {0:?}")]
    Other(#[from] anyhow::Error),
}

impl From<ClassifyError> for AppError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::EmptyDescription => AppError::EmptyDescription,
            // Dimensional mismatch means the embedder and catalog were
            // wired inconsistently, not that the request was bad.
            ClassifyError::DimensionMismatch { .. } => AppError::Configuration(err.to_string()),
            ClassifyError::Embedding(e) => AppError::Embedding(e),
        }
    }
}

impl From<RankError> for AppError {
    fn from(err: RankError) -> Self {
        match err {
            RankError::EmptyDomain => AppError::EmptyDomain,
        }
    }
}

impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyField => AppError::EmptyMessageField,
        }
    }
}

pub struct App {
    classifier: DomainClassifier,
    investors: InvestorCatalog,
    threads: ThreadStore,
    weights: ScoringWeights,
}

impl App {
    /// Build the full application from config. Loads the embedding model,
    /// positions the domain catalog, and ingests the investor asset. Any
    /// failure here is fatal; nothing is retried at request time.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let model = EmbeddingModel::new(
            &config.embedding.model,
            config.embedding.cache_dir.clone().into(),
            Some(Duration::from_secs(config.embedding.download_timeout_secs)),
        )
        .context("failed to initialize embedding model")?;
        let model = Arc::new(model);

        let catalog = DomainCatalog::build(model.as_ref())
            .context("failed to build domain catalog")?;

        let extractor = SimilarityKeyphraseExtractor::new(model.clone());
        let classifier = DomainClassifier::new(catalog, model, Box::new(extractor));

        let investors = InvestorCatalog::load(&config.investors_path)?;

        Ok(Self {
            classifier,
            investors,
            threads: ThreadStore::new(),
            weights: config.scoring.weights(),
        })
    }

    /// Assemble an app from prebuilt parts (tests).
    pub fn with_parts(
        classifier: DomainClassifier,
        investors: InvestorCatalog,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            classifier,
            investors,
            threads: ThreadStore::new(),
            weights,
        }
    }

    /// Predict the top domains for a project description.
    pub fn predict_domain(&self, description: &str) -> Result<Vec<DomainPrediction>, AppError> {
        Ok(self.classifier.classify(description)?)
    }

    /// Rank investors for a selected domain.
    pub fn find_investors(
        &self,
        domain: &str,
        investor_type: Option<&str>,
    ) -> Result<RankOutcome, AppError> {
        Ok(ranker::rank(
            &self.investors,
            domain,
            investor_type,
            self.weights,
        )?)
    }

    /// Append a chat message, returning the updated thread.
    pub fn send_message(
        &self,
        sender: &str,
        receiver: &str,
        text: &str,
    ) -> Result<Vec<Message>, AppError> {
        Ok(self.threads.append(sender, receiver, text)?)
    }

    /// Snapshot of the chat thread between two users.
    pub fn get_messages(&self, user_a: &str, user_b: &str) -> Vec<Message> {
        self.threads.get(user_a, user_b)
    }
}
