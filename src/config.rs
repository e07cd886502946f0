use crate::embedding::DEFAULT_MODEL;
use crate::ranker::{ScoringWeights, DEFAULT_COMPANIES_WEIGHT, DEFAULT_EXPERIENCE_WEIGHT};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_INVESTORS_PATH: &str = "investors_data.csv";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
/// Default model download timeout in seconds
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 300;

const CONFIG_FILE: &str = "config.yaml";

/// Configuration for the embedding backend
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2")
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Directory to cache downloaded models
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Timeout for model download in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            cache_dir: ".".to_string(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

fn default_embedding_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_cache_dir() -> String {
    ".".to_string()
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

/// Configuration for investor scoring
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of experience years in the raw score
    #[serde(default = "default_experience_weight")]
    pub experience_weight: f64,

    /// Weight of companies invested in the raw score
    #[serde(default = "default_companies_weight")]
    pub companies_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            experience_weight: DEFAULT_EXPERIENCE_WEIGHT,
            companies_weight: DEFAULT_COMPANIES_WEIGHT,
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            experience: self.experience_weight,
            companies: self.companies_weight,
        }
    }
}

fn default_experience_weight() -> f64 {
    DEFAULT_EXPERIENCE_WEIGHT
}

fn default_companies_weight() -> f64 {
    DEFAULT_COMPANIES_WEIGHT
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Path to the investor data CSV asset
    #[serde(default = "default_investors_path")]
    pub investors_path: String,

    /// Address the daemon listens on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            investors_path: DEFAULT_INVESTORS_PATH.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            embedding: EmbeddingConfig::default(),
            scoring: ScoringConfig::default(),
            base_path: String::new(),
        }
    }
}

fn default_investors_path() -> String {
    DEFAULT_INVESTORS_PATH.to_string()
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

impl Config {
    fn validate(&self) {
        let scoring = &self.scoring;
        for (name, weight) in [
            ("scoring.experience_weight", scoring.experience_weight),
            ("scoring.companies_weight", scoring.companies_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                panic!("{name} must be between 0.0 and 1.0, got {weight}");
            }
        }
        if (scoring.experience_weight + scoring.companies_weight - 1.0).abs() > 1e-9 {
            panic!(
                "scoring weights must sum to 1.0, got {} + {}",
                scoring.experience_weight, scoring.companies_weight
            );
        }

        if self.embedding.download_timeout_secs == 0 {
            panic!("embedding.download_timeout_secs must be greater than 0");
        }

        if self.listen_addr.trim().is_empty() {
            panic!("listen_addr must not be empty");
        }
    }

    pub fn load_with(base_path: &str) -> Self {
        std::fs::create_dir_all(base_path).expect("failed to create config directory");
        let config_path = Path::new(base_path).join(CONFIG_FILE);

        // create new if does not exist
        if !config_path.exists() {
            std::fs::write(
                &config_path,
                serde_yml::to_string(&Self::default()).unwrap().as_bytes(),
            )
            .expect("failed to write default config");
        }

        let config_str =
            std::fs::read_to_string(&config_path).expect("config file is not readable");
        let mut config: Self = serde_yml::from_str(&config_str).expect("config is malformed");

        config.base_path = base_path.to_string();

        config.validate();

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config).unwrap() {
            config.save();
        }

        config
    }

    pub fn save(&self) {
        let config_path = Path::new(&self.base_path).join(CONFIG_FILE);
        let config_str = serde_yml::to_string(&self).unwrap();
        std::fs::write(config_path, config_str.as_bytes()).expect("failed to save config");
    }
}
