//! Domain embedding space.
//!
//! A fixed catalog of startup domains, each positioned by embedding a seed
//! keyword description at startup. The catalog is immutable afterwards;
//! its insertion order doubles as the stable tie-break key during
//! classification.

use crate::embedding::{Embedder, EmbeddingError};

/// Seed table: (label, keyword description). The descriptions only exist
/// to position each domain in the embedding space; they are never shown
/// to users.
pub const DOMAIN_SEEDS: &[(&str, &str)] = &[
    ("FinTech", "banking finance investment fraud detection trading cryptocurrency payments stock exchange digital banking financial security fintech loans credit"),
    ("EdTech", "learning education e-learning students courses AI tutors online classes skill development virtual learning academic platforms EdTech schools universities"),
    ("Web3 & Crypto", "blockchain decentralization smart contracts NFTs DeFi cryptocurrencies DAO consensus Ethereum tokenization crypto DeFi"),
    ("Healthcare", "medicine health diagnostics AI doctors hospitals treatment disease patient monitoring clinical trials medical AI pharma biotech"),
    ("AgriTech", "agriculture crops farming irrigation soil monitoring yield prediction fertilizers precision agriculture AgriTech food production supply chain"),
    ("Cybersecurity", "security encryption hacking firewalls malware phishing authentication cyber threats risk assessment digital forensics cyber attacks network security"),
    ("IoT", "internet of things connected devices automation sensors cloud computing smart homes industry 4.0 IoT wearables edge computing smart cities"),
    ("AI & ML", "machine learning artificial intelligence deep learning neural networks predictive modeling data science AI ML neural networks reinforcement learning"),
    ("Robotics", "robots automation sensors industrial robots robotic arms AI-powered robots autonomous systems humanoid robots drone technology"),
    ("AR/VR", "augmented reality virtual reality 3D immersive experiences gaming headsets mixed reality digital twins metaverse"),
    ("EnergyTech", "renewable energy solar wind sustainability energy efficiency smart grids carbon footprint electric vehicles green tech carbon capture"),
    ("LegalTech", "law compliance regulations AI-powered legal services contract analysis legal documents automation risk management"),
    ("GovTech", "government digital transformation public services AI-powered governance smart cities citizen engagement e-governance digital policies"),
    ("Supply Chain", "logistics warehousing inventory management supply chain AI demand forecasting transportation optimization blockchain logistics"),
    ("EntertainmentTech", "streaming platforms AI-driven content recommendation gaming industry interactive media content production"),
    ("MarTech", "marketing automation CRM AI-powered advertising personalization digital marketing analytics customer segmentation"),
    ("FoodTech", "food delivery nutrition AI-powered recipes personalized diets meal planning restaurant automation smart kitchen plant-based food technology"),
    ("Ecommerce", "online shopping digital storefronts AI-driven product recommendations ecommerce platforms dropshipping order fulfillment payment gateways"),
    ("Fashion", "clothing design AI-powered fashion trends retail innovation textile technology sustainable fashion wearable technology"),
    ("Prop-Tech", "real estate AI-driven property valuation smart homes proptech property management real estate marketplaces digital land registries"),
    ("Automobile", "automotive electric vehicles self-driving AI-powered vehicle systems connected cars car rental ride-sharing mobility solutions"),
    ("Bio-Tech", "biotechnology genetic engineering bioinformatics medical research pharmaceuticals biomanufacturing precision medicine gene therapy CRISPR technology"),
    ("TravelTech", "travel booking AI-powered itineraries hotel tech smart tourism virtual tourism travel safety location intelligence travel apps"),
    ("Security", "surveillance AI-powered threat detection access control biometrics smart security cybersecurity digital identity protection"),
    ("EventTech", "event management virtual events AI-powered ticketing audience engagement hybrid events digital event analytics immersive event technology"),
    ("Metaverse", "virtual worlds blockchain-powered assets VR experiences decentralized social networks digital avatars digital economy virtual property"),
];

/// One domain with its reference vector.
#[derive(Debug, Clone)]
pub struct DomainEntry {
    pub label: String,
    pub vector: Vec<f32>,
}

/// Ordered, immutable catalog of domain reference vectors.
pub struct DomainCatalog {
    entries: Vec<DomainEntry>,
    dimensions: usize,
}

/// Errors raised while constructing the catalog. All of these are fatal
/// configuration problems at startup, never per-request conditions.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("domain catalog cannot be empty")]
    Empty,

    #[error("dimension mismatch in catalog: expected {expected}, got {got} for \"{label}\"")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        label: String,
    },

    #[error("failed to embed domain seeds: {0}")]
    Embedding(#[from] EmbeddingError),
}

impl DomainCatalog {
    /// Build the catalog by embedding the seed table.
    pub fn build(embedder: &dyn Embedder) -> Result<Self, CatalogError> {
        let seed_texts: Vec<String> = DOMAIN_SEEDS
            .iter()
            .map(|(_, seed)| seed.to_string())
            .collect();

        let vectors = embedder.embed_batch(&seed_texts)?;

        let entries = DOMAIN_SEEDS
            .iter()
            .zip(vectors)
            .map(|((label, _), vector)| DomainEntry {
                label: label.to_string(),
                vector,
            })
            .collect();

        let catalog = Self::from_entries(entries)?;
        log::info!(
            "domain catalog ready: {} domains, {} dimensions",
            catalog.len(),
            catalog.dimensions()
        );
        Ok(catalog)
    }

    /// Build a catalog from precomputed entries.
    /// Validates non-emptiness and uniform dimensionality.
    pub fn from_entries(entries: Vec<DomainEntry>) -> Result<Self, CatalogError> {
        let dimensions = entries.first().map(|e| e.vector.len()).ok_or(CatalogError::Empty)?;

        for entry in &entries {
            if entry.vector.len() != dimensions {
                return Err(CatalogError::DimensionMismatch {
                    expected: dimensions,
                    got: entry.vector.len(),
                    label: entry.label.clone(),
                });
            }
        }

        Ok(Self {
            entries,
            dimensions,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.iter()
    }

    /// Catalog labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }
}
