//! Pipeline configuration
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! stock behaviour. Example `talentrank.toml`:
//!
//! ```toml
//! [fusion]
//! similarity_weight = 0.9
//! connections_weight = 0.1
//!
//! [word2vec]
//! vector_size = 100
//! epochs = 10
//!
//! [pretrained]
//! model = "paraphrase-multilingual-mpnet-base-v2"
//! cache_dir = "/var/cache/talentrank"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    pub fusion: FusionConfig,
    pub word2vec: Word2VecConfig,
    pub pretrained: PretrainedConfig,
}

impl RankingConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.word2vec.validate()?;
        Ok(())
    }
}

/// Weights of the two signals in the fused ranking score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FusionConfig {
    pub similarity_weight: f64,
    pub connections_weight: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.9,
            connections_weight: 0.1,
        }
    }
}

impl FusionConfig {
    fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("fusion.similarity_weight", self.similarity_weight),
            ("fusion.connections_weight", self.connections_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::Config(format!("{name} must be a non-negative number, got {w}")));
            }
        }
        if self.similarity_weight + self.connections_weight == 0.0 {
            return Err(Error::Config("fusion weights cannot both be zero".to_string()));
        }
        Ok(())
    }
}

/// Hyper-parameters of the locally trained CBOW model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Word2VecConfig {
    /// Dimensionality of the word vectors
    pub vector_size: usize,
    /// Max distance between the current and a context word
    pub window: usize,
    /// Noise words drawn per positive example
    pub negative: usize,
    /// Passes over the corpus
    pub epochs: usize,
    /// Words seen fewer times are left out of the vocabulary
    pub min_count: usize,
    /// Initial learning rate
    pub alpha: f32,
    /// Learning rate reached at the end of training
    pub min_alpha: f32,
    pub seed: u64,
}

impl Default for Word2VecConfig {
    fn default() -> Self {
        Self {
            vector_size: 300,
            window: 5,
            negative: 5,
            epochs: 5,
            min_count: 1,
            alpha: 0.025,
            min_alpha: 0.0001,
            seed: 1,
        }
    }
}

impl Word2VecConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.vector_size == 0 {
            return Err(Error::Config("word2vec.vector_size must be at least 1".to_string()));
        }
        if self.window == 0 {
            return Err(Error::Config("word2vec.window must be at least 1".to_string()));
        }
        if self.min_count == 0 {
            return Err(Error::Config("word2vec.min_count must be at least 1".to_string()));
        }
        if !(self.alpha > 0.0 && self.min_alpha >= 0.0 && self.min_alpha <= self.alpha) {
            return Err(Error::Config(format!(
                "word2vec learning rate must satisfy 0 <= min_alpha <= alpha, 0 < alpha (got {} -> {})",
                self.alpha, self.min_alpha
            )));
        }
        Ok(())
    }
}

/// Which pretrained sentence model to load, and from where
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PretrainedConfig {
    pub model: PretrainedModel,
    /// Directory for downloaded model files; fastembed's default when unset
    pub cache_dir: Option<PathBuf>,
    pub show_download_progress: bool,
}

impl Default for PretrainedConfig {
    fn default() -> Self {
        Self {
            model: PretrainedModel::default(),
            cache_dir: None,
            show_download_progress: true,
        }
    }
}

/// Paraphrase-tuned sentence-transformer models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PretrainedModel {
    /// sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2 (384 dims)
    #[default]
    ParaphraseMultilingualMinilmL12V2,
    /// sentence-transformers/paraphrase-multilingual-mpnet-base-v2 (768 dims)
    ParaphraseMultilingualMpnetBaseV2,
}
