use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::config::{PretrainedConfig, PretrainedModel};
use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

impl PretrainedModel {
    fn fastembed_model(self) -> EmbeddingModel {
        match self {
            Self::ParaphraseMultilingualMinilmL12V2 => EmbeddingModel::ParaphraseMLMiniLML12V2,
            Self::ParaphraseMultilingualMpnetBaseV2 => EmbeddingModel::ParaphraseMLMpnetBaseV2,
        }
    }

    /// Hugging Face identifier of the model
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ParaphraseMultilingualMinilmL12V2 => {
                "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2"
            }
            Self::ParaphraseMultilingualMpnetBaseV2 => {
                "sentence-transformers/paraphrase-multilingual-mpnet-base-v2"
            }
        }
    }

    #[must_use]
    pub fn dimension(self) -> usize {
        match self {
            Self::ParaphraseMultilingualMinilmL12V2 => 384,
            Self::ParaphraseMultilingualMpnetBaseV2 => 768,
        }
    }
}

/// Paraphrase sentence embedder.
///
/// Uses fastembed for ONNX-based inference. Queries and documents are
/// encoded the same way; paraphrase models take no query prompt.
pub struct ParaphraseEmbedder {
    model: TextEmbedding,
    kind: PretrainedModel,
}

impl ParaphraseEmbedder {
    /// Load the configured model.
    ///
    /// Downloads the model on first use. A failed download or load is
    /// reported as [`Error::ModelUnavailable`].
    pub fn new(config: &PretrainedConfig) -> Result<Self> {
        let kind = config.model;
        let mut opts = InitOptions::new(kind.fastembed_model())
            .with_show_download_progress(config.show_download_progress);
        if let Some(dir) = &config.cache_dir {
            opts = opts.with_cache_dir(dir.clone());
        }

        debug!(model = kind.name(), "loading pretrained sentence model");
        TextEmbedding::try_new(opts)
            .map(|model| Self { model, kind })
            .map_err(|e| Error::ModelUnavailable(format!("{}: {e}", kind.name())))
    }
}

impl Embedder for ParaphraseEmbedder {
    fn model_name(&self) -> &str {
        self.kind.name()
    }

    fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        self.model
            .embed(texts, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.model
            .embed(&[text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }
}
