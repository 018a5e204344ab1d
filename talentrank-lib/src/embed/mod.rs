//! Text embedding models
//!
//! Two kinds of model live here:
//!
//! - [`ParaphraseEmbedder`]: a pretrained sentence-transformer run locally
//!   through the fastembed crate (ONNX runtime). Loading it is expensive, so
//!   callers build it once and hand it to the pipeline.
//! - [`Word2Vec`]: a small CBOW word-embedding model trained on the fly from
//!   the titles of the dataset being ranked.
//!
//! # Usage
//!
//! ```ignore
//! use talentrank_lib::embed::{Embedder, ParaphraseEmbedder};
//!
//! let mut embedder = ParaphraseEmbedder::new(&config.pretrained)?;
//! let titles = embedder.embed_documents(&["software engineer", "baker"])?;
//! let query = embedder.embed_query("software developer")?;
//! ```

use crate::{Error, Result};

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for sentence embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents, one vector per input in the same order
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

/// Placeholder for pipelines built without a pretrained model.
///
/// Every call fails with [`Error::ModelUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEmbedder;

impl Embedder for NoEmbedder {
    fn embed_documents(&mut self, _texts: &[&str]) -> Result<Vec<Embedding>> {
        Err(Error::ModelUnavailable("no pretrained model configured".to_string()))
    }

    fn embed_query(&mut self, _text: &str) -> Result<Embedding> {
        Err(Error::ModelUnavailable("no pretrained model configured".to_string()))
    }

    fn dimension(&self) -> usize {
        0
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction, and 0.0
/// when either vector has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

mod paraphrase;
mod word2vec;

pub use paraphrase::*;
pub use word2vec::*;
