use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::Word2VecConfig;
use crate::dataset::Dataset;
use crate::embed::Word2Vec;
use crate::normalize::tokenize;
use crate::score::SimilarityScorer;
use crate::Result;

/// Scores titles with a word2vec model trained on the dataset itself.
///
/// A fresh model is trained on every call, so scores always reflect the
/// current dataset. Query words that never occur in any title carry no
/// signal; a query made only of such words scores 0.0 everywhere.
#[derive(Debug, Clone, Default)]
pub struct LocalScorer {
    config: Word2VecConfig,
}

impl LocalScorer {
    #[must_use]
    pub fn new(config: Word2VecConfig) -> Self {
        Self { config }
    }
}

impl SimilarityScorer for LocalScorer {
    fn name(&self) -> &str {
        "local"
    }

    fn score_all(&mut self, dataset: &Dataset, query: &str) -> Result<Vec<f32>> {
        let sentences: Vec<Vec<&str>> = dataset.iter().map(|r| tokenize(&r.title).collect()).collect();

        if sentences.iter().all(Vec::is_empty) {
            warn!(records = dataset.len(), "no title has any token; every similarity is 0");
            return Ok(vec![0.0; dataset.len()]);
        }

        // training finishes before any scoring starts
        let model = Word2Vec::train(&sentences, &self.config)?;

        let query_tokens: Vec<&str> = tokenize(query).collect();
        let known = query_tokens.iter().filter(|t| model.contains(t)).count();
        debug!(
            query_tokens = query_tokens.len(),
            known,
            vocab = model.len(),
            "scoring with local word2vec"
        );

        Ok(sentences
            .par_iter()
            .map(|title| model.n_similarity(title, &query_tokens))
            .collect())
    }
}
