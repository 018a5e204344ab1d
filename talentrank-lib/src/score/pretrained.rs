use tracing::debug;

use crate::dataset::Dataset;
use crate::embed::{cosine_similarity, Embedder};
use crate::score::SimilarityScorer;
use crate::{Error, Result};

/// Scores titles by cosine similarity of pretrained sentence embeddings.
///
/// Owns the embedder handle, so the model is loaded once by the caller and
/// reused across ranking passes.
pub struct PretrainedScorer<E: Embedder> {
    embedder: E,
}

impl<E: Embedder> PretrainedScorer<E> {
    #[must_use]
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}

impl<E: Embedder> SimilarityScorer for PretrainedScorer<E> {
    fn name(&self) -> &str {
        "pretrained"
    }

    fn score_all(&mut self, dataset: &Dataset, query: &str) -> Result<Vec<f32>> {
        let target = self.embedder.embed_query(query)?;
        let titles = dataset.titles();
        let embeddings = self.embedder.embed_documents(&titles)?;

        if embeddings.len() != titles.len() {
            return Err(Error::Embedding(format!(
                "model returned {} embeddings for {} titles",
                embeddings.len(),
                titles.len()
            )));
        }
        debug!(
            model = self.embedder.model_name(),
            titles = titles.len(),
            "encoded titles"
        );

        embeddings
            .iter()
            .map(|e| {
                if e.len() != target.len() {
                    return Err(Error::Embedding(format!(
                        "embedding dimension mismatch: {} vs {}",
                        e.len(),
                        target.len()
                    )));
                }
                Ok(cosine_similarity(&target, e))
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::embed::{Embedder, Embedding};
    use crate::Result;

    /// Deterministic bag-of-letters embedder for tests.
    ///
    /// Each text maps to a 26-dim vector of letter counts, so texts that
    /// share letters point in similar directions.
    #[derive(Debug, Default)]
    pub struct LetterEmbedder {
        pub calls: usize,
    }

    pub fn letters(text: &str) -> Embedding {
        let mut v = vec![0.0; 26];
        for b in text.bytes().filter(u8::is_ascii_lowercase) {
            v[(b - b'a') as usize] += 1.0;
        }
        v
    }

    impl Embedder for LetterEmbedder {
        fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
            self.calls += 1;
            Ok(texts.iter().map(|t| letters(t)).collect())
        }

        fn embed_query(&mut self, text: &str) -> Result<Embedding> {
            self.calls += 1;
            Ok(letters(text))
        }

        fn dimension(&self) -> usize {
            26
        }

        fn model_name(&self) -> &str {
            "letters"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::LetterEmbedder;
    use super::*;
    use crate::dataset::{Connections, Record};
    use crate::embed::NoEmbedder;

    fn dataset(titles: &[&str]) -> Dataset {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| Record::new(i.to_string(), *t, Connections::from(1)))
            .collect()
    }

    #[test]
    fn test_scores_follow_embedding_similarity() {
        let mut scorer = PretrainedScorer::new(LetterEmbedder::default());
        let data = dataset(&["abc", "xyz", "abd"]);
        let scores = scorer.score_all(&data, "abc").unwrap();

        assert_eq!(scores.len(), 3);
        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert_eq!(scores[1], 0.0);
        assert!(scores[2] > 0.0 && scores[2] < 1.0);
    }

    #[test]
    fn test_query_and_titles_encoded_once_each() {
        let mut scorer = PretrainedScorer::new(LetterEmbedder::default());
        scorer.score_all(&dataset(&["a", "b", "c"]), "a").unwrap();
        assert_eq!(scorer.embedder().calls, 2);
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let mut scorer = PretrainedScorer::new(NoEmbedder);
        let err = scorer.score_all(&dataset(&["a"]), "a").unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));
    }

    struct ShortEmbedder;

    impl Embedder for ShortEmbedder {
        fn embed_documents(&mut self, _texts: &[&str]) -> Result<Vec<crate::embed::Embedding>> {
            Ok(vec![vec![1.0]])
        }

        fn embed_query(&mut self, _text: &str) -> Result<crate::embed::Embedding> {
            Ok(vec![1.0])
        }

        fn dimension(&self) -> usize {
            1
        }

        fn model_name(&self) -> &str {
            "short"
        }
    }

    #[test]
    fn test_embedding_count_mismatch_is_error() {
        let mut scorer = PretrainedScorer::new(ShortEmbedder);
        let err = scorer.score_all(&dataset(&["a", "b"]), "a").unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    #[ignore] // Requires model download, run with: cargo test -- --ignored
    fn test_paraphrase_model_prefers_related_title() {
        use crate::config::PretrainedConfig;
        use crate::embed::ParaphraseEmbedder;

        let embedder = ParaphraseEmbedder::new(&PretrainedConfig::default()).unwrap();
        let mut scorer = PretrainedScorer::new(embedder);
        let scores = scorer
            .score_all(&dataset(&["software engineer", "baker"]), "software developer")
            .unwrap();
        assert!(scores[0] > scores[1], "{scores:?}");
    }
}
