//! High-level ranking interface
//!
//! Ties normalization, scoring and fusion into the three operations a
//! caller needs: clean a dataset, rank it against a query, and drop records.
//!
//! # Usage
//!
//! ```ignore
//! use talentrank_lib::pipeline::RankingPipeline;
//! use talentrank_lib::score::Strategy;
//!
//! // Local word2vec only
//! let mut pipeline = RankingPipeline::new(&config)?;
//! let cleaned = pipeline.preprocess(&dataset)?;
//! let ranked = pipeline.rank(&cleaned, "software developer", Strategy::Local)?;
//!
//! // With a pretrained sentence model
//! let embedder = ParaphraseEmbedder::new(&config.pretrained)?;
//! let mut pipeline = RankingPipeline::with_pretrained(&config, embedder)?;
//! let ranked = pipeline.rank(&cleaned, "software developer", Strategy::Pretrained)?;
//! ```
//!
//! Datasets are values: `preprocess` and `delete` return new snapshots and
//! never touch their input, so resetting is just ranking the original again.

use std::collections::HashSet;

use tracing::debug;

use crate::config::RankingConfig;
use crate::dataset::{Dataset, Record};
use crate::embed::{Embedder, NoEmbedder};
use crate::fusion::{connection_counts, RankedRecord, ScoreFusion};
use crate::normalize::TextNormalizer;
use crate::score::{LocalScorer, PretrainedScorer, SimilarityScorer, Strategy};
use crate::{Error, Result};

/// Ranking pipeline with a local scorer and an optional pretrained one.
pub struct RankingPipeline<E: Embedder = NoEmbedder> {
    normalizer: TextNormalizer,
    local: LocalScorer,
    pretrained: Option<PretrainedScorer<E>>,
    fusion: ScoreFusion,
}

// Constructor for pipelines without a pretrained model
impl RankingPipeline<NoEmbedder> {
    /// Create a pipeline that only supports [`Strategy::Local`].
    pub fn new(config: &RankingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: TextNormalizer::new(),
            local: LocalScorer::new(config.word2vec.clone()),
            pretrained: None,
            fusion: ScoreFusion::new(&config.fusion),
        })
    }
}

impl<E: Embedder> RankingPipeline<E> {
    /// Create a pipeline that supports both strategies.
    ///
    /// The embedder is loaded by the caller and reused for every ranking pass.
    pub fn with_pretrained(config: &RankingConfig, embedder: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: TextNormalizer::new(),
            local: LocalScorer::new(config.word2vec.clone()),
            pretrained: Some(PretrainedScorer::new(embedder)),
            fusion: ScoreFusion::new(&config.fusion),
        })
    }

    /// Normalize every title and drop duplicate `(title, connections)` rows.
    ///
    /// Fails with [`Error::InvalidInput`] if any connection count cannot be
    /// coerced.
    pub fn preprocess(&self, dataset: &Dataset) -> Result<Dataset> {
        let normalized: Dataset = dataset
            .iter()
            .map(|r| Record {
                title: self.normalizer.normalize(&r.title),
                ..r.clone()
            })
            .collect();
        normalized.dedup()
    }

    /// Score every record against `query` and return them best first.
    ///
    /// Titles are expected to be preprocessed already; the query is
    /// normalized here. Nothing is returned unless every step succeeds.
    pub fn rank(
        &mut self,
        dataset: &Dataset,
        query: &str,
        strategy: Strategy,
    ) -> Result<Vec<RankedRecord>> {
        if dataset.is_empty() {
            return Err(Error::InvalidInput("cannot rank an empty dataset".to_string()));
        }
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("query is empty".to_string()));
        }
        // fail on bad counts before paying for training or encoding
        connection_counts(dataset)?;

        let query = self.normalizer.normalize(query);
        if query.is_empty() {
            return Err(Error::InvalidInput(
                "query has no content words after normalization".to_string(),
            ));
        }

        let scorer: &mut dyn SimilarityScorer = match strategy {
            Strategy::Local => &mut self.local,
            Strategy::Pretrained => match self.pretrained.as_mut() {
                Some(scorer) => scorer,
                None => {
                    return Err(Error::ModelUnavailable(
                        "pretrained strategy selected but no model was loaded".to_string(),
                    ))
                }
            },
        };

        debug!(
            scorer = scorer.name(),
            records = dataset.len(),
            query = %query,
            "ranking"
        );
        let scores = scorer.score_all(dataset, &query)?;
        self.fusion.fuse(dataset, &scores)
    }

    /// Return a new dataset without the records whose id is in `ids`.
    #[must_use]
    pub fn delete(&self, dataset: &Dataset, ids: &HashSet<String>) -> Dataset {
        dataset.delete(ids)
    }

    /// Returns `true` if [`Strategy::Pretrained`] can be used.
    #[must_use]
    pub fn has_pretrained(&self) -> bool {
        self.pretrained.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Connections;
    use crate::score::testing::LetterEmbedder;

    fn record(id: &str, title: &str, conn: &str) -> Record {
        Record::new(id, title, Connections::from(conn))
    }

    fn scenario() -> Dataset {
        Dataset::new(vec![
            record("1", "Software Engineer", "500+"),
            record("2", "Baker", "10"),
        ])
    }

    fn ids(ranked: &[RankedRecord]) -> Vec<&str> {
        ranked.iter().map(|r| r.record.id.as_str()).collect()
    }

    fn letters_pipeline() -> RankingPipeline<LetterEmbedder> {
        RankingPipeline::with_pretrained(&RankingConfig::default(), LetterEmbedder::default()).unwrap()
    }

    #[test]
    fn test_pretrained_scenario_ranks_engineer_first() {
        let mut pipeline = letters_pipeline();
        let data = pipeline.preprocess(&scenario()).unwrap();
        let ranked = pipeline.rank(&data, "Software Developer", Strategy::Pretrained).unwrap();

        assert_eq!(ids(&ranked), vec!["1", "2"]);
        assert_eq!(ranked[0].ranking, 1.0);
        assert_eq!(ranked[1].ranking, 0.0);
        assert_eq!(ranked[0].record.title, "software engineer");
    }

    #[test]
    fn test_local_scenario_ranks_engineer_first() {
        let mut pipeline = RankingPipeline::new(&RankingConfig::default()).unwrap();
        let data = pipeline.preprocess(&scenario()).unwrap();
        let ranked = pipeline.rank(&data, "Software Developer", Strategy::Local).unwrap();
        assert_eq!(ids(&ranked), vec!["1", "2"]);
    }

    #[test]
    fn test_empty_dataset_is_invalid_input() {
        let mut pipeline = letters_pipeline();
        let err = pipeline
            .rank(&Dataset::default(), "engineer", Strategy::Local)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_blank_query_is_invalid_input() {
        let mut pipeline = letters_pipeline();
        let err = pipeline.rank(&scenario(), "   ", Strategy::Pretrained).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        // rejected before the model was touched
        assert_eq!(pipeline.pretrained.as_ref().unwrap().embedder().calls, 0);
    }

    #[test]
    fn test_stopword_only_query_is_invalid_input() {
        let mut pipeline = letters_pipeline();
        for strategy in [Strategy::Pretrained, Strategy::Local] {
            let err = pipeline.rank(&scenario(), "the of and", strategy).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "got {err:?}");
        }
        assert_eq!(pipeline.pretrained.as_ref().unwrap().embedder().calls, 0);
    }

    #[test]
    fn test_bad_connections_is_invalid_input() {
        let mut pipeline = letters_pipeline();
        let data = Dataset::new(vec![record("1", "chef", "abc")]);

        let err = pipeline.rank(&data, "chef", Strategy::Pretrained).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(pipeline.pretrained.as_ref().unwrap().embedder().calls, 0);

        assert!(matches!(pipeline.preprocess(&data), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_pretrained_missing_is_unavailable_local_still_works() {
        let mut pipeline = RankingPipeline::new(&RankingConfig::default()).unwrap();
        assert!(!pipeline.has_pretrained());

        let err = pipeline.rank(&scenario(), "baker", Strategy::Pretrained).unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable(_)));

        let ranked = pipeline.rank(&scenario(), "baker", Strategy::Local).unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_preprocess_removes_duplicates() {
        let pipeline = RankingPipeline::new(&RankingConfig::default()).unwrap();
        let data = Dataset::new(vec![
            record("1", "Software Engineers", "500+"),
            record("2", "software engineer", "500+ "),
            record("3", "software engineer", "20"),
            record("4", "The Baker", "10"),
        ]);

        let cleaned = pipeline.preprocess(&data).unwrap();
        let kept: Vec<(&str, &str)> = cleaned
            .iter()
            .map(|r| (r.id.as_str(), r.title.as_str()))
            .collect();
        assert_eq!(
            kept,
            vec![
                ("1", "software engineer"),
                ("3", "software engineer"),
                ("4", "baker"),
            ]
        );
        // input untouched
        assert_eq!(data.len(), 4);
        assert_eq!(data.records()[0].title, "Software Engineers");
    }

    #[test]
    fn test_deleted_ids_never_resurface() {
        let mut pipeline = letters_pipeline();
        let data = Dataset::new(vec![
            record("1", "software engineer", "500+"),
            record("2", "baker", "10"),
            record("3", "pastry chef", "42"),
        ]);

        let first = pipeline.rank(&data, "software developer", Strategy::Pretrained).unwrap();
        assert_eq!(first[0].record.id, "1");

        let removed: HashSet<String> = HashSet::from([first[0].record.id.clone()]);
        let remaining = pipeline.delete(&data, &removed);
        assert_eq!(remaining.len(), 2);

        for strategy in [Strategy::Pretrained, Strategy::Local] {
            let ranked = pipeline.rank(&remaining, "software developer", strategy).unwrap();
            assert!(ranked.iter().all(|r| !removed.contains(&r.record.id)));
        }
        // original snapshot is the reset point
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RankingConfig::default();
        config.fusion.similarity_weight = -1.0;
        assert!(matches!(RankingPipeline::new(&config), Err(Error::Config(_))));
    }
}
