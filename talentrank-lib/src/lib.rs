//! TalentRank - candidate ranking library
//!
//! # Architecture
//!
//! ```text
//! Dataset -> TextNormalizer -> dedup -> Dataset (preprocessed)
//!                                          |
//! Query -> TextNormalizer -> Scorer <------+
//!                              |   (local word2vec | pretrained paraphrase model)
//!                           ScoreFusion <- connection counts
//!                              |
//!                        ranked records
//! ```
//!
//! # Example
//!
//! ```ignore
//! use talentrank_lib::{config::RankingConfig, dataset::Dataset, pipeline::RankingPipeline};
//! use talentrank_lib::score::Strategy;
//!
//! let config = RankingConfig::default();
//! let mut pipeline = RankingPipeline::new(&config)?;
//!
//! let dataset = Dataset::load("candidates.json")?;
//! let cleaned = pipeline.preprocess(&dataset)?;
//! let ranked = pipeline.rank(&cleaned, "aspiring human resources", Strategy::Local)?;
//! ```

pub mod config;
pub mod dataset;
pub mod embed;
pub mod error;
pub mod fusion;
pub mod normalize;
pub mod pipeline;
pub mod score;

pub use error::{Error, Result};
