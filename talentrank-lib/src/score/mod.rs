//! Query-to-title similarity scoring
//!
//! A [`SimilarityScorer`] turns a dataset and a query into one raw score
//! per record, in dataset order. Scores are in [-1, 1]; fusion rescales
//! them afterwards.
//!
//! | Strategy | Scorer | Model |
//! |----------|--------|-------|
//! | [`Strategy::Local`] | [`LocalScorer`] | word2vec trained on the dataset's own titles |
//! | [`Strategy::Pretrained`] | [`PretrainedScorer`] | paraphrase sentence-transformer |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::{Error, Result};

pub trait SimilarityScorer {
    /// Score every record's title against `query`.
    ///
    /// Returns exactly one score per record, in the same order.
    fn score_all(&mut self, dataset: &Dataset, query: &str) -> Result<Vec<f32>>;

    /// Returns the name of this scoring strategy
    fn name(&self) -> &str;
}

/// Which scorer a ranking pass uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Local,
    Pretrained,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Pretrained => "pretrained",
        })
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "word2vec" => Ok(Self::Local),
            "pretrained" | "sbert" => Ok(Self::Pretrained),
            other => Err(Error::InvalidInput(format!(
                "unknown strategy {other:?} (expected \"local\" or \"pretrained\")"
            ))),
        }
    }
}

mod local;
mod pretrained;

pub use local::*;
pub use pretrained::*;

#[cfg(test)]
pub(crate) use pretrained::testing;
