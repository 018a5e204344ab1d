//! Score fusion
//!
//! Combines raw similarity scores with the popularity signal into one
//! ranking score:
//!
//! 1. coerce connection counts (`"500+"` -> 500)
//! 2. min-max scale connections and similarity to [0, 1]
//! 3. `ranking = w_sim * similarity + w_conn * connections`
//! 4. min-max scale ranking to [0, 1]
//! 5. round all three to 2 decimals
//! 6. stable sort by ranking, highest first
//!
//! Scaling is relative to the dataset being ranked: the best record always
//! lands on 1.0 and the worst on 0.0. A column whose values are all equal
//! has no range and scales to 0.0 for every record.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::FusionConfig;
use crate::dataset::{Dataset, Record};
use crate::{Error, Result};

/// A record with its fused scores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub record: Record,
    /// Query similarity scaled to [0, 1]
    pub similarity: f64,
    /// Connection count scaled to [0, 1]
    pub connections_normalized: f64,
    /// Fused score in [0, 1]; the sort key
    pub ranking: f64,
}

/// Weighted-sum fusion of similarity and popularity
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreFusion {
    similarity_weight: f64,
    connections_weight: f64,
}

impl Default for ScoreFusion {
    fn default() -> Self {
        Self::new(&FusionConfig::default())
    }
}

impl ScoreFusion {
    #[must_use]
    pub fn new(config: &FusionConfig) -> Self {
        Self {
            similarity_weight: config.similarity_weight,
            connections_weight: config.connections_weight,
        }
    }

    /// Fuse per-record similarity scores with connection counts and sort.
    ///
    /// `similarity` must hold one finite score per record, in dataset order.
    pub fn fuse(&self, dataset: &Dataset, similarity: &[f32]) -> Result<Vec<RankedRecord>> {
        if similarity.len() != dataset.len() {
            return Err(Error::InvalidInput(format!(
                "{} similarity scores for {} records",
                similarity.len(),
                dataset.len()
            )));
        }
        if let Some(bad) = similarity.iter().find(|s| !s.is_finite()) {
            return Err(Error::InvalidInput(format!("similarity score {bad} is not finite")));
        }

        let connections: Vec<f64> = connection_counts(dataset)?
            .into_iter()
            .map(|c| c as f64)
            .collect();
        let connections = min_max_normalize(&connections, "connections");

        let raw: Vec<f64> = similarity.iter().map(|&s| f64::from(s)).collect();
        let similarity = min_max_normalize(&raw, "similarity");

        let combined: Vec<f64> = similarity
            .iter()
            .zip(&connections)
            .map(|(s, c)| self.similarity_weight * s + self.connections_weight * c)
            .collect();
        let ranking = min_max_normalize(&combined, "ranking");

        let mut ranked: Vec<RankedRecord> = dataset
            .iter()
            .enumerate()
            .map(|(i, record)| RankedRecord {
                record: record.clone(),
                similarity: round2(similarity[i]),
                connections_normalized: round2(connections[i]),
                ranking: round2(ranking[i]),
            })
            .collect();

        // sort_by is stable: equal rankings keep dataset order
        ranked.sort_by(|a, b| b.ranking.total_cmp(&a.ranking));

        debug!(records = ranked.len(), "fused scores");
        Ok(ranked)
    }
}

/// Coerce every record's connection count, failing on the first bad value.
pub fn connection_counts(dataset: &Dataset) -> Result<Vec<u64>> {
    dataset
        .iter()
        .map(|r| {
            r.connections.count().map_err(|e| match e {
                Error::InvalidInput(msg) => Error::InvalidInput(format!("record {}: {msg}", r.id)),
                other => other,
            })
        })
        .collect()
}

/// Scale `values` to [0, 1] with `(x - min) / (max - min)`.
///
/// When every value is the same the range is degenerate and all outputs are
/// 0.0; this is logged, not treated as an error.
pub fn min_max_normalize(values: &[f64], column: &str) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let range = max - min;
    if range <= 0.0 {
        warn!(column, value = min, "all values identical, normalizing to 0");
        return vec![0.0; values.len()];
    }

    values.iter().map(|v| ((v - min) / range).clamp(0.0, 1.0)).collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
