//! DBSCAN detector.

use std::collections::VecDeque;

use anomaly_api::{DbscanConfig, DBSCAN};
use anomaly_spi::{AnomalyDetector, Result};
use batch_spi::RecordBatch;

use super::flagged_fraction;

const FEATURES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

/// Density-based detector over `[value, attribute, gas_used, calldata_size]`.
///
/// Features are standardised to zero mean and unit variance, then clustered
/// with DBSCAN. Noise points score 1.0, clustered points 0.0.
#[derive(Debug, Clone)]
pub struct DbscanDetector {
    eps: f64,
    min_samples: usize,
    clusters: usize,
}

impl DbscanDetector {
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self {
            eps,
            min_samples,
            clusters: 0,
        }
    }

    /// Create from configuration.
    pub fn from_config(config: DbscanConfig) -> Self {
        Self::new(config.eps, config.min_samples)
    }

    /// Number of clusters found by the last fit.
    pub fn cluster_count(&self) -> usize {
        self.clusters
    }

    fn labels(&self, points: &[[f64; FEATURES]]) -> (Vec<Label>, usize) {
        let eps_sq = self.eps * self.eps;
        let neighbours = |i: usize| -> Vec<usize> {
            points
                .iter()
                .enumerate()
                .filter(|(_, p)| squared_distance(&points[i], p) <= eps_sq)
                .map(|(j, _)| j)
                .collect()
        };

        let mut labels = vec![Label::Unvisited; points.len()];
        let mut clusters = 0;
        for i in 0..points.len() {
            if labels[i] != Label::Unvisited {
                continue;
            }
            let seeds = neighbours(i);
            if seeds.len() < self.min_samples {
                labels[i] = Label::Noise;
                continue;
            }

            let cluster = clusters;
            clusters += 1;
            labels[i] = Label::Cluster(cluster);
            let mut queue: VecDeque<usize> = seeds.into();
            while let Some(j) = queue.pop_front() {
                match labels[j] {
                    // border point, reachable but not core
                    Label::Noise => labels[j] = Label::Cluster(cluster),
                    Label::Unvisited => {
                        labels[j] = Label::Cluster(cluster);
                        let more = neighbours(j);
                        if more.len() >= self.min_samples {
                            queue.extend(more);
                        }
                    }
                    Label::Cluster(_) => {}
                }
            }
        }
        (labels, clusters)
    }
}

impl Default for DbscanDetector {
    fn default() -> Self {
        Self::from_config(DbscanConfig::default())
    }
}

impl AnomalyDetector for DbscanDetector {
    fn name(&self) -> &str {
        DBSCAN
    }

    fn fit_predict(&mut self, batch: &RecordBatch) -> Result<Vec<f64>> {
        if batch.is_empty() {
            self.clusters = 0;
            return Ok(Vec::new());
        }
        let points = standardise(batch.feature_matrix());
        let (labels, clusters) = self.labels(&points);
        self.clusters = clusters;
        Ok(labels
            .into_iter()
            .map(|label| if label == Label::Noise { 1.0 } else { 0.0 })
            .collect())
    }

    fn severity(&self, scores: &[f64]) -> Result<f64> {
        Ok(flagged_fraction(scores, |s| s > 0.0))
    }
}

/// Scale each column to zero mean and unit population variance.
/// Constant columns become zero.
fn standardise(mut rows: Vec<[f64; FEATURES]>) -> Vec<[f64; FEATURES]> {
    let n = rows.len() as f64;
    for col in 0..FEATURES {
        let mean = rows.iter().map(|r| r[col]).sum::<f64>() / n;
        let var = rows.iter().map(|r| (r[col] - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        for row in &mut rows {
            row[col] = if std > 0.0 { (row[col] - mean) / std } else { 0.0 };
        }
    }
    rows
}

fn squared_distance(a: &[f64; FEATURES], b: &[f64; FEATURES]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
