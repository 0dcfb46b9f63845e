//! Anomaly detector implementations.
//!
//! Every built-in detector reports the fraction of rows it flags as its
//! severity, so one alert threshold applies to all of them.

mod dbscan;
mod iqr;
mod zscore;

pub use dbscan::DbscanDetector;
pub use iqr::IqrDetector;
pub use zscore::ZScoreDetector;

/// Share of scores matching `flagged`; 0.0 for no scores.
fn flagged_fraction<F>(scores: &[f64], flagged: F) -> f64
where
    F: Fn(f64) -> bool,
{
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().filter(|&&s| flagged(s)).count() as f64 / scores.len() as f64
}
