//! Descriptive statistics.
//!
//! NaN inputs are skipped. A statistic with too few remaining
//! observations is NaN rather than an error.

/// Arithmetic mean.
pub fn mean(data: &[f64]) -> f64 {
    let (sum, n) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(sum, n), &x| (sum + x, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Sample standard deviation (`n - 1` denominator). NaN below two points.
pub fn sample_std(data: &[f64]) -> f64 {
    let clean: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if clean.len() < 2 {
        return f64::NAN;
    }
    let m = mean(&clean);
    let ss: f64 = clean.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (clean.len() - 1) as f64).sqrt()
}

/// Linearly interpolated quantile, `q` in `[0, 1]`.
pub fn quantile(data: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    quantile_sorted(&sorted, q)
}

/// [`quantile`] over data already sorted ascending and free of NaN.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn median(data: &[f64]) -> f64 {
    quantile(data, 0.5)
}
