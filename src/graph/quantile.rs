//! Sample quantiles.

use crate::error::{Error, Result};

/// Quantile `q` of `values`, interpolating linearly between order statistics.
///
/// With the sorted sample `x` and `h = (n - 1) q`, the result is
/// `x[⌊h⌋] + (h - ⌊h⌋)(x[⌈h⌉] - x[⌊h⌋])`. `q = 0` is the minimum and
/// `q = 1` the maximum.
pub fn quantile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&q) {
        return Err(Error::InvalidParameter {
            name: "prune_quantile",
            message: "must be within [0, 1]",
        });
    }
    if values.is_empty() {
        return Err(Error::InvalidParameter {
            name: "values",
            message: "quantile of an empty sample",
        });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}
