//! Portfolio averaging functions.

/// Arithmetic mean of `values`.
///
/// Returns `None` for an empty input.
#[must_use]
pub fn equal_weighted_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values.into_iter().fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Weighted mean `Σ(v_i × w_i) / Σ w_i` over `(value, weight)` pairs.
///
/// Returns `None` for an empty input or a zero total weight.
#[must_use]
pub fn value_weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (num, den) =
        pairs.into_iter().fold((0.0, 0.0), |(num, den), (v, w)| (num + v * w, den + w));
    if den == 0.0 { None } else { Some(num / den) }
}
