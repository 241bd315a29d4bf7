//! This module implements the entropy measures and the floating comparisons
//! used by split selection.
//!
//! All entropies are computed in the fractional-instance convention: a
//! distribution only tallies the instances whose value on the tested
//! attribute is known, and the gain is scaled by the known-value share of the
//! node's total weight. Entropies are kept weight-scaled (weight times bits)
//! until the final division, which keeps the accumulation loops free of
//! per-branch normalization.

use crate::distribution::Distribution;

/// Tolerance used when comparing accumulated weights.
const SMALL: f64 = 1e-6;

const LN_2: f64 = std::f64::consts::LN_2;

/// Whether two weight sums are equal within tolerance.
pub fn eq(a: f64, b: f64) -> bool {
    (a - b) < SMALL && (b - a) < SMALL
}

/// Whether `a` is greater than `b` by more than the tolerance.
pub fn gr(a: f64, b: f64) -> bool {
    a - b > SMALL
}

/// Whether `a` is greater than or approximately equal to `b`.
pub fn gr_or_eq(a: f64, b: f64) -> bool {
    b - a < SMALL
}

/// Whether `a` is smaller than `b` by more than the tolerance.
pub fn sm(a: f64, b: f64) -> bool {
    b - a > SMALL
}

/// Whether `a` is smaller than or approximately equal to `b`.
pub fn sm_or_eq(a: f64, b: f64) -> bool {
    a - b < SMALL
}

/// Base-2 logarithm.
pub fn log2(a: f64) -> f64 {
    a.ln() / LN_2
}

/// w * ln(w), with weights below the tolerance treated as zero.
pub fn ln_func(w: f64) -> f64 {
    if w < SMALL {
        0.0
    } else {
        w * w.ln()
    }
}

/// Entropy of the class totals of a distribution, scaled by its total weight
/// (weight times bits).
pub fn old_ent(d: &Distribution) -> f64 {
    let mut sum = 0.0;
    for class in 0..d.num_classes() {
        sum += ln_func(d.per_class(class));
    }
    (ln_func(d.total()) - sum) / LN_2
}

/// Expected post-split entropy of a distribution, scaled by its total weight
/// (weight times bits).
pub fn new_ent(d: &Distribution) -> f64 {
    let mut sum = 0.0;
    for bag in 0..d.num_bags() {
        let mut inner = ln_func(d.per_bag(bag));
        for class in 0..d.num_classes() {
            inner -= ln_func(d.per_class_per_bag(bag, class));
        }
        sum += inner;
    }
    sum / LN_2
}

/// Information gain of a split in bits per instance.
///
/// `total` is the node's full weight, missing-value instances included; the
/// distribution itself only covers the known-value instances, and the raw
/// entropy reduction is scaled by the known-value share.
pub fn info_gain(d: &Distribution, total: f64) -> f64 {
    info_gain_given(d, total, old_ent(d))
}

/// Information gain with a precomputed parent entropy, for scans that
/// evaluate many candidate boundaries over one distribution.
pub fn info_gain_given(d: &Distribution, total: f64, parent_ent: f64) -> f64 {
    let unknown_rate = (total - d.total()) / total;
    let numerator = (1.0 - unknown_rate) * (parent_ent - new_ent(d));

    // Splits with no gain are useless.
    if eq(numerator, 0.0) {
        return 0.0;
    }
    numerator / d.total()
}

/// Entropy of the branch-size distribution itself, with the missing-value
/// mass counted as one extra branch. Scaled by `total` (weight times bits).
pub fn split_ent(d: &Distribution, total: f64) -> f64 {
    let mut sum = 0.0;
    if gr(d.total(), 0.0) {
        for bag in 0..d.num_bags() {
            sum -= ln_func(d.per_bag(bag));
        }
        sum -= ln_func(total - d.total());
        sum += ln_func(total);
    }
    sum / LN_2
}

/// Gain ratio: `gain` divided by the split information, 0 when the split
/// information vanishes (degenerate single-branch split).
pub fn gain_ratio(d: &Distribution, total: f64, gain: f64) -> f64 {
    let denominator = split_ent(d, total);
    if eq(denominator, 0.0) {
        return 0.0;
    }
    gain / (denominator / total)
}
