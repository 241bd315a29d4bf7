//! This module implements the split candidates that model selection builds
//! and compares, one per eligible attribute.
//!
//! A [SplitCandidate] is immutable once built: it carries the attribute it
//! tests, the shape of the split, the fully accumulated [Distribution] and
//! the gain figures derived from it. The unweighted information gain is
//! computed once during the build; the per-attribute user weight is applied
//! as a pure post-multiplication in [SplitCandidate::info_gain], and the gain
//! ratio stays raw.
//!
//! Four shapes are supported:
//!
//! 1. `NoSplit`: keep the node as a leaf. Carries the whole-node
//!    distribution for leaf probability estimates and is the fallback when
//!    no attribute yields a usable split.
//!
//! 2. `NominalMultiway`: one branch per value of a nominal attribute.
//!
//! 3. `NominalBinary`: two branches from the best bipartition of a nominal
//!    attribute's values.
//!
//! 4. `NumericThreshold`: two branches around a threshold on a numeric
//!    attribute, "<= threshold" and "> threshold".
//!
//! [Distribution]: ../distribution/struct.Distribution.html

use serde_derive::{Deserialize, Serialize};

use crate::dataset::{Dataset, Instance, ValueType, VALUE_TYPE_MIN, VALUE_TYPE_UNKNOWN};
use crate::distribution::Distribution;
use crate::errors::{Result, WigainError};
use crate::impurity;
use crate::impurity::{gr, gr_or_eq, sm, sm_or_eq};

/// Upper clamp on the per-branch weight a numeric boundary must keep on each
/// side, following the C4.5 convention.
const MAX_MIN_SPLIT: f64 = 25.0;

/// Gap below which two consecutive sorted numeric values are treated as one
/// boundary point.
const VALUE_GAP: f64 = 1e-5;

/// The shape of a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitKind {
    /// Do not split; keep the node as a leaf.
    NoSplit,
    /// One branch per value of a nominal attribute.
    NominalMultiway,
    /// Two branches over a bipartition of a nominal attribute's values;
    /// `left_values[v]` tells whether value `v` goes to the first branch.
    NominalBinary { left_values: Vec<bool> },
    /// Two branches around a numeric threshold, "<=" first.
    NumericThreshold { threshold: ValueType },
}

/// One split candidate: the attribute under test, the split shape, the
/// accumulated distribution and the gain figures derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitCandidate {
    kind: SplitKind,
    att_index: Option<usize>,
    /// 0 marks a candidate that produced no usable split
    num_branches: usize,
    distribution: Distribution,
    /// unweighted information gain in bits per instance
    info_gain: f64,
    gain_ratio: f64,
    user_weight: f64,
}

impl SplitCandidate {
    /// The leaf marker: carries the node's own distribution, gains are zero.
    pub fn no_split(distribution: Distribution) -> Self {
        SplitCandidate {
            kind: SplitKind::NoSplit,
            att_index: None,
            num_branches: 1,
            distribution,
            info_gain: 0.0,
            gain_ratio: 0.0,
            user_weight: 1.0,
        }
    }

    /// Build a multiway candidate for a nominal attribute: one branch per
    /// value, filled from the instances whose value is known.
    ///
    /// `sum_of_weights` is the node's total weight, missing-value instances
    /// included; it anchors the unknown-rate scaling of the gain.
    pub fn nominal_multiway(
        data: &Dataset,
        att_index: usize,
        min_no_obj: usize,
        sum_of_weights: f64,
        user_weight: f64,
    ) -> Result<Self> {
        let attribute = data.attribute(att_index);
        if !attribute.is_nominal() {
            return Err(WigainError::InvalidParameter(format!(
                "attribute '{}' is not nominal",
                attribute.name()
            )));
        }
        let num_values = attribute.num_values();
        let mut distribution = Distribution::new(num_values, data.num_classes());
        for instance in data.instances() {
            if !instance.is_missing(att_index) {
                distribution.add(
                    instance.value(att_index) as usize,
                    data.class_of(instance),
                    instance.weight(),
                );
            }
        }

        let mut candidate = SplitCandidate {
            kind: SplitKind::NominalMultiway,
            att_index: Some(att_index),
            num_branches: 0,
            distribution,
            info_gain: 0.0,
            gain_ratio: 0.0,
            user_weight,
        };
        if candidate.distribution.check(min_no_obj as f64) {
            candidate.num_branches = num_values;
            candidate.info_gain = impurity::info_gain(&candidate.distribution, sum_of_weights);
            candidate.gain_ratio = impurity::gain_ratio(
                &candidate.distribution,
                sum_of_weights,
                candidate.info_gain,
            );
        }
        Ok(candidate)
    }

    /// Build a two-branch candidate for a nominal attribute by searching all
    /// non-trivial bipartitions of its values for the one maximizing the
    /// unweighted gain. The search is exhaustive and therefore exponential in
    /// the attribute's arity.
    pub fn nominal_binary(
        data: &Dataset,
        att_index: usize,
        min_no_obj: usize,
        sum_of_weights: f64,
        user_weight: f64,
    ) -> Result<Self> {
        let attribute = data.attribute(att_index);
        if !attribute.is_nominal() {
            return Err(WigainError::InvalidParameter(format!(
                "attribute '{}' is not nominal",
                attribute.name()
            )));
        }
        let num_values = attribute.num_values();
        let mut per_value = Distribution::new(num_values, data.num_classes());
        for instance in data.instances() {
            if !instance.is_missing(att_index) {
                per_value.add(
                    instance.value(att_index) as usize,
                    data.class_of(instance),
                    instance.weight(),
                );
            }
        }

        let mut best: Option<(Vec<bool>, Distribution, f64)> = None;
        if num_values >= 2 {
            // The highest value index stays on the right throughout, which
            // enumerates each unordered bipartition exactly once.
            for mask in 1..(1usize << (num_values - 1)) {
                let left_values: Vec<bool> =
                    (0..num_values).map(|v| (mask >> v) & 1 == 1).collect();
                let two = per_value.bipartition(&left_values);
                if !two.check(min_no_obj as f64) {
                    continue;
                }
                let gain = impurity::info_gain(&two, sum_of_weights);
                let better = match best {
                    Some((_, _, best_gain)) => gr(gain, best_gain),
                    None => true,
                };
                if better {
                    best = Some((left_values, two, gain));
                }
            }
        }

        let candidate = match best {
            Some((left_values, distribution, info_gain)) => {
                let gain_ratio =
                    impurity::gain_ratio(&distribution, sum_of_weights, info_gain);
                SplitCandidate {
                    kind: SplitKind::NominalBinary { left_values },
                    att_index: Some(att_index),
                    num_branches: 2,
                    distribution,
                    info_gain,
                    gain_ratio,
                    user_weight,
                }
            }
            None => SplitCandidate {
                kind: SplitKind::NominalBinary {
                    left_values: Vec::new(),
                },
                att_index: Some(att_index),
                num_branches: 0,
                distribution: per_value,
                info_gain: 0.0,
                gain_ratio: 0.0,
                user_weight,
            },
        };
        Ok(candidate)
    }

    /// Build a threshold candidate for a numeric attribute.
    ///
    /// The instances with a known value are sorted on the attribute and every
    /// boundary between consecutive distinct values is a candidate threshold,
    /// as long as both sides keep at least `0.1 * known_weight / num_classes`
    /// weight (clamped to `[min_no_obj, 25]`). The best boundary's gain is
    /// then charged the C4.5 coding cost `log2(candidates) / sum_of_weights`;
    /// a gain that does not survive the charge invalidates the candidate. The
    /// threshold is the midpoint of the winning boundary, snapped down to the
    /// lower value when rounding would land it on the upper one.
    pub fn numeric_threshold(
        data: &Dataset,
        att_index: usize,
        min_no_obj: usize,
        sum_of_weights: f64,
        user_weight: f64,
    ) -> Result<Self> {
        let attribute = data.attribute(att_index);
        if !attribute.is_numeric() {
            return Err(WigainError::InvalidParameter(format!(
                "attribute '{}' is not numeric",
                attribute.name()
            )));
        }
        let num_classes = data.num_classes();

        let mut known: Vec<(ValueType, usize, f64)> = data
            .instances()
            .iter()
            .filter(|instance| !instance.is_missing(att_index))
            .map(|instance| {
                (
                    instance.value(att_index),
                    data.class_of(instance),
                    instance.weight(),
                )
            })
            .collect();
        known.sort_unstable_by(|a, b| {
            let v1 = a.0;
            let v2 = b.0;
            v1.partial_cmp(&v2).unwrap()
        });

        // All known instances start in the second branch and migrate into the
        // first one as the boundary moves up.
        let mut distribution = Distribution::new(2, num_classes);
        for &(_, class, weight) in &known {
            distribution.add(1, class, weight);
        }

        let mut candidate = SplitCandidate {
            kind: SplitKind::NumericThreshold {
                threshold: VALUE_TYPE_UNKNOWN,
            },
            att_index: Some(att_index),
            num_branches: 0,
            distribution,
            info_gain: 0.0,
            gain_ratio: 0.0,
            user_weight,
        };

        let mut min_split = 0.1 * candidate.distribution.total() / num_classes as f64;
        if sm_or_eq(min_split, min_no_obj as f64) {
            min_split = min_no_obj as f64;
        } else if gr(min_split, MAX_MIN_SPLIT) {
            min_split = MAX_MIN_SPLIT;
        }
        if sm(known.len() as f64, 2.0 * min_split) {
            return Ok(candidate);
        }

        let default_ent = impurity::old_ent(&candidate.distribution);
        let mut best_gain = 0.0;
        let mut split_index: Option<usize> = None;
        let mut boundaries = 0usize;
        for i in 0..known.len() - 1 {
            let (value, class, weight) = known[i];
            candidate.distribution.shift(1, 0, class, weight);
            if value + VALUE_GAP < known[i + 1].0 {
                if gr_or_eq(candidate.distribution.per_bag(0), min_split)
                    && gr_or_eq(candidate.distribution.per_bag(1), min_split)
                {
                    let current = impurity::info_gain_given(
                        &candidate.distribution,
                        sum_of_weights,
                        default_ent,
                    );
                    if gr(current, best_gain) {
                        best_gain = current;
                        split_index = Some(i);
                    }
                    boundaries += 1;
                }
            }
        }

        if boundaries == 0 {
            return Ok(candidate);
        }
        let info_gain = best_gain - impurity::log2(boundaries as f64) / sum_of_weights;
        if sm_or_eq(info_gain, 0.0) {
            return Ok(candidate);
        }
        let split_index = match split_index {
            Some(index) => index,
            None => return Ok(candidate),
        };

        let lower = known[split_index].0;
        let upper = known[split_index + 1].0;
        let mut threshold = (lower + upper) / 2.0;
        // On numeric precision loss the midpoint can collapse onto the upper
        // value; take the lower one so the first branch keeps its instances.
        if threshold == upper {
            threshold = lower;
        }

        let mut distribution = Distribution::new(2, num_classes);
        for (i, &(_, class, weight)) in known.iter().enumerate() {
            distribution.add(if i <= split_index { 0 } else { 1 }, class, weight);
        }
        candidate.info_gain = info_gain;
        candidate.gain_ratio =
            impurity::gain_ratio(&distribution, sum_of_weights, info_gain);
        candidate.distribution = distribution;
        candidate.num_branches = 2;
        candidate.kind = SplitKind::NumericThreshold { threshold };
        Ok(candidate)
    }

    pub fn kind(&self) -> &SplitKind {
        &self.kind
    }

    /// The attribute under test; `None` for the leaf marker.
    pub fn att_index(&self) -> Option<usize> {
        self.att_index
    }

    pub fn num_branches(&self) -> usize {
        self.num_branches
    }

    /// Whether the candidate produced a usable split. The leaf marker is
    /// always valid; attribute candidates are valid only when at least two
    /// branches received the minimum weight during the build.
    pub fn check_model(&self) -> bool {
        self.num_branches > 0
    }

    /// The information gain entering the selection comparison: the raw gain
    /// scaled by the per-attribute user weight.
    pub fn info_gain(&self) -> f64 {
        self.user_weight * self.info_gain
    }

    /// The gain ratio. Deliberately left unscaled by the user weight; the
    /// weight only shifts the gain comparison, not the ratio tie-break.
    pub fn gain_ratio(&self) -> f64 {
        self.gain_ratio
    }

    pub fn user_weight(&self) -> f64 {
        self.user_weight
    }

    /// The accumulated distribution behind this candidate.
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// The threshold of a numeric candidate.
    pub fn threshold(&self) -> Option<ValueType> {
        match self.kind {
            SplitKind::NumericThreshold { threshold } => Some(threshold),
            _ => None,
        }
    }

    /// The branch this split sends an instance to, or `None` when the
    /// instance's value on the tested attribute is missing.
    pub fn branch_for(&self, instance: &Instance) -> Option<usize> {
        match (&self.kind, self.att_index) {
            (SplitKind::NoSplit, _) => Some(0),
            (SplitKind::NominalMultiway, Some(att_index)) => {
                if instance.is_missing(att_index) {
                    None
                } else {
                    Some(instance.value(att_index) as usize)
                }
            }
            (SplitKind::NominalBinary { left_values }, Some(att_index)) => {
                if instance.is_missing(att_index) {
                    None
                } else {
                    let value = instance.value(att_index) as usize;
                    if left_values.get(value).copied().unwrap_or(false) {
                        Some(0)
                    } else {
                        Some(1)
                    }
                }
            }
            (SplitKind::NumericThreshold { threshold }, Some(att_index)) => {
                if instance.is_missing(att_index) {
                    None
                } else if sm_or_eq(instance.value(att_index), *threshold) {
                    Some(0)
                } else {
                    Some(1)
                }
            }
            _ => None,
        }
    }

    /// Per-branch weight shares, used to spread an instance with a missing
    /// value fractionally over the branches.
    pub fn branch_weights(&self) -> Vec<f64> {
        let total = self.distribution.total();
        let num_bags = self.distribution.num_bags();
        (0..num_bags)
            .map(|bag| {
                if gr(total, 0.0) {
                    self.distribution.per_bag(bag) / total
                } else {
                    1.0 / num_bags as f64
                }
            })
            .collect()
    }

    /// Re-snap a numeric threshold to the largest known attribute value not
    /// above it in the full training set, keeping thresholds comparable
    /// across recursive calls on subsets. No effect on other split kinds.
    pub fn snap_threshold(&mut self, all_data: &Dataset) {
        let att_index = match self.att_index {
            Some(index) => index,
            None => return,
        };
        if self.num_branches < 2 {
            return;
        }
        if let SplitKind::NumericThreshold { threshold } = &mut self.kind {
            let mut new_point = VALUE_TYPE_MIN;
            for instance in all_data.instances() {
                if !instance.is_missing(att_index) {
                    let value = instance.value(att_index);
                    if gr(value, new_point) && sm_or_eq(value, *threshold) {
                        new_point = value;
                    }
                }
            }
            *threshold = new_point;
        }
    }

    /// Fold the missing-value weight into the distribution and align a
    /// numeric threshold with the full training set. Called once on the
    /// winning candidate.
    pub(crate) fn finalize(&mut self, data: &Dataset, all_data: &Dataset) {
        if let Some(att_index) = self.att_index {
            self.distribution.add_with_unknown(data, att_index);
            self.snap_threshold(all_data);
        }
    }
}
