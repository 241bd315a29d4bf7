//! This module implements the weighted class-count bookkeeping behind every
//! split candidate.
//!
//! A [Distribution] tallies instance weight per (branch, class) pair, along
//! with per-branch, per-class and grand totals. Split candidates fill one
//! distribution from a scan over the node's dataset; instances with a missing
//! value on the tested attribute are left out of the branch tallies during
//! the scan and folded back in with [Distribution::add_with_unknown] once a
//! split has been chosen, so the stored distribution accounts for the whole
//! node and downstream class-probability estimates stay consistent.

use serde_derive::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::impurity::{eq, gr, gr_or_eq};

/// Weight tallies per (branch, class) pair with cached totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distribution {
    per_class_per_bag: Vec<Vec<f64>>,
    per_bag: Vec<f64>,
    per_class: Vec<f64>,
    total: f64,
}

impl Distribution {
    /// An empty distribution with the given number of branches and classes.
    pub fn new(num_bags: usize, num_classes: usize) -> Self {
        Distribution {
            per_class_per_bag: vec![vec![0.0; num_classes]; num_bags],
            per_bag: vec![0.0; num_bags],
            per_class: vec![0.0; num_classes],
            total: 0.0,
        }
    }

    /// A single-branch distribution over every instance of the dataset, as
    /// kept by a leaf.
    pub fn from_dataset(data: &Dataset) -> Self {
        let mut d = Distribution::new(1, data.num_classes());
        for instance in data.instances() {
            d.add(0, data.class_of(instance), instance.weight());
        }
        d
    }

    /// Add `weight` to the given branch and class. Indices must be in range.
    pub fn add(&mut self, bag: usize, class: usize, weight: f64) {
        self.per_class_per_bag[bag][class] += weight;
        self.per_bag[bag] += weight;
        self.per_class[class] += weight;
        self.total += weight;
    }

    /// Move `weight` of the given class from one branch to another. Used by
    /// the numeric boundary scan; class totals and the grand total are
    /// unchanged.
    pub fn shift(&mut self, from: usize, to: usize, class: usize, weight: f64) {
        self.per_class_per_bag[from][class] -= weight;
        self.per_class_per_bag[to][class] += weight;
        self.per_bag[from] -= weight;
        self.per_bag[to] += weight;
    }

    /// Collapse a one-branch-per-value distribution into two branches: the
    /// values marked in `left_values` and the rest.
    pub fn bipartition(&self, left_values: &[bool]) -> Distribution {
        let mut d = Distribution::new(2, self.num_classes());
        for (value, &is_left) in left_values.iter().enumerate() {
            let bag = if is_left { 0 } else { 1 };
            for class in 0..self.num_classes() {
                d.add(bag, class, self.per_class_per_bag(value, class));
            }
        }
        d
    }

    pub fn num_bags(&self) -> usize {
        self.per_bag.len()
    }

    pub fn num_classes(&self) -> usize {
        self.per_class.len()
    }

    /// Sum of all weights across branches and classes.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Sum of weights in one branch.
    pub fn per_bag(&self, bag: usize) -> f64 {
        self.per_bag[bag]
    }

    /// Sum of weights of one class across all branches.
    pub fn per_class(&self, class: usize) -> f64 {
        self.per_class[class]
    }

    pub fn per_class_per_bag(&self, bag: usize, class: usize) -> f64 {
        self.per_class_per_bag[bag][class]
    }

    /// The class carrying the most weight; ties keep the lower index.
    pub fn max_class(&self) -> usize {
        let mut max_index = 0;
        for (class, &weight) in self.per_class.iter().enumerate() {
            if gr(weight, self.per_class[max_index]) {
                max_index = class;
            }
        }
        max_index
    }

    /// Whether at least two branches carry `min_weight` or more. A split
    /// that fails this check cannot be useful.
    pub fn check(&self, min_weight: f64) -> bool {
        let mut counter = 0;
        for &weight in &self.per_bag {
            if gr_or_eq(weight, min_weight) {
                counter += 1;
            }
        }
        counter > 1
    }

    /// Fold the instances whose value on `att_index` is missing into the
    /// branch tallies, spreading each instance's weight over the branches in
    /// proportion to their current weight share. A branch with zero weight
    /// receives none; if every branch is empty the weight is spread
    /// uniformly, so the branch totals always sum to the dataset's total
    /// weight afterwards.
    pub fn add_with_unknown(&mut self, data: &Dataset, att_index: usize) {
        let num_bags = self.num_bags();
        let mut probs = vec![0.0; num_bags];
        for (bag, prob) in probs.iter_mut().enumerate() {
            *prob = if eq(self.total, 0.0) {
                1.0 / num_bags as f64
            } else {
                self.per_bag[bag] / self.total
            };
        }
        for instance in data.instances() {
            if instance.is_missing(att_index) {
                let class = data.class_of(instance);
                let weight = instance.weight();
                self.per_class[class] += weight;
                self.total += weight;
                for bag in 0..num_bags {
                    let new_weight = probs[bag] * weight;
                    self.per_class_per_bag[bag][class] += new_weight;
                    self.per_bag[bag] += new_weight;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Attribute, Dataset, Instance, VALUE_TYPE_UNKNOWN};

    #[test]
    fn totals_track_adds() {
        let mut d = Distribution::new(2, 2);
        d.add(0, 0, 2.0);
        d.add(0, 1, 1.0);
        d.add(1, 1, 3.0);
        assert!((d.total() - 6.0).abs() < 1e-9);
        assert!((d.per_bag(0) - 3.0).abs() < 1e-9);
        assert!((d.per_class(1) - 4.0).abs() < 1e-9);
        assert_eq!(d.max_class(), 1);
    }

    #[test]
    fn shift_keeps_totals() {
        let mut d = Distribution::new(2, 2);
        d.add(1, 0, 4.0);
        d.shift(1, 0, 0, 1.5);
        assert!((d.per_bag(0) - 1.5).abs() < 1e-9);
        assert!((d.per_bag(1) - 2.5).abs() < 1e-9);
        assert!((d.total() - 4.0).abs() < 1e-9);
        assert!((d.per_class(0) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn check_needs_two_heavy_bags() {
        let mut d = Distribution::new(3, 2);
        d.add(0, 0, 2.0);
        d.add(1, 1, 0.5);
        d.add(2, 1, 2.0);
        assert!(d.check(2.0));
        assert!(!d.check(2.1));
    }

    #[test]
    fn bipartition_merges_value_bags() {
        let mut d = Distribution::new(3, 2);
        d.add(0, 0, 4.0);
        d.add(1, 0, 4.0);
        d.add(2, 1, 4.0);
        let two = d.bipartition(&[true, true, false]);
        assert_eq!(two.num_bags(), 2);
        assert!((two.per_bag(0) - 8.0).abs() < 1e-9);
        assert!((two.per_bag(1) - 4.0).abs() < 1e-9);
        assert!((two.per_class_per_bag(0, 0) - 8.0).abs() < 1e-9);
    }

    fn dataset_with_missing() -> Dataset {
        let attributes = vec![
            Attribute::nominal("a", &["v0", "v1"]),
            Attribute::nominal("label", &["yes", "no"]),
        ];
        let mut data = Dataset::new(attributes, 1).unwrap();
        for _ in 0..6 {
            data.add(Instance::new(vec![0.0, 0.0])).unwrap();
        }
        for _ in 0..4 {
            data.add(Instance::new(vec![1.0, 1.0])).unwrap();
        }
        data.add(Instance::with_weight(vec![VALUE_TYPE_UNKNOWN, 0.0], 2.0))
            .unwrap();
        data
    }

    #[test]
    fn unknown_weight_is_spread_proportionally() {
        let data = dataset_with_missing();
        let mut d = Distribution::new(2, 2);
        for instance in data.instances() {
            if !instance.is_missing(0) {
                d.add(
                    instance.value(0) as usize,
                    data.class_of(instance),
                    instance.weight(),
                );
            }
        }
        d.add_with_unknown(&data, 0);
        // 2.0 units of missing weight land 6/10 on bag 0 and 4/10 on bag 1
        assert!((d.total() - data.sum_of_weights()).abs() < 1e-9);
        assert!((d.per_bag(0) - 7.2).abs() < 1e-9);
        assert!((d.per_bag(1) - 4.8).abs() < 1e-9);
        assert!((d.per_bag(0) + d.per_bag(1) - d.total()).abs() < 1e-9);
    }

    #[test]
    fn empty_branch_receives_no_unknown_weight() {
        let data = dataset_with_missing();
        let mut d = Distribution::new(2, 2);
        for instance in data.instances() {
            if !instance.is_missing(0) {
                // pile everything on bag 0, leaving bag 1 empty
                d.add(0, data.class_of(instance), instance.weight());
            }
        }
        d.add_with_unknown(&data, 0);
        assert!((d.per_bag(1) - 0.0).abs() < 1e-9);
        assert!((d.per_bag(0) - d.total()).abs() < 1e-9);
    }
}
