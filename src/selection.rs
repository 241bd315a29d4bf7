//! This module implements the model selection procedure that picks the best
//! split for one node of a growing decision tree.
//!
//! For every non-class attribute a [SplitCandidate] is built over the node's
//! dataset. Candidates that pass the usefulness check contribute their
//! weighted information gain to a running average, except that nominal
//! attributes with very many distinct values (30% of the training set size or
//! more) are kept out of the average unless every attribute looks like that;
//! this dampens the known bias of gain-based selection toward
//! high-cardinality attributes. The winner is then the candidate with the
//! highest gain ratio among those whose weighted gain reaches the average
//! (minus a small tolerance); if nothing clears the bar the node stays a
//! leaf.
//!
//! The full training set is passed to [ModelSelector::select_model]
//! explicitly: it anchors the cardinality guard and the re-snapping of
//! numeric thresholds, so thresholds stay comparable across recursive calls
//! on ever-smaller subsets.
//!
//! [SplitCandidate]: ../split/struct.SplitCandidate.html
//!
//! # Example
//! ```
//! use wigain::config::SplitMode;
//! use wigain::dataset::{Attribute, Dataset, Instance};
//! use wigain::selection::ModelSelector;
//! use wigain::weights::AttributeWeights;
//!
//! // a nominal attribute separating the two classes perfectly
//! let attributes = vec![
//!     Attribute::nominal("color", &["red", "blue"]),
//!     Attribute::nominal("label", &["a", "b"]),
//! ];
//! let mut data = Dataset::new(attributes, 1).unwrap();
//! for _ in 0..6 {
//!     data.add(Instance::new(vec![0.0, 0.0])).unwrap();
//! }
//! for _ in 0..4 {
//!     data.add(Instance::new(vec![1.0, 1.0])).unwrap();
//! }
//!
//! let weights = AttributeWeights::uniform(data.num_attributes());
//! let selector = ModelSelector::new(2, SplitMode::Multiway, weights).unwrap();
//! let split = selector.select_model(&data, &data).unwrap();
//!
//! assert_eq!(split.att_index(), Some(0));
//! assert!(split.info_gain() > 0.9);
//! ```

use crate::config::{Config, SplitMode};
use crate::dataset::Dataset;
use crate::distribution::Distribution;
use crate::errors::{Result, WigainError};
use crate::impurity::{eq, gr, sm};
use crate::split::SplitCandidate;
use crate::weights::AttributeWeights;

/// Share of the training set size above which a nominal attribute counts as
/// high-cardinality for the averaging guard.
const MULTI_VAL_SHARE: f64 = 0.3;

/// Tolerance on the average-gain admission, kept close to the reference C4.5
/// comparison behaviour.
const GAIN_TOLERANCE: f64 = 1e-3;

/// Picks the best split candidate for a node dataset.
pub struct ModelSelector {
    min_no_obj: usize,
    split_mode: SplitMode,
    weights: AttributeWeights,
}

impl ModelSelector {
    /// Create a selector. `min_no_obj` is the minimum instance weight that at
    /// least two branches of a useful split must keep; it must be at least 1.
    pub fn new(
        min_no_obj: usize,
        split_mode: SplitMode,
        weights: AttributeWeights,
    ) -> Result<Self> {
        if min_no_obj < 1 {
            return Err(WigainError::InvalidParameter(
                "min_no_obj must be at least 1".to_string(),
            ));
        }
        Ok(ModelSelector {
            min_no_obj,
            split_mode,
            weights,
        })
    }

    /// Create a selector from a [Config], parsing its user weight string
    /// against the attribute count of the schema to be used.
    ///
    /// [Config]: ../config/struct.Config.html
    ///
    /// # Example
    /// ```
    /// use wigain::config::{Config, SplitMode};
    /// use wigain::selection::ModelSelector;
    ///
    /// let mut conf = Config::new();
    /// conf.set_split_mode(SplitMode::Binary);
    /// conf.set_user_weights("0.5;1");
    /// let selector = ModelSelector::with_config(&conf, 3).unwrap();
    /// assert!((selector.weights().get(2) - 1.0).abs() < 1e-9);
    /// ```
    pub fn with_config(conf: &Config, num_attributes: usize) -> Result<Self> {
        let weights = AttributeWeights::parse(&conf.user_weights, num_attributes)?;
        ModelSelector::new(conf.min_instances, conf.split_mode.clone(), weights)
    }

    pub fn min_no_obj(&self) -> usize {
        self.min_no_obj
    }

    pub fn split_mode(&self) -> &SplitMode {
        &self.split_mode
    }

    pub fn weights(&self) -> &AttributeWeights {
        &self.weights
    }

    /// Select the best split for `data`, a node's subset of the training set
    /// `all_data`. Returns the leaf marker when the node is too small or
    /// pure, when no attribute yields a useful split, or when no candidate
    /// clears the average-gain and gain-ratio bars.
    pub fn select_model(&self, data: &Dataset, all_data: &Dataset) -> Result<SplitCandidate> {
        if data.is_empty() {
            return Err(WigainError::InvalidParameter(
                "cannot select a split for an empty dataset".to_string(),
            ));
        }
        if self.weights.len() != data.num_attributes() {
            return Err(WigainError::InvalidParameter(format!(
                "{} weights supplied for {} attributes",
                self.weights.len(),
                data.num_attributes()
            )));
        }

        // Check if all instances belong to one class or if there are not
        // enough instances to split.
        let check_distribution = Distribution::from_dataset(data);
        let no_split = SplitCandidate::no_split(check_distribution);
        {
            let d = no_split.distribution();
            if sm(d.total(), (2 * self.min_no_obj) as f64)
                || eq(d.total(), d.per_class(d.max_class()))
            {
                return Ok(no_split);
            }
        }

        // Check if all attributes are nominal and have a lot of values.
        let mut multi_val = true;
        for index in 0..data.num_attributes() {
            if index == data.class_index() {
                continue;
            }
            let attribute = data.attribute(index);
            if attribute.is_numeric()
                || sm(
                    attribute.num_values() as f64,
                    MULTI_VAL_SHARE * all_data.num_instances() as f64,
                )
            {
                multi_val = false;
                break;
            }
        }

        let sum_of_weights = data.sum_of_weights();
        let mut candidates: Vec<Option<SplitCandidate>> =
            Vec::with_capacity(data.num_attributes());
        let mut average_info_gain = 0.0;
        let mut valid_models = 0usize;

        for index in 0..data.num_attributes() {
            if index == data.class_index() {
                candidates.push(None);
                continue;
            }
            let attribute = data.attribute(index);
            let user_weight = self.weights.get(index);
            let candidate = if attribute.is_numeric() {
                SplitCandidate::numeric_threshold(
                    data,
                    index,
                    self.min_no_obj,
                    sum_of_weights,
                    user_weight,
                )?
            } else {
                match self.split_mode {
                    SplitMode::Multiway => SplitCandidate::nominal_multiway(
                        data,
                        index,
                        self.min_no_obj,
                        sum_of_weights,
                        user_weight,
                    )?,
                    SplitMode::Binary => SplitCandidate::nominal_binary(
                        data,
                        index,
                        self.min_no_obj,
                        sum_of_weights,
                        user_weight,
                    )?,
                }
            };

            // A useful candidate enters the running average unless it tests a
            // high-cardinality nominal attribute.
            if candidate.check_model()
                && (attribute.is_numeric()
                    || multi_val
                    || sm(
                        attribute.num_values() as f64,
                        MULTI_VAL_SHARE * all_data.num_instances() as f64,
                    ))
            {
                average_info_gain += candidate.info_gain();
                valid_models += 1;
            }
            candidates.push(Some(candidate));
        }

        if valid_models == 0 {
            return Ok(no_split);
        }
        average_info_gain /= valid_models as f64;

        // Find the best attribute to split on.
        let mut min_result = 0.0;
        let mut best_index: Option<usize> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            if let Some(candidate) = candidate {
                if candidate.check_model()
                    && candidate.info_gain() >= average_info_gain - GAIN_TOLERANCE
                    && gr(candidate.gain_ratio(), min_result)
                {
                    min_result = candidate.gain_ratio();
                    best_index = Some(index);
                }
            }
        }

        // Check if a useful split was found.
        if eq(min_result, 0.0) {
            return Ok(no_split);
        }
        let best_index = match best_index {
            Some(index) => index,
            None => return Ok(no_split),
        };
        let mut best = match candidates[best_index].take() {
            Some(candidate) => candidate,
            None => {
                return Err(WigainError::Computation(
                    "selected split candidate disappeared during the scan".to_string(),
                ))
            }
        };

        // Store the complete distribution with the winner and align a numeric
        // threshold with the full training set.
        best.finalize(data, all_data);
        Ok(best)
    }
}
