//Copyright (C) 2017-2018 Baidu, Inc. All Rights Reserved.
//
//Redistribution and use in source and binary forms, with or without
//modification, are permitted provided that the following conditions
//are met:
//
// * Redistributions of source code must retain the above copyright
//   notice, this list of conditions and the following disclaimer.
//
// * Redistributions in binary form must reproduce the above copyright
//   notice, this list of conditions and the following disclaimer in
//   the documentation and/or other materials provided with the
//   distribution.
//
// * Neither the name of Baidu, Inc., nor the names of its
//   contributors may be used to endorse or promote products derived
//   from this software without specific prior written permission.
//
//THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
//"AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
//LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
//A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
//OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
//LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; Loss OF USE,
//DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
//THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
//(INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
//OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

pub mod config;
pub mod dataset;
pub mod distribution;
pub mod errors;
pub mod impurity;
pub mod selection;
pub mod split;
pub mod weights;

#[cfg(test)]
mod tests {

    use crate::config::SplitMode;
    use crate::dataset::{Attribute, Dataset, Instance, VALUE_TYPE_UNKNOWN};
    use crate::selection::ModelSelector;
    use crate::split::SplitKind;
    use crate::weights::AttributeWeights;

    /// 10 instances, classes split 6/4, one nominal attribute separating the
    /// classes perfectly.
    fn perfect_nominal() -> Dataset {
        let attributes = vec![
            Attribute::nominal("color", &["red", "blue"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 1).unwrap();
        for _ in 0..6 {
            data.add(Instance::new(vec![0.0, 0.0])).unwrap();
        }
        for _ in 0..4 {
            data.add(Instance::new(vec![1.0, 1.0])).unwrap();
        }
        data
    }

    /// Two predictive attributes: the first separates the 6/4 classes
    /// perfectly, the second only partially.
    fn two_attributes() -> Dataset {
        let attributes = vec![
            Attribute::nominal("strong", &["v0", "v1"]),
            Attribute::nominal("weak", &["v0", "v1"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 2).unwrap();
        for _ in 0..4 {
            data.add(Instance::new(vec![0.0, 0.0, 0.0])).unwrap();
        }
        for _ in 0..2 {
            data.add(Instance::new(vec![0.0, 1.0, 0.0])).unwrap();
        }
        data.add(Instance::new(vec![1.0, 0.0, 1.0])).unwrap();
        for _ in 0..3 {
            data.add(Instance::new(vec![1.0, 1.0, 1.0])).unwrap();
        }
        data
    }

    fn selector(weights: Vec<f64>) -> ModelSelector {
        let weights = AttributeWeights::from_vec(weights).unwrap();
        ModelSelector::new(2, SplitMode::Multiway, weights).unwrap()
    }

    #[test]
    fn perfect_separator_is_selected() {
        let data = perfect_nominal();
        let selector = selector(vec![1.0, 1.0]);
        let split = selector.select_model(&data, &data).unwrap();

        assert_eq!(split.kind(), &SplitKind::NominalMultiway);
        assert_eq!(split.att_index(), Some(0));
        assert!((split.info_gain() - 0.970950594).abs() < 1e-6);
        assert!((split.gain_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_weights_match_the_unweighted_baseline() {
        let data = two_attributes();
        let explicit = selector(vec![1.0, 1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        let uniform = ModelSelector::new(
            2,
            SplitMode::Multiway,
            AttributeWeights::uniform(data.num_attributes()),
        )
        .unwrap()
        .select_model(&data, &data)
        .unwrap();

        // the strong attribute wins the unweighted comparison
        assert_eq!(explicit.att_index(), Some(0));
        assert_eq!(uniform.att_index(), Some(0));
        assert!((explicit.info_gain() - uniform.info_gain()).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_attribute_defers_to_competitor() {
        let data = two_attributes();
        // muting the strong attribute drops its weighted gain below the
        // average, so the weak attribute takes the split
        let split = selector(vec![0.0, 1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(split.att_index(), Some(1));
    }

    #[test]
    fn downweighting_shifts_selection_toward_the_higher_ratio() {
        let data = two_attributes();
        // at weight 0.1 the strong attribute misses the average-gain floor
        let muted = selector(vec![0.1, 1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(muted.att_index(), Some(1));
        // raising the weight lets it back in, and its higher gain ratio wins
        let raised = selector(vec![0.5, 1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(raised.att_index(), Some(0));
        assert!(raised.gain_ratio() > muted.gain_ratio());
    }

    #[test]
    fn zero_weight_sole_attribute_still_splits() {
        // with a single attribute the admission average is the attribute's
        // own zero weighted gain, and the gain ratio stays unweighted, so
        // the candidate survives selection
        let data = perfect_nominal();
        let split = selector(vec![0.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(split.att_index(), Some(0));
        assert_eq!(split.info_gain(), 0.0);
        assert!((split.gain_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn pure_node_returns_no_split() {
        let attributes = vec![
            Attribute::nominal("color", &["red", "blue"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 1).unwrap();
        for i in 0..10 {
            data.add(Instance::new(vec![(i % 2) as f64, 0.0])).unwrap();
        }
        let split = selector(vec![1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(split.kind(), &SplitKind::NoSplit);
        // the leaf keeps the whole-node distribution
        assert!((split.distribution().total() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn undersized_node_returns_no_split() {
        let attributes = vec![
            Attribute::nominal("color", &["red", "blue"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes.clone(), 1).unwrap();
        data.add(Instance::new(vec![0.0, 0.0])).unwrap();
        data.add(Instance::new(vec![0.0, 0.0])).unwrap();
        data.add(Instance::new(vec![1.0, 1.0])).unwrap();
        let split = selector(vec![1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(split.kind(), &SplitKind::NoSplit);

        // the floor compares weighted totals, not instance counts
        let mut weighted = Dataset::new(attributes, 1).unwrap();
        for i in 0..8 {
            let class = if i < 5 { 0.0 } else { 1.0 };
            weighted
                .add(Instance::with_weight(vec![class, class], 0.4))
                .unwrap();
        }
        let split = selector(vec![1.0, 1.0])
            .select_model(&weighted, &weighted)
            .unwrap();
        assert_eq!(split.kind(), &SplitKind::NoSplit);
    }

    #[test]
    fn missing_weight_is_folded_into_the_winner() {
        let attributes = vec![
            Attribute::nominal("color", &["red", "blue"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 1).unwrap();
        for _ in 0..6 {
            data.add(Instance::new(vec![0.0, 0.0])).unwrap();
        }
        for _ in 0..4 {
            data.add(Instance::new(vec![1.0, 1.0])).unwrap();
        }
        for _ in 0..2 {
            data.add(Instance::new(vec![VALUE_TYPE_UNKNOWN, 0.0])).unwrap();
        }

        let split = selector(vec![1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(split.att_index(), Some(0));

        // after redistribution the stored distribution covers the whole node
        let d = split.distribution();
        assert!((d.total() - data.sum_of_weights()).abs() < 1e-9);
        assert!((d.per_bag(0) + d.per_bag(1) - d.total()).abs() < 1e-9);
        // the two missing units go 6/10 left and 4/10 right
        assert!((d.per_bag(0) - 7.2).abs() < 1e-9);
        assert!((d.per_bag(1) - 4.8).abs() < 1e-9);
    }

    #[test]
    fn numeric_threshold_is_snapped_against_the_training_set() {
        let attributes = vec![
            Attribute::numeric("x"),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut node = Dataset::new(attributes.clone(), 1).unwrap();
        for i in 1..=10 {
            let class = if i <= 5 { 0.0 } else { 1.0 };
            node.add(Instance::new(vec![i as f64, class])).unwrap();
        }
        // the full training set carries a value between the node's 5 and 6
        let mut all_data = Dataset::new(attributes, 1).unwrap();
        for instance in node.instances() {
            all_data.add(instance.clone()).unwrap();
        }
        all_data.add(Instance::new(vec![5.4, 0.0])).unwrap();

        let split = selector(vec![1.0, 1.0])
            .select_model(&node, &all_data)
            .unwrap();
        assert_eq!(split.att_index(), Some(0));
        // the midpoint 5.5 re-snaps onto the closest observed value below it
        assert_eq!(split.threshold(), Some(5.4));
        assert!((split.info_gain() - 0.7192645).abs() < 1e-6);
    }

    #[test]
    fn binary_mode_selects_a_bipartition() {
        let attributes = vec![
            Attribute::nominal("group", &["v0", "v1", "v2"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 1).unwrap();
        for _ in 0..4 {
            data.add(Instance::new(vec![0.0, 0.0])).unwrap();
            data.add(Instance::new(vec![1.0, 0.0])).unwrap();
            data.add(Instance::new(vec![2.0, 1.0])).unwrap();
        }

        let weights = AttributeWeights::uniform(data.num_attributes());
        let selector = ModelSelector::new(2, SplitMode::Binary, weights).unwrap();
        let split = selector.select_model(&data, &data).unwrap();

        assert_eq!(split.att_index(), Some(0));
        assert_eq!(split.num_branches(), 2);
        assert_eq!(
            split.kind(),
            &SplitKind::NominalBinary {
                left_values: vec![true, true, false]
            }
        );
    }

    #[test]
    fn identifier_attribute_cannot_split() {
        // a pseudo-identifier puts one instance in each branch and never
        // carries the minimum weight twice
        let attributes = vec![
            Attribute::nominal(
                "id",
                &["i0", "i1", "i2", "i3", "i4", "i5", "i6", "i7", "i8", "i9"],
            ),
            Attribute::nominal("color", &["red", "blue"]),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 2).unwrap();
        for i in 0..10 {
            let class = if i < 6 { 0.0 } else { 1.0 };
            data.add(Instance::new(vec![i as f64, class, class])).unwrap();
        }
        let split = selector(vec![1.0, 1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();
        assert_eq!(split.att_index(), Some(1));

        // with the identifier as the only attribute nothing can split
        let attributes = vec![
            Attribute::nominal(
                "id",
                &["i0", "i1", "i2", "i3", "i4", "i5", "i6", "i7", "i8", "i9"],
            ),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut lone = Dataset::new(attributes, 1).unwrap();
        for i in 0..10 {
            let class = if i < 6 { 0.0 } else { 1.0 };
            lone.add(Instance::new(vec![i as f64, class])).unwrap();
        }
        let split = selector(vec![1.0, 1.0])
            .select_model(&lone, &lone)
            .unwrap();
        assert_eq!(split.kind(), &SplitKind::NoSplit);
    }

    #[test]
    fn selector_construction_is_validated() {
        let data = perfect_nominal();
        assert!(ModelSelector::new(0, SplitMode::Multiway, AttributeWeights::uniform(2)).is_err());
        assert!(AttributeWeights::from_vec(vec![1.2, 1.0]).is_err());

        // a weight vector of the wrong length never reaches the scan
        let short = ModelSelector::new(2, SplitMode::Multiway, AttributeWeights::uniform(1))
            .unwrap();
        assert!(short.select_model(&data, &data).is_err());
    }

    #[test]
    fn split_candidate_serde_round_trip() {
        let attributes = vec![
            Attribute::numeric("x"),
            Attribute::nominal("label", &["a", "b"]),
        ];
        let mut data = Dataset::new(attributes, 1).unwrap();
        for i in 1..=10 {
            let class = if i <= 5 { 0.0 } else { 1.0 };
            data.add(Instance::new(vec![i as f64, class])).unwrap();
        }
        let split = selector(vec![1.0, 1.0])
            .select_model(&data, &data)
            .unwrap();

        let encoded = serde_json::to_string(&split).unwrap();
        let decoded: crate::split::SplitCandidate = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.att_index(), split.att_index());
        assert_eq!(decoded.threshold(), split.threshold());
        assert!((decoded.distribution().total() - split.distribution().total()).abs() < 1e-12);
    }
}
