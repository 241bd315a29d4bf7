//! This module implements the per-attribute user weights that scale the
//! information gain during split selection.
//!
//! The vector carries one weight per attribute position, the class slot
//! included (its entry is never read). Every weight must lie in the range
//! 0..1 inclusive; 1.0 leaves an attribute's gain untouched and 0.0 removes
//! it from the gain comparison entirely. The vector is fixed for the
//! lifetime of one tree-building run.

use serde_derive::{Deserialize, Serialize};

use crate::errors::{Result, WigainError};

/// A validated vector of per-attribute weights in the range 0..1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeWeights {
    weights: Vec<f64>,
}

impl AttributeWeights {
    /// All-ones weights: every attribute's gain is left untouched.
    pub fn uniform(num_attributes: usize) -> Self {
        AttributeWeights {
            weights: vec![1.0; num_attributes],
        }
    }

    /// Build from an explicit vector, rejecting any entry outside 0..1.
    ///
    /// # Example
    /// ``` rust
    /// use wigain::weights::AttributeWeights;
    /// let weights = AttributeWeights::from_vec(vec![0.5, 1.0, 0.0]).unwrap();
    /// assert!((weights.get(0) - 0.5).abs() < 1e-9);
    /// assert!(AttributeWeights::from_vec(vec![1.5]).is_err());
    /// ```
    pub fn from_vec(weights: Vec<f64>) -> Result<Self> {
        for &weight in &weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(WigainError::InvalidWeight(weight));
            }
        }
        Ok(AttributeWeights { weights })
    }

    /// Parse a `';'`-separated list of weights, one per attribute in schema
    /// order. Fewer entries than attributes leave the remaining attributes at
    /// weight 1.0; entries beyond the attribute count are ignored.
    ///
    /// # Example
    /// ``` rust
    /// use wigain::weights::AttributeWeights;
    /// let weights = AttributeWeights::parse("0.5;0.25", 4).unwrap();
    /// assert!((weights.get(0) - 0.5).abs() < 1e-9);
    /// assert!((weights.get(1) - 0.25).abs() < 1e-9);
    /// assert!((weights.get(2) - 1.0).abs() < 1e-9);
    /// assert!((weights.get(3) - 1.0).abs() < 1e-9);
    /// ```
    pub fn parse(spec: &str, num_attributes: usize) -> Result<Self> {
        let mut tokens = spec.split(';').map(str::trim).filter(|t| !t.is_empty());
        let mut weights = Vec::with_capacity(num_attributes);
        for _ in 0..num_attributes {
            match tokens.next() {
                Some(token) => {
                    let weight: f64 = token.parse()?;
                    if !(0.0..=1.0).contains(&weight) {
                        return Err(WigainError::InvalidWeight(weight));
                    }
                    weights.push(weight);
                }
                None => weights.push(1.0),
            }
        }
        Ok(AttributeWeights { weights })
    }

    /// The weight of the attribute at `index`.
    pub fn get(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
