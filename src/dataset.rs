//! This module implements the attribute schema and the weighted instance
//! container that split selection runs on.
//!
//! A [Dataset] holds an ordered collection of [Instance] values sharing one
//! schema. Every attribute slot is stored as a `ValueType`: numeric
//! attributes hold the measurement itself, nominal attributes hold the index
//! of the value label, and a missing value is marked with
//! `VALUE_TYPE_UNKNOWN`. One nominal attribute is designated as the class.
//!
//! Instances are validated when they are added and are never mutated
//! afterwards, so the scanning code can index into them without further
//! checks.
//!
//! # Example
//! ```
//! use wigain::dataset::{Attribute, Dataset, Instance};
//!
//! let attributes = vec![
//!     Attribute::nominal("outlook", &["sunny", "overcast", "rain"]),
//!     Attribute::numeric("humidity"),
//!     Attribute::nominal("play", &["yes", "no"]),
//! ];
//! let mut data = Dataset::new(attributes, 2).unwrap();
//! data.add(Instance::new(vec![0.0, 85.0, 1.0])).unwrap();
//! data.add(Instance::new(vec![2.0, 70.0, 0.0])).unwrap();
//!
//! assert_eq!(data.num_instances(), 2);
//! assert_eq!(data.num_classes(), 2);
//! assert!((data.sum_of_weights() - 2.0).abs() < 1e-9);
//! ```

use serde_derive::{Deserialize, Serialize};

use crate::errors::{Result, WigainError};

/// Declares the storage type for attribute values. Only std::$t types are
/// supported for now.
macro_rules! def_value_type {
    ($t: tt) => {
        pub type ValueType = $t;
        pub const VALUE_TYPE_MAX: ValueType = std::$t::MAX;
        pub const VALUE_TYPE_MIN: ValueType = std::$t::MIN;
        pub const VALUE_TYPE_UNKNOWN: ValueType = VALUE_TYPE_MIN;
    };
}

// use continous variables for attribute storage
def_value_type!(f64);

/// One attribute of the schema. Nominal attributes carry their value labels;
/// the number of labels is the attribute's arity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Attribute {
    /// A nominal attribute with a fixed set of value labels.
    Nominal { name: String, values: Vec<String> },
    /// A numeric attribute.
    Numeric { name: String },
}

impl Attribute {
    /// Build a nominal attribute from a name and its value labels.
    pub fn nominal(name: &str, values: &[&str]) -> Attribute {
        Attribute::Nominal {
            name: name.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Build a numeric attribute from a name.
    pub fn numeric(name: &str) -> Attribute {
        Attribute::Numeric {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Nominal { name, .. } => name,
            Attribute::Numeric { name } => name,
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, Attribute::Nominal { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Numeric { .. })
    }

    /// Number of distinct values of a nominal attribute; 0 for numeric ones.
    pub fn num_values(&self) -> usize {
        match self {
            Attribute::Nominal { values, .. } => values.len(),
            Attribute::Numeric { .. } => 0,
        }
    }
}

/// One weighted data instance.
///
/// The value vector has one slot per schema attribute, the class slot
/// included. Nominal values are stored as their label index cast to
/// `ValueType`, and `VALUE_TYPE_UNKNOWN` marks a missing value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// the vector of attribute values, one slot per schema attribute
    values: Vec<ValueType>,
    /// instance weight, used as a fractional instance count
    weight: ValueType,
}

impl Instance {
    /// Generate an instance with weight 1.0.
    ///
    /// # Example
    /// ``` rust
    /// use wigain::dataset::Instance;
    /// let instance = Instance::new(vec![0.0, 85.0, 1.0]);
    /// assert!((instance.weight() - 1.0).abs() < 1e-9);
    /// ```
    pub fn new(values: Vec<ValueType>) -> Self {
        Instance {
            values,
            weight: 1.0,
        }
    }

    /// Generate an instance with an explicit weight.
    ///
    /// # Example
    /// ``` rust
    /// use wigain::dataset::Instance;
    /// let instance = Instance::with_weight(vec![0.0, 85.0, 1.0], 0.5);
    /// assert!((instance.weight() - 0.5).abs() < 1e-9);
    /// ```
    pub fn with_weight(values: Vec<ValueType>, weight: ValueType) -> Self {
        Instance { values, weight }
    }

    /// The value stored for the given attribute slot.
    pub fn value(&self, index: usize) -> ValueType {
        self.values[index]
    }

    /// Whether the value of the given attribute slot is missing.
    pub fn is_missing(&self, index: usize) -> bool {
        self.values[index] == VALUE_TYPE_UNKNOWN
    }

    pub fn weight(&self) -> ValueType {
        self.weight
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }
}

/// An ordered collection of instances sharing one attribute schema, with one
/// attribute designated as the class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    class_index: usize,
    instances: Vec<Instance>,
}

impl Dataset {
    /// Build an empty dataset from a schema and the index of the class
    /// attribute. The class attribute must be nominal and carry at least one
    /// value label.
    pub fn new(attributes: Vec<Attribute>, class_index: usize) -> Result<Self> {
        if class_index >= attributes.len() {
            return Err(WigainError::InvalidParameter(format!(
                "class index {} is out of range for {} attributes",
                class_index,
                attributes.len()
            )));
        }
        if !attributes[class_index].is_nominal() || attributes[class_index].num_values() == 0 {
            return Err(WigainError::InvalidParameter(format!(
                "class attribute '{}' must be nominal with at least one value",
                attributes[class_index].name()
            )));
        }
        Ok(Dataset {
            attributes,
            class_index,
            instances: Vec::new(),
        })
    }

    /// Add one instance, validating it against the schema: the value vector
    /// must match the attribute count, the weight must be finite and
    /// non-negative, nominal values must be integral label indices in range
    /// (or missing), numeric values must be finite (or missing), and the
    /// class value must be known.
    pub fn add(&mut self, instance: Instance) -> Result<()> {
        if instance.num_values() != self.attributes.len() {
            return Err(WigainError::InvalidParameter(format!(
                "instance has {} values but the schema has {} attributes",
                instance.num_values(),
                self.attributes.len()
            )));
        }
        if !instance.weight().is_finite() || instance.weight() < 0.0 {
            return Err(WigainError::InvalidParameter(format!(
                "instance weight {} must be finite and non-negative",
                instance.weight()
            )));
        }
        for (index, attribute) in self.attributes.iter().enumerate() {
            let value = instance.value(index);
            if value == VALUE_TYPE_UNKNOWN {
                if index == self.class_index {
                    return Err(WigainError::InvalidParameter(
                        "the class value must not be missing".to_string(),
                    ));
                }
                continue;
            }
            if attribute.is_nominal() {
                if value < 0.0
                    || value.fract() != 0.0
                    || (value as usize) >= attribute.num_values()
                {
                    return Err(WigainError::InvalidParameter(format!(
                        "value {} is not a valid index for nominal attribute '{}'",
                        value,
                        attribute.name()
                    )));
                }
            } else if !value.is_finite() {
                return Err(WigainError::InvalidParameter(format!(
                    "value {} of numeric attribute '{}' must be finite",
                    value,
                    attribute.name()
                )));
            }
        }
        self.instances.push(instance);
        Ok(())
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    /// Number of class values.
    pub fn num_classes(&self) -> usize {
        self.attributes[self.class_index].num_values()
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn instance(&self, index: usize) -> &Instance {
        &self.instances[index]
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// The class value of an instance as a label index. Instances are
    /// validated on `add`, so the class value is always known and in range.
    pub fn class_of(&self, instance: &Instance) -> usize {
        instance.value(self.class_index) as usize
    }

    /// Sum of all instance weights. Recomputed on every call, the instance
    /// set may have changed since the last one.
    pub fn sum_of_weights(&self) -> ValueType {
        self.instances.iter().map(|instance| instance.weight()).sum()
    }
}
