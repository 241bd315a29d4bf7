//! This module implements the config for split selection.
//!

use serde_derive::{Deserialize, Serialize};

/// How nominal attributes are split.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum SplitMode {
    /// One branch per nominal value.
    Multiway,
    /// Two branches over the best bipartition of the nominal values.
    Binary,
}

impl Default for SplitMode {
    fn default() -> Self {
        SplitMode::Multiway
    }
}

pub fn string2mode(s: &str) -> SplitMode {
    match s {
        "Multiway" => SplitMode::Multiway,
        "Binary" => SplitMode::Binary,
        _ => SplitMode::Multiway,
    }
}

pub fn mode2string(m: &SplitMode) -> String {
    match m {
        SplitMode::Multiway => String::from("Multiway"),
        SplitMode::Binary => String::from("Binary"),
    }
}

/// The hyper-parameters of split selection: the minimum instance weight two
/// branches must keep, the nominal split mode, and the user weight list as a
/// `';'`-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub min_instances: usize,
    pub split_mode: SplitMode,
    pub user_weights: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Return a new config with default values (min_instances = 2,
    /// split_mode = Multiway, user_weights = "1")
    ///
    /// # Example
    /// ```
    /// use wigain::config::Config;
    /// let conf = Config::new();
    /// assert_eq!(conf.min_instances, 2);
    /// ```
    pub fn new() -> Config {
        Config {
            min_instances: 2,
            split_mode: SplitMode::Multiway,
            user_weights: String::from("1"),
        }
    }

    pub fn set_min_instances(&mut self, n: usize) {
        self.min_instances = n;
    }

    pub fn set_split_mode(&mut self, mode: SplitMode) {
        self.split_mode = mode;
    }

    pub fn set_user_weights(&mut self, weights: &str) {
        self.user_weights = weights.to_string();
    }

    /// Transform the config to a human readable string.
    /// # Example
    /// ```
    /// use wigain::config::Config;
    /// let conf = Config::new();
    /// println!("{}", conf.to_string());
    /// ```
    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!("min instances = {}\n", self.min_instances));
        s.push_str(&format!(
            "split mode = {}\n",
            mode2string(&self.split_mode)
        ));
        s.push_str(&format!("user weights = {}\n", self.user_weights));
        s
    }
}
