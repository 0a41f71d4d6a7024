//! Configuration: selection parameter bag and store setup.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use ns_core::{Error, ParameterBag, Result};
use serde::{Deserialize, Serialize};

use crate::variation::NOMINAL_NAME;

/// Named selection parameters, split into numeric and boolean maps.
///
/// ```
/// use ns_met::SelectionParams;
/// use ns_core::ParameterBag;
///
/// let p = SelectionParams::from_json_str(
///     r#"{"numbers": {"JetPtForMhtAndHt": 30.0}, "flags": {"ApplyJetLooseIDforMhtAndHt": true}}"#,
/// ).unwrap();
/// assert_eq!(p.number("JetPtForMhtAndHt").unwrap(), 30.0);
/// assert!(p.flag("ApplyJetLooseIDforMhtAndHt").unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionParams {
    /// Numeric parameters.
    #[serde(default)]
    pub numbers: BTreeMap<String, f64>,
    /// Boolean parameters.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl SelectionParams {
    /// Empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a numeric parameter.
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.numbers.insert(key.into(), value);
        self
    }

    /// Set a boolean parameter.
    pub fn with_flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.flags.insert(key.into(), value);
        self
    }

    /// Parse from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read and parse a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}

impl ParameterBag for SelectionParams {
    fn number(&self, key: &str) -> Result<f64> {
        self.numbers.get(key).copied().ok_or_else(|| Error::MissingParameter(key.to_string()))
    }

    fn flag(&self, key: &str) -> Result<bool> {
        self.flags.get(key).copied().ok_or_else(|| Error::MissingParameter(key.to_string()))
    }
}

/// Leaf prefix and ordered variation names for a [`crate::MetStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetConfig {
    /// Leaf-name prefix (e.g. `"Met"` for `Met_px`).
    pub prefix: String,
    /// Ordered, duplicate-free variation names.
    pub variations: Vec<String>,
}

impl Default for MetConfig {
    fn default() -> Self {
        Self { prefix: "Met".into(), variations: vec![NOMINAL_NAME.into()] }
    }
}

impl MetConfig {
    /// Create a config.
    pub fn new(prefix: impl Into<String>, variations: Vec<String>) -> Self {
        Self { prefix: prefix.into(), variations }
    }

    /// Parse from JSON and validate.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check prefix and variation names.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(Error::Validation("MET leaf prefix must not be empty".into()));
        }
        if self.variations.is_empty() {
            return Err(Error::Validation("at least one variation name is required".into()));
        }
        let mut seen = HashSet::with_capacity(self.variations.len());
        for name in &self.variations {
            if !seen.insert(name.as_str()) {
                return Err(Error::Validation(format!("duplicate variation name '{name}'")));
            }
        }
        Ok(())
    }
}
