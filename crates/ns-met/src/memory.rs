//! In-memory columnar [`EventSource`] with a per-entry cursor.

use std::collections::HashMap;

use ns_core::{Error, EventSource, LeafId, Result};

/// Scalar leaves held as columns, read one entry at a time.
///
/// Leaves start inactive; binding activates them and
/// [`EventSource::deactivate_matching`] turns them off again.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    active: Vec<bool>,
    name_to_index: HashMap<String, usize>,
    entry: usize,
}

impl MemoryTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a column. All columns must have the same length.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        let expected =
            self.names.iter().zip(&self.columns).find(|(n, _)| **n != name).map(|(_, c)| c.len());
        if let Some(n) = expected
            && n != values.len()
        {
            return Err(Error::Validation(format!(
                "column length mismatch for '{name}': expected {n}, got {}",
                values.len()
            )));
        }
        match self.name_to_index.get(&name) {
            Some(&i) => self.columns[i] = values,
            None => {
                self.name_to_index.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.columns.push(values);
                self.active.push(false);
            }
        }
        Ok(self)
    }

    /// Number of entries.
    pub fn entries(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// Current entry index.
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// Move the cursor to `entry`.
    pub fn set_entry(&mut self, entry: usize) -> Result<()> {
        if entry >= self.entries() {
            return Err(Error::Validation(format!(
                "entry {entry} out of range (entries={})",
                self.entries()
            )));
        }
        self.entry = entry;
        Ok(())
    }

    /// Whether a leaf is currently active.
    pub fn is_active(&self, name: &str) -> bool {
        self.name_to_index.get(name).is_some_and(|&i| self.active[i])
    }

    /// All leaf names in insertion order.
    pub fn leaf_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }
}

impl EventSource for MemoryTree {
    fn has_leaf(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    fn bind_leaf(&mut self, name: &str) -> Result<LeafId> {
        let &i =
            self.name_to_index.get(name).ok_or_else(|| Error::MissingLeaf(name.to_string()))?;
        self.active[i] = true;
        Ok(LeafId(i))
    }

    fn read_leaf(&self, leaf: LeafId) -> Result<f64> {
        let i = leaf.0;
        let name = self
            .names
            .get(i)
            .ok_or_else(|| Error::Validation(format!("leaf handle {i} out of range")))?;
        if !self.active[i] {
            return Err(Error::InactiveLeaf(name.clone()));
        }
        self.columns[i].get(self.entry).copied().ok_or_else(|| {
            Error::Validation(format!("entry {} out of range for leaf '{name}'", self.entry))
        })
    }

    fn deactivate_matching(&mut self, pattern: &str) {
        for (name, active) in self.names.iter().zip(self.active.iter_mut()) {
            if wildcard_match(pattern, name) {
                *active = false;
            }
        }
    }
}

/// Glob-style match where `*` stands for any run of characters.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p = pattern.as_bytes();
    let n = name.as_bytes();
    let (mut pi, mut ni) = (0usize, 0usize);
    // Position of the last `*` in the pattern and the name index it was tried at.
    let mut star: Option<(usize, usize)> = None;

    while ni < n.len() {
        if pi < p.len() && p[pi] == b'*' {
            star = Some((pi, ni));
            pi += 1;
        } else if pi < p.len() && p[pi] == n[ni] {
            pi += 1;
            ni += 1;
        } else if let Some((sp, sn)) = star {
            pi = sp + 1;
            ni = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|&c| c == b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> MemoryTree {
        MemoryTree::new()
            .with_column("Met_px", vec![1.0, 2.0])
            .unwrap()
            .with_column("Met_py", vec![3.0, 4.0])
            .unwrap()
            .with_column("Jet_pt", vec![5.0, 6.0])
            .unwrap()
    }

    #[test]
    fn test_bind_and_read() {
        let mut t = tree();
        assert_eq!(t.leaf_names(), vec!["Met_px", "Met_py", "Jet_pt"]);
        assert_eq!(t.entries(), 2);
        let px = t.bind_leaf("Met_px").unwrap();
        assert_eq!(t.read_leaf(px).unwrap(), 1.0);
        t.set_entry(1).unwrap();
        assert_eq!(t.read_leaf(px).unwrap(), 2.0);
        assert!(t.set_entry(2).is_err());
    }

    #[test]
    fn test_missing_and_inactive() {
        let mut t = tree();
        assert!(matches!(t.bind_leaf("Met_pz"), Err(Error::MissingLeaf(n)) if n == "Met_pz"));
        let py = t.bind_leaf("Met_py").unwrap();
        let jet = t.bind_leaf("Jet_pt").unwrap();
        t.deactivate_matching("Met*");
        assert!(matches!(t.read_leaf(py), Err(Error::InactiveLeaf(_))));
        assert!(!t.is_active("Met_px"));
        assert_eq!(t.read_leaf(jet).unwrap(), 5.0);
    }

    #[test]
    fn test_length_mismatch() {
        let err = tree().with_column("Met_pz", vec![0.0]).unwrap_err();
        assert!(err.to_string().contains("column length mismatch"));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("Met*", "Met_px"));
        assert!(wildcard_match("Met*", "Met"));
        assert!(wildcard_match("*_px", "Met_px"));
        assert!(wildcard_match("M*_p*", "Met_px"));
        assert!(wildcard_match("Met_px", "Met_px"));
        assert!(!wildcard_match("Met*", "Jet_pt"));
        assert!(!wildcard_match("Met_px", "Met_py"));
        assert!(!wildcard_match("*x", "Met_py"));
    }
}
