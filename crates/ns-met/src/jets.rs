//! Vec-backed jet collection.

use ns_core::{JetCollection, LorentzVector};

/// Jets of one event with their loose-ID decisions.
#[derive(Debug, Clone, Default)]
pub struct Jets {
    p4s: Vec<LorentzVector>,
    loose_id: Vec<bool>,
}

impl Jets {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a jet.
    pub fn push(&mut self, p4: LorentzVector, passed_loose_id: bool) {
        self.p4s.push(p4);
        self.loose_id.push(passed_loose_id);
    }

    /// Number of jets.
    pub fn len(&self) -> usize {
        self.p4s.len()
    }

    /// True if there are no jets.
    pub fn is_empty(&self) -> bool {
        self.p4s.is_empty()
    }

    /// Drop all jets, keeping the allocation for the next event.
    pub fn clear(&mut self) {
        self.p4s.clear();
        self.loose_id.clear();
    }
}

impl FromIterator<(LorentzVector, bool)> for Jets {
    fn from_iter<I: IntoIterator<Item = (LorentzVector, bool)>>(iter: I) -> Self {
        let (p4s, loose_id) = iter.into_iter().unzip();
        Self { p4s, loose_id }
    }
}

impl JetCollection for Jets {
    fn p4s(&self) -> &[LorentzVector] {
        &self.p4s
    }

    fn passed_loose_jet_id(&self, index: usize) -> bool {
        self.loose_id.get(index).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_and_clear() {
        let mut jets: Jets = [(LorentzVector::default(), true), (LorentzVector::default(), false)]
            .into_iter()
            .collect();
        assert_eq!(jets.len(), 2);
        assert!(jets.passed_loose_jet_id(0));
        assert!(!jets.passed_loose_jet_id(1));
        assert!(!jets.passed_loose_jet_id(7));
        jets.clear();
        assert!(jets.is_empty());
    }
}
