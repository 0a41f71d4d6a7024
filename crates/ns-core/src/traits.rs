//! Core traits for NextStat
//!
//! These traits are the seams between event bookkeeping (ns-met) and the
//! concrete readers, object collections and configuration that feed it.

use crate::{LorentzVector, Result};

/// Handle to a leaf bound on an [`EventSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafId(pub usize);

/// Per-entry scalar leaf provider (a TTree-like reader).
pub trait EventSource {
    /// Whether a leaf with this exact name exists.
    fn has_leaf(&self, name: &str) -> bool;

    /// Activate a leaf for reading and return a handle to its per-entry value.
    ///
    /// Fails with [`crate::Error::MissingLeaf`] if the leaf does not exist.
    fn bind_leaf(&mut self, name: &str) -> Result<LeafId>;

    /// Value of a bound leaf at the current entry.
    fn read_leaf(&self, leaf: LeafId) -> Result<f64>;

    /// Deactivate every leaf whose name matches `pattern` (`*` is a wildcard).
    fn deactivate_matching(&mut self, pattern: &str);
}

/// Ordered collection of jets for one event.
pub trait JetCollection {
    /// Jet four-vectors in a stable order.
    fn p4s(&self) -> &[LorentzVector];

    /// Loose jet-ID decision for the jet at `index`.
    fn passed_loose_jet_id(&self, index: usize) -> bool;
}

/// Named selection parameters.
pub trait ParameterBag {
    /// Numeric parameter lookup.
    fn number(&self, key: &str) -> Result<f64>;

    /// Boolean parameter lookup.
    fn flag(&self, key: &str) -> Result<bool>;
}
