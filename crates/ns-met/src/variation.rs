//! Per-variation MET state.

use ns_core::{Error, LorentzVector, Result};

use crate::hadronic::HadronicSums;

/// Name of the nominal (unvaried) variation.
pub const NOMINAL_NAME: &str = "orig";
/// Substring marking a variation as relevant to MET.
pub const MET_MARKER: &str = "Met";
/// Unclustered-energy up shift.
pub const UNCLUSTERED_UP_NAME: &str = "Met_Uncl_Up";
/// Unclustered-energy down shift.
pub const UNCLUSTERED_DOWN_NAME: &str = "Met_Uncl_Down";

/// Position of a variation in the store's configured name list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariationId(usize);

impl VariationId {
    /// The first configured variation, used as the fallback selection.
    pub const NOMINAL: VariationId = VariationId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Ordinal index in the configured name list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VariationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Direction of the unclustered-energy shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnclusteredShift {
    /// +1σ.
    Up,
    /// −1σ.
    Down,
}

/// Transverse-momentum correction accumulated for a variation within one event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MomentumDelta {
    /// Correction to `px`.
    pub dx: f64,
    /// Correction to `py`.
    pub dy: f64,
}

impl MomentumDelta {
    /// True if both components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// MET four-vector carried by a variation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetVector {
    /// The variation does not affect MET; there is no vector.
    Inapplicable,
    /// Copied from the nominal reconstruction every event.
    Reconstructed(LorentzVector),
    /// Built from the dedicated unclustered-energy leaves every event.
    Unclustered(UnclusteredShift, LorentzVector),
}

impl MetVector {
    /// The four-vector, if any.
    pub fn p4(&self) -> Option<&LorentzVector> {
        match self {
            MetVector::Inapplicable => None,
            MetVector::Reconstructed(p4) | MetVector::Unclustered(_, p4) => Some(p4),
        }
    }

    /// Mutable four-vector, if any.
    pub fn p4_mut(&mut self) -> Option<&mut LorentzVector> {
        match self {
            MetVector::Inapplicable => None,
            MetVector::Reconstructed(p4) | MetVector::Unclustered(_, p4) => Some(p4),
        }
    }
}

/// One named systematic variation and everything tracked for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Variation {
    name: String,
    vector: MetVector,
    delta: MomentumDelta,
    hadronic: HadronicSums,
}

impl Variation {
    /// A variation with a vector if `name` is the nominal marker or contains
    /// the MET marker, otherwise an inapplicable one.
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let vector = if name == NOMINAL_NAME || name.contains(MET_MARKER) {
            MetVector::Reconstructed(LorentzVector::default())
        } else {
            MetVector::Inapplicable
        };
        Self { name, vector, delta: MomentumDelta::default(), hadronic: HadronicSums::default() }
    }

    /// Variation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this variation carries a MET four-vector.
    pub fn is_applicable(&self) -> bool {
        !matches!(self.vector, MetVector::Inapplicable)
    }

    /// The MET vector slot.
    pub fn vector(&self) -> &MetVector {
        &self.vector
    }

    /// The four-vector, if applicable.
    pub fn p4(&self) -> Option<&LorentzVector> {
        self.vector.p4()
    }

    /// Correction waiting to be folded in by the next HT/MHT update.
    pub fn pending_delta(&self) -> MomentumDelta {
        self.delta
    }

    /// HT/MHT from the last update of this variation.
    pub fn hadronic(&self) -> &HadronicSums {
        &self.hadronic
    }

    /// Add a transverse-momentum correction. Corrections accumulate until the
    /// next per-event reset and are applied to the vector on update.
    pub fn apply_momentum_delta(&mut self, dx: f64, dy: f64) {
        self.delta.dx += dx;
        self.delta.dy += dy;
    }

    /// Overwrite the four-vector.
    pub fn set_p4(&mut self, p4: LorentzVector) -> Result<()> {
        match self.vector.p4_mut() {
            Some(slot) => {
                *slot = p4;
                Ok(())
            }
            None => Err(Error::InapplicableVariation(self.name.clone())),
        }
    }

    pub(crate) fn mark_unclustered(&mut self, shift: UnclusteredShift) {
        self.vector = MetVector::Unclustered(shift, LorentzVector::default());
    }

    pub(crate) fn vector_mut(&mut self) -> &mut MetVector {
        &mut self.vector
    }

    pub(crate) fn reset_delta(&mut self) {
        self.delta = MomentumDelta::default();
    }

    /// Store fresh sums and fold the pending delta into the vector.
    pub(crate) fn finish_update(&mut self, sums: HadronicSums) {
        self.hadronic = sums;
        let delta = self.delta;
        if let Some(p4) = self.vector.p4_mut() {
            *p4 = p4.shifted_transverse(delta.dx, delta.dy);
        }
    }
}
