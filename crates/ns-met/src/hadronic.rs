//! HT/MHT from a jet collection with configurable jet selection.

use ns_core::{JetCollection, LorentzVector, ParameterBag, Result};

/// Parameter key: minimum jet pt entering HT/MHT.
pub const JET_PT_KEY: &str = "JetPtForMhtAndHt";
/// Parameter key: maximum jet |eta| entering HT/MHT.
pub const JET_ETA_KEY: &str = "JetEtaForMhtAndHt";
/// Parameter key: require loose jet ID for HT/MHT.
pub const LOOSE_ID_KEY: &str = "ApplyJetLooseIDforMhtAndHt";

/// Jet selection used for HT/MHT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HadronicCuts {
    /// Jets with `pt < pt_min` are dropped.
    pub pt_min: f64,
    /// Jets with `|eta| > eta_max` are dropped.
    pub eta_max: f64,
    /// Drop jets failing the collection's loose jet ID.
    pub apply_loose_id: bool,
}

impl HadronicCuts {
    /// Resolve the cuts from a parameter bag. Missing keys are an error.
    pub fn from_params<P: ParameterBag + ?Sized>(params: &P) -> Result<Self> {
        Ok(Self {
            pt_min: params.number(JET_PT_KEY)?,
            eta_max: params.number(JET_ETA_KEY)?,
            apply_loose_id: params.flag(LOOSE_ID_KEY)?,
        })
    }

    /// Whether `jet` enters the sums. `loose_id` is only consulted when the
    /// loose-ID requirement is enabled.
    pub fn accepts(&self, jet: &LorentzVector, loose_id: impl FnOnce() -> bool) -> bool {
        !(jet.pt() < self.pt_min
            || jet.eta().abs() > self.eta_max
            || (self.apply_loose_id && !loose_id()))
    }
}

/// Hadronic activity of one variation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HadronicSums {
    /// Scalar pt sum of selected jets.
    pub ht: f64,
    /// Stored MHT value. This is the `-Σpy` component, not the magnitude of
    /// `(mht_px, mht_py)`; existing consumers read it this way.
    pub mht: f64,
    /// `atan2(-Σpy, -Σpx)`.
    pub mht_phi: f64,
    /// `-Σpx` over selected jets.
    pub mht_px: f64,
    /// `-Σpy` over selected jets.
    pub mht_py: f64,
}

impl HadronicSums {
    /// Accumulate over `jets` in collection order.
    pub fn compute<J: JetCollection + ?Sized>(cuts: &HadronicCuts, jets: &J) -> Self {
        let mut sum_pt = 0.0;
        let mut sum_px = 0.0;
        let mut sum_py = 0.0;

        for (i, jet) in jets.p4s().iter().enumerate() {
            if !cuts.accepts(jet, || jets.passed_loose_jet_id(i)) {
                continue;
            }
            sum_px -= jet.px();
            sum_py -= jet.py();
            sum_pt += jet.pt();
        }

        Self { ht: sum_pt, mht: sum_py, mht_phi: sum_py.atan2(sum_px), mht_px: sum_px, mht_py: sum_py }
    }

    /// Magnitude of the missing hadronic transverse momentum vector.
    pub fn mht_magnitude(&self) -> f64 {
        self.mht_px.hypot(self.mht_py)
    }
}
