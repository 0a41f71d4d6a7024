//! MET store: raw leaves, per-variation vectors, active selection.

use log::{debug, warn};
use ns_core::{Error, EventSource, JetCollection, LeafId, LorentzVector, ParameterBag, Result};

use crate::config::MetConfig;
use crate::hadronic::{HadronicCuts, HadronicSums};
use crate::variation::{
    MetVector, MomentumDelta, UNCLUSTERED_DOWN_NAME, UNCLUSTERED_UP_NAME, UnclusteredShift,
    Variation, VariationId,
};

/// `(pt, phi)` of a shifted MET read from dedicated leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransverseShift {
    /// Shifted MET magnitude.
    pub pt: f64,
    /// Shifted MET azimuth.
    pub phi: f64,
}

/// Raw MET leaf values of the current event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMet {
    /// x component.
    pub px: f64,
    /// y component.
    pub py: f64,
    /// z component.
    pub pz: f64,
    /// Unclustered-energy up shift, if bound.
    pub uncl_up: TransverseShift,
    /// Unclustered-energy down shift, if bound.
    pub uncl_down: TransverseShift,
}

impl RawMet {
    /// Nominal reconstruction. The energy uses only the transverse components.
    pub fn reconstruct(&self) -> LorentzVector {
        LorentzVector::from_px_py_pz_e(self.px, self.py, self.pz, self.px.hypot(self.py))
    }

    fn shift(&self, shift: UnclusteredShift) -> TransverseShift {
        match shift {
            UnclusteredShift::Up => self.uncl_up,
            UnclusteredShift::Down => self.uncl_down,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ShiftLeaves {
    pt: LeafId,
    phi: LeafId,
}

/// Leaf handles bound at construction.
#[derive(Debug, Clone)]
pub struct MetLeaves {
    prefix: String,
    px: LeafId,
    py: LeafId,
    pz: LeafId,
    uncl_up: Option<ShiftLeaves>,
    uncl_down: Option<ShiftLeaves>,
}

impl MetLeaves {
    /// Leaf-name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether the dedicated unclustered-energy leaves for `shift` are bound.
    pub fn has_unclustered(&self, shift: UnclusteredShift) -> bool {
        match shift {
            UnclusteredShift::Up => self.uncl_up.is_some(),
            UnclusteredShift::Down => self.uncl_down.is_some(),
        }
    }
}

/// Which four-vector the kinematic accessors read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentP4 {
    /// The per-event nominal reconstruction.
    Reconstructed,
    /// A variation's own vector.
    Variation(VariationId),
}

/// MET with systematic variations.
///
/// Per event: [`MetStore::read_entry`] then [`MetStore::init`] (or
/// [`MetStore::next_event`]), then [`MetStore::update`] once per variation of
/// interest, then [`MetStore::set_current`] and the accessors.
#[derive(Debug, Clone)]
pub struct MetStore {
    leaves: MetLeaves,
    raw: RawMet,
    reco: LorentzVector,
    variations: Vec<Variation>,
    current: CurrentP4,
    active: VariationId,
}

impl MetStore {
    /// Bind the MET leaves `<prefix>_px/_py/_pz` and lay out one variation per
    /// name. Names equal to `"orig"` or containing `"Met"` get a vector; the
    /// unclustered-energy variations read their own leaves when the source has
    /// them.
    pub fn new<S: EventSource + ?Sized>(
        source: &mut S,
        prefix: &str,
        names: Vec<String>,
    ) -> Result<Self> {
        let config = MetConfig::new(prefix, names);
        config.validate()?;
        let MetConfig { prefix, variations: names } = config;

        let px = source.bind_leaf(&format!("{prefix}_px"))?;
        let py = source.bind_leaf(&format!("{prefix}_py"))?;
        let pz = source.bind_leaf(&format!("{prefix}_pz"))?;

        let mut variations: Vec<Variation> = names.into_iter().map(Variation::from_name).collect();
        for v in variations.iter().filter(|v| !v.is_applicable()) {
            debug!("variation '{}' does not apply to {prefix}", v.name());
        }

        let uncl_up = bind_unclustered(source, &prefix, &mut variations, UnclusteredShift::Up)?;
        let uncl_down = bind_unclustered(source, &prefix, &mut variations, UnclusteredShift::Down)?;

        Ok(Self {
            leaves: MetLeaves { prefix, px, py, pz, uncl_up, uncl_down },
            raw: RawMet::default(),
            reco: LorentzVector::default(),
            variations,
            current: CurrentP4::Reconstructed,
            active: VariationId::NOMINAL,
        })
    }

    /// Construct from a [`MetConfig`].
    pub fn from_config<S: EventSource + ?Sized>(source: &mut S, config: &MetConfig) -> Result<Self> {
        Self::new(source, &config.prefix, config.variations.clone())
    }

    /// Refresh the raw leaf values from the source's current entry.
    pub fn read_entry<S: EventSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let leaves = &self.leaves;
        self.raw.px = source.read_leaf(leaves.px)?;
        self.raw.py = source.read_leaf(leaves.py)?;
        self.raw.pz = source.read_leaf(leaves.pz)?;
        if let Some(l) = leaves.uncl_up {
            self.raw.uncl_up =
                TransverseShift { pt: source.read_leaf(l.pt)?, phi: source.read_leaf(l.phi)? };
        }
        if let Some(l) = leaves.uncl_down {
            self.raw.uncl_down =
                TransverseShift { pt: source.read_leaf(l.pt)?, phi: source.read_leaf(l.phi)? };
        }
        Ok(())
    }

    /// Per-event reset: rebuild every variation vector from the raw values,
    /// zero all pending deltas and select the nominal reconstruction.
    pub fn init(&mut self) {
        self.reco = self.raw.reconstruct();
        for v in &mut self.variations {
            match v.vector_mut() {
                MetVector::Unclustered(shift, p4) => {
                    let s = self.raw.shift(*shift);
                    *p4 = LorentzVector::transverse(s.pt, s.phi);
                }
                MetVector::Reconstructed(p4) => *p4 = self.reco,
                MetVector::Inapplicable => {}
            }
            v.reset_delta();
        }
        self.current = CurrentP4::Reconstructed;
        self.active = VariationId::NOMINAL;
    }

    /// [`MetStore::read_entry`] followed by [`MetStore::init`].
    pub fn next_event<S: EventSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        self.read_entry(source)?;
        self.init();
        Ok(())
    }

    /// Recompute HT/MHT for `id` from `jets` and fold that variation's pending
    /// delta into its vector. Inapplicable variations are left untouched.
    pub fn update<P, J>(&mut self, params: &P, jets: &J, id: VariationId) -> Result<()>
    where
        P: ParameterBag + ?Sized,
        J: JetCollection + ?Sized,
    {
        let v = self.variation_mut(id)?;
        if !v.is_applicable() {
            return Ok(());
        }
        let cuts = HadronicCuts::from_params(params)?;
        v.finish_update(HadronicSums::compute(&cuts, jets));
        Ok(())
    }

    /// Add a transverse-momentum correction to a variation, applied on its
    /// next [`MetStore::update`].
    pub fn apply_momentum_delta(&mut self, id: VariationId, dx: f64, dy: f64) -> Result<()> {
        self.variation_mut(id)?.apply_momentum_delta(dx, dy);
        Ok(())
    }

    /// Overwrite a variation's vector from collider coordinates.
    pub fn add_pt_eta_phi_e_syst(
        &mut self,
        id: VariationId,
        pt: f64,
        eta: f64,
        phi: f64,
        energy: f64,
    ) -> Result<()> {
        self.variation_mut(id)?.set_p4(LorentzVector::from_pt_eta_phi_e(pt, eta, phi, energy))
    }

    /// Overwrite a variation's vector.
    pub fn add_p4_syst(&mut self, id: VariationId, p4: &LorentzVector) -> Result<()> {
        self.variation_mut(id)?.set_p4(*p4)
    }

    /// Select the variation read by the accessors. Unknown or inapplicable
    /// variations select the nominal one instead.
    pub fn set_current(&mut self, id: VariationId) {
        let applicable = self.variations.get(id.index()).is_some_and(Variation::is_applicable);
        if applicable {
            self.current = CurrentP4::Variation(id);
            self.active = id;
            return;
        }
        debug!("variation {id} has no {} vector, selecting nominal", self.leaves.prefix);
        self.active = VariationId::NOMINAL;
        self.current = match self.variations.first() {
            Some(v) if v.is_applicable() => CurrentP4::Variation(VariationId::NOMINAL),
            _ => CurrentP4::Reconstructed,
        };
    }

    /// Deactivate every leaf under this store's prefix.
    pub fn un_branch<S: EventSource + ?Sized>(&self, source: &mut S) {
        source.deactivate_matching(&format!("{}*", self.leaves.prefix));
    }

    /// Active four-vector.
    pub fn p4(&self) -> &LorentzVector {
        match self.current {
            CurrentP4::Variation(id) => {
                self.variations.get(id.index()).and_then(Variation::p4).unwrap_or(&self.reco)
            }
            CurrentP4::Reconstructed => &self.reco,
        }
    }

    /// Mutable active four-vector.
    pub fn p4_mut(&mut self) -> &mut LorentzVector {
        match self.current {
            CurrentP4::Variation(id) => {
                match self.variations.get_mut(id.index()).and_then(|v| v.vector_mut().p4_mut()) {
                    Some(p4) => p4,
                    None => &mut self.reco,
                }
            }
            CurrentP4::Reconstructed => &mut self.reco,
        }
    }

    /// Active transverse momentum.
    pub fn pt(&self) -> f64 {
        self.p4().pt()
    }

    /// Active x component.
    pub fn px(&self) -> f64 {
        self.p4().px()
    }

    /// Active y component.
    pub fn py(&self) -> f64 {
        self.p4().py()
    }

    /// Active pseudorapidity.
    pub fn eta(&self) -> f64 {
        self.p4().eta()
    }

    /// Active azimuth.
    pub fn phi(&self) -> f64 {
        self.p4().phi()
    }

    /// Active energy.
    pub fn energy(&self) -> f64 {
        self.p4().energy()
    }

    /// HT stored for the active variation.
    pub fn ht(&self) -> f64 {
        self.active_hadronic().ht
    }

    /// MHT stored for the active variation (see [`HadronicSums::mht`]).
    pub fn mht(&self) -> f64 {
        self.active_hadronic().mht
    }

    /// MHT azimuth stored for the active variation.
    pub fn mht_phi(&self) -> f64 {
        self.active_hadronic().mht_phi
    }

    /// Index of the active variation.
    pub fn current_id(&self) -> VariationId {
        self.active
    }

    /// Look up a variation by name.
    pub fn variation_id(&self, name: &str) -> Option<VariationId> {
        self.variations.iter().position(|v| v.name() == name).map(VariationId::new)
    }

    /// Variation record.
    pub fn variation(&self, id: VariationId) -> Option<&Variation> {
        self.variations.get(id.index())
    }

    /// Handles of all variations in configured order.
    pub fn variation_ids(&self) -> impl Iterator<Item = VariationId> + use<> {
        (0..self.variations.len()).map(VariationId::new)
    }

    /// All variations in configured order.
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Number of configured variations.
    pub fn len(&self) -> usize {
        self.variations.len()
    }

    /// False for any constructed store; validation rejects empty name lists.
    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }

    /// Pending delta of a variation.
    pub fn pending_delta(&self, id: VariationId) -> Option<MomentumDelta> {
        self.variation(id).map(Variation::pending_delta)
    }

    /// HT/MHT of a variation from its last update.
    pub fn hadronic(&self, id: VariationId) -> Option<&HadronicSums> {
        self.variation(id).map(Variation::hadronic)
    }

    /// Raw leaf values of the current event.
    pub fn raw(&self) -> &RawMet {
        &self.raw
    }

    /// Nominal reconstruction of the current event.
    pub fn nominal(&self) -> &LorentzVector {
        &self.reco
    }

    /// Bound leaf handles.
    pub fn leaves(&self) -> &MetLeaves {
        &self.leaves
    }

    fn active_hadronic(&self) -> &HadronicSums {
        self.variations[self.active.index()].hadronic()
    }

    fn variation_mut(&mut self, id: VariationId) -> Result<&mut Variation> {
        let n = self.variations.len();
        self.variations
            .get_mut(id.index())
            .ok_or_else(|| Error::UnknownVariation(format!("{id} (store has {n} variations)")))
    }
}

/// Bind the dedicated leaves of an unclustered-energy variation if it is
/// configured and the source provides them.
fn bind_unclustered<S: EventSource + ?Sized>(
    source: &mut S,
    prefix: &str,
    variations: &mut [Variation],
    shift: UnclusteredShift,
) -> Result<Option<ShiftLeaves>> {
    let (name, suffix) = match shift {
        UnclusteredShift::Up => (UNCLUSTERED_UP_NAME, "Up"),
        UnclusteredShift::Down => (UNCLUSTERED_DOWN_NAME, "Down"),
    };
    let Some(v) = variations.iter_mut().find(|v| v.name() == name) else {
        return Ok(None);
    };

    let pt_name = format!("{prefix}_UnclEnshiftedPt{suffix}");
    if !source.has_leaf(&pt_name) {
        warn!("'{name}' requested but '{pt_name}' is missing; using the nominal {prefix} vector");
        return Ok(None);
    }
    let pt = source.bind_leaf(&pt_name)?;
    let phi = source.bind_leaf(&format!("{prefix}_UnclEnshiftedPhi{suffix}"))?;
    v.mark_unclustered(shift);
    debug!("bound {pt_name} for '{name}'");
    Ok(Some(ShiftLeaves { pt, phi }))
}
