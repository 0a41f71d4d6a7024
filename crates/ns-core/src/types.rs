//! Common data types for NextStat

use serde::{Deserialize, Serialize};

/// Pseudorapidity reported for a vector along the beam axis.
const BEAM_AXIS_ETA: f64 = 10e10;

/// Four-momentum `(px, py, pz, E)`.
///
/// Conventions follow ROOT's `TLorentzVector`: `phi()` of a null transverse
/// vector is `0`, and `eta()` along the beam axis is `±1e11`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LorentzVector {
    /// x component of the momentum.
    pub px: f64,
    /// y component of the momentum.
    pub py: f64,
    /// z component of the momentum.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl LorentzVector {
    /// Create from Cartesian components.
    pub fn from_px_py_pz_e(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Create from collider coordinates. A negative `pt` is taken by magnitude.
    pub fn from_pt_eta_phi_e(pt: f64, eta: f64, phi: f64, e: f64) -> Self {
        let apt = pt.abs();
        Self { px: apt * phi.cos(), py: apt * phi.sin(), pz: apt * eta.sinh(), e }
    }

    /// Massless vector confined to the transverse plane: `(pt, eta=0, phi, E=pt)`.
    pub fn transverse(pt: f64, phi: f64) -> Self {
        Self::from_pt_eta_phi_e(pt, 0.0, phi, pt)
    }

    /// x component.
    #[inline]
    pub fn px(&self) -> f64 {
        self.px
    }

    /// y component.
    #[inline]
    pub fn py(&self) -> f64 {
        self.py
    }

    /// z component.
    #[inline]
    pub fn pz(&self) -> f64 {
        self.pz
    }

    /// Energy component.
    #[inline]
    pub fn energy(&self) -> f64 {
        self.e
    }

    /// Transverse momentum.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Azimuthal angle in `(-π, π]`.
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 { 0.0 } else { self.py.atan2(self.px) }
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f64 {
        let p = self.p();
        let cos_theta = if p == 0.0 { 1.0 } else { self.pz / p };
        if cos_theta * cos_theta < 1.0 {
            return -0.5 * ((1.0 - cos_theta) / (1.0 + cos_theta)).ln();
        }
        if self.pz == 0.0 {
            0.0
        } else if self.pz > 0.0 {
            BEAM_AXIS_ETA
        } else {
            -BEAM_AXIS_ETA
        }
    }

    /// Invariant mass; negative for space-like vectors.
    pub fn mass(&self) -> f64 {
        let m2 = self.e * self.e - self.p() * self.p();
        if m2 < 0.0 { -(-m2).sqrt() } else { m2.sqrt() }
    }

    /// Shift the transverse momentum by `(dx, dy)` and recompute the energy from
    /// the shifted transverse components only. `pz` is carried unchanged.
    pub fn shifted_transverse(&self, dx: f64, dy: f64) -> Self {
        let px = self.px + dx;
        let py = self.py + dy;
        Self { px, py, pz: self.pz, e: px.hypot(py) }
    }
}
