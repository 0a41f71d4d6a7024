//! # ns-met
//!
//! Missing transverse energy (MET) bookkeeping for NextStat event loops.
//!
//! [`MetStore`] reads the raw MET leaves of an [`EventSource`], keeps one
//! independently owned four-vector per MET-relevant systematic variation,
//! recomputes HT/MHT from a [`JetCollection`] per variation, and exposes the
//! kinematics of whichever variation is currently active.
//!
//! ## Example
//!
//! ```
//! use ns_met::{Jets, MemoryTree, MetStore, SelectionParams, VariationId};
//! use ns_core::LorentzVector;
//!
//! let mut tree = MemoryTree::new()
//!     .with_column("Met_px", vec![10.0]).unwrap()
//!     .with_column("Met_py", vec![0.0]).unwrap()
//!     .with_column("Met_pz", vec![5.0]).unwrap();
//!
//! let mut met = MetStore::new(&mut tree, "Met", vec!["orig".to_string()]).unwrap();
//! met.next_event(&tree).unwrap();
//! assert_eq!(met.energy(), 10.0);
//!
//! let params = SelectionParams::new()
//!     .with_number("JetPtForMhtAndHt", 30.0)
//!     .with_number("JetEtaForMhtAndHt", 2.4)
//!     .with_flag("ApplyJetLooseIDforMhtAndHt", false);
//! let mut jets = Jets::new();
//! jets.push(LorentzVector::from_px_py_pz_e(50.0, 0.0, 5.0, 50.3), true);
//!
//! met.update(&params, &jets, VariationId::NOMINAL).unwrap();
//! assert_eq!(met.ht(), 50.0);
//! ```
//!
//! [`EventSource`]: ns_core::EventSource
//! [`JetCollection`]: ns_core::JetCollection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod hadronic;
pub mod jets;
pub mod memory;
pub mod store;
pub mod variation;

pub use config::{MetConfig, SelectionParams};
pub use hadronic::{HadronicCuts, HadronicSums};
pub use jets::Jets;
pub use memory::MemoryTree;
pub use store::{MetLeaves, MetStore, RawMet, TransverseShift};
pub use variation::{MetVector, MomentumDelta, UnclusteredShift, Variation, VariationId};
