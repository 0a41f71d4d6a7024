//! # ns-core
//!
//! Shared error type, kinematic value types and collaborator traits for
//! NextStat event processing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::{EventSource, JetCollection, LeafId, ParameterBag};
pub use types::LorentzVector;
