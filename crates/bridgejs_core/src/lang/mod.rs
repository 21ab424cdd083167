//! Target vocabulary registries.
//!
//! Callers work with stable IDs (e.g. [`operators::OperatorId`], [`types::ClrTypeId`]) and look up spellings and
//! metadata via registry tables instead of scattering string comparisons across the emitter.
//!
//! ## Examples
//! ```rust
//! use bridgejs_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::as_str(OperatorId::StrictEq), "===");
//! assert_eq!(operators::from_str("==="), Some(OperatorId::StrictEq));
//! ```

pub mod conventions;
pub mod intrinsics;
pub mod keywords;
pub mod operators;
pub mod types;
