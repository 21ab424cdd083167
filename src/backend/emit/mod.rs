//! Emit JavaScript from a resolved program.
//!
//! This module defines the [`Emitter`] entry point and wires together the submodules that implement model → JavaScript
//! emission. The rendering itself lives in [`blocks`]; `mod.rs` only re-exports.
//!
//! ## Notes
//! - Emission never touches the filesystem. It produces [`OutputUnit`]s that the output stage partitions and writes.
//! - All mutable state of a run lives in one [`EmissionContext`], passed explicitly to every block.
//!
//! ## See also
//! - [`program`]: unit planning and the per-type failure policy
//! - [`blocks`]: type, member, statement and expression blocks
//! - [`comments`]: documentation-comment decoration
//! - [`declarations`]: TypeScript declaration text
//! - [`context`]: output buffer, temporaries and diagnostic cursor

#![deny(clippy::unwrap_used)]

pub mod blocks;
pub mod comments;
mod context;
mod declarations;
mod errors;
mod program;
mod resolver;
mod writer;

pub use context::{EmissionContext, EmitOptions};
pub use declarations::render_declarations;
pub use errors::{DocumentationFault, EmissionFault, EmissionFaults, EmitFailure, ListenerFault};
pub use program::{EmissionOutput, Emitter, NoObserver, OutputUnit, UnitKey, UnitObserver};
pub use resolver::{ProgramResolver, Resolver};
