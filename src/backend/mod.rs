//! bridgejs backend
//!
//! Turns a resolved program into JavaScript files.
//!
//! The pipeline is:
//! 1. Resolved program → [`emit::Emitter`] → one [`emit::OutputUnit`] per partition key
//! 2. Output units → [`output::partition`] → beautified, minified and declaration files
//! 3. Files → [`output::OutputWriter`] → disk, with stale outputs of the previous run removed
//!
//! ## Module Organization
//!
//! - `emit/` - Block emission
//!   - `blocks/` - Type, member, statement and expression blocks
//!   - `comments/` - Documentation comment decoration
//!   - `context.rs` - Shared emission context
//!   - `declarations.rs` - TypeScript declaration side output
//!   - `program.rs` - Unit planning and the emission run
//! - `output/` - Partitioning, naming, minification and writing

pub mod emit;
pub mod output;
