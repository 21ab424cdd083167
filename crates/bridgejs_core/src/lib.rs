//! Provide the target-language vocabulary shared by the bridgejs emitter and its tooling.
//!
//! This crate is intentionally small and dependency-free. It contains:
//! - JavaScript reserved words and identifier escaping,
//! - operator spellings and precedence for emitted JavaScript,
//! - the mapping of well-known source-language (CLR) types onto JavaScript / TypeScript,
//! - intrinsic member mappings (`System.Console.WriteLine` → `console.log`),
//! - runtime conventions of the generated code (`Bridge.define`, file header, suffixes).
//!
//! ## Notes
//!
//! - This is a vocabulary crate: **no IO**, no global state, and no model types.

pub mod lang;
