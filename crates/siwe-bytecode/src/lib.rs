#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grammar tables executed by the SIWE parser engine.
//!
//! This crate contains:
//! - The opcode set (`Opcode`) and index newtypes (`RuleId`, `UdtId`, `OpIndex`)
//! - The validated, immutable `Grammar` with case-insensitive name lookup
//! - `GrammarBuilder` and the `expr` constructors for writing grammars in Rust
//! - A human-readable `dump` of rules and opcodes

pub mod builder;
pub mod dump;
mod grammar;
mod ids;
mod opcode;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod dump_tests;

pub use builder::{Expr, GrammarBuilder};
pub use dump::{dump, dump_rule};
pub use grammar::{Grammar, GrammarError, Rule, Symbol, Udt};
pub use ids::{OpIndex, RuleId, UdtId};
pub use opcode::Opcode;
