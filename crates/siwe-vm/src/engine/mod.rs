//! Opcode interpreter and its observers.
//!
//! A [`Parser`] pairs an immutable grammar with callbacks bound by name.
//! Each parse builds a fresh execution record, so a parser can be reused and
//! shared by reference.

mod ast;
mod callbacks;
mod error;
mod parser;
mod state;
mod stats;
mod trace;

#[cfg(test)]
mod parser_tests;
#[cfg(test)]
mod stats_tests;
#[cfg(test)]
mod trace_tests;

pub use ast::{Ast, AstNode, AstRecord, RecordKind};
pub use callbacks::Callback;
pub use error::RuntimeError;
pub use parser::{ParseResult, Parser};
pub use state::{ParseState, Phrase, phrase_text};
pub use stats::{Counts, Stats};
pub use trace::{NoopTracer, PrintTracer, PrintTracerBuilder, Tracer};
