#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Parser engine for SABNF grammars.
//!
//! Executes a [`siwe_bytecode::Grammar`] against text, dispatching semantic
//! callbacks around rule matches and reporting to optional observers
//! (line trace, AST, statistics).

pub mod engine;

pub use engine::{
    Ast, AstNode, AstRecord, Callback, Counts, NoopTracer, ParseResult, ParseState, Parser,
    Phrase, PrintTracer, PrintTracerBuilder, RecordKind, RuntimeError, Stats, Tracer,
    phrase_text,
};
