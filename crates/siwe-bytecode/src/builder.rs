//! Typed construction of grammars.
//!
//! Rules are written as [`Expr`] trees using the constructor functions in this
//! module, then flattened by [`GrammarBuilder::build`] into per-rule opcode
//! lists with names resolved to indices.
//!
//! ```
//! use siwe_bytecode::builder::*;
//!
//! // digits = 1*%d48-57 ["." 1*%d48-57]
//! let grammar = GrammarBuilder::new()
//!     .rule("digits", cat([plus(rng(48, 57)), opt(cat([tbs("."), plus(rng(48, 57))]))]))
//!     .build()
//!     .unwrap();
//! assert!(grammar.rule_id("DIGITS").is_some());
//! ```

use std::collections::HashMap;

use super::grammar::{Grammar, GrammarError, Symbol};
use super::ids::{OpIndex, RuleId, UdtId};
use super::opcode::Opcode;

/// Grammar expression prior to flattening. Names are unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Alt(Vec<Expr>),
    Cat(Vec<Expr>),
    Rep {
        min: u32,
        max: Option<u32>,
        expr: Box<Expr>,
    },
    Rnm(String),
    Trg(u32, u32),
    Tbs(String),
    Tls(String),
    Udt(String),
    And(Box<Expr>),
    Not(Box<Expr>),
}

pub fn alt(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Alt(items.into_iter().collect())
}

pub fn cat(items: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Cat(items.into_iter().collect())
}

/// `min*max expr`
pub fn rep(min: u32, max: u32, expr: Expr) -> Expr {
    Expr::Rep {
        min,
        max: Some(max),
        expr: Box::new(expr),
    }
}

/// `min*expr`
pub fn rep_min(min: u32, expr: Expr) -> Expr {
    Expr::Rep {
        min,
        max: None,
        expr: Box::new(expr),
    }
}

/// `[expr]`
pub fn opt(expr: Expr) -> Expr {
    rep(0, 1, expr)
}

/// `*expr`
pub fn star(expr: Expr) -> Expr {
    rep_min(0, expr)
}

/// `1*expr`
pub fn plus(expr: Expr) -> Expr {
    rep_min(1, expr)
}

pub fn rnm(name: impl Into<String>) -> Expr {
    Expr::Rnm(name.into())
}

pub fn udt(name: impl Into<String>) -> Expr {
    Expr::Udt(name.into())
}

/// `%dmin-max`
pub fn rng(min: u32, max: u32) -> Expr {
    Expr::Trg(min, max)
}

/// `%dcode`
pub fn ch(code: u32) -> Expr {
    Expr::Trg(code, code)
}

/// `%s"literal"`
pub fn tbs(literal: impl Into<String>) -> Expr {
    Expr::Tbs(literal.into())
}

/// `"literal"`
pub fn tls(literal: impl Into<String>) -> Expr {
    Expr::Tls(literal.into())
}

/// `&expr`
pub fn and(expr: Expr) -> Expr {
    Expr::And(Box::new(expr))
}

/// `!expr`
pub fn not(expr: Expr) -> Expr {
    Expr::Not(Box::new(expr))
}

/// Collects rules and UDTs, then flattens them into a [`Grammar`].
#[derive(Clone, Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<(String, Expr)>,
    udts: Vec<(String, bool)>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.rules.push((name.into(), expr));
        self
    }

    pub fn udt(mut self, name: impl Into<String>, accepts_empty: bool) -> Self {
        self.udts.push((name.into(), accepts_empty));
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut symbols = HashMap::new();
        for (i, (name, _)) in self.rules.iter().enumerate() {
            let prev = symbols.insert(name.to_ascii_lowercase(), Symbol::Rule(RuleId(i as u32)));
            if prev.is_some() {
                return Err(GrammarError::DuplicateName(name.clone()));
            }
        }
        for (i, (name, _)) in self.udts.iter().enumerate() {
            let prev = symbols.insert(name.to_ascii_lowercase(), Symbol::Udt(UdtId(i as u32)));
            if prev.is_some() {
                return Err(GrammarError::DuplicateName(name.clone()));
            }
        }

        let mut rules = Vec::with_capacity(self.rules.len());
        for (name, expr) in self.rules {
            let mut flattener = Flattener {
                rule: &name,
                symbols: &symbols,
                opcodes: Vec::new(),
            };
            flattener.emit(&expr)?;
            let opcodes = flattener.opcodes;
            rules.push((name, opcodes));
        }

        Grammar::new(rules, self.udts)
    }
}

struct Flattener<'a> {
    rule: &'a str,
    symbols: &'a HashMap<String, Symbol>,
    opcodes: Vec<Opcode>,
}

impl Flattener<'_> {
    /// Emit `expr` in pre-order and return its index.
    fn emit(&mut self, expr: &Expr) -> Result<OpIndex, GrammarError> {
        let index = self.opcodes.len();
        // Placeholder until children are known.
        self.opcodes.push(Opcode::Alt(Vec::new()));

        let op = match expr {
            Expr::Alt(items) => Opcode::Alt(self.emit_all(items)?),
            Expr::Cat(items) => Opcode::Cat(self.emit_all(items)?),
            Expr::Rep { min, max, expr } => Opcode::Rep {
                min: *min,
                max: *max,
                child: self.emit(expr)?,
            },
            Expr::Rnm(name) => match self.resolve(name)? {
                Symbol::Rule(id) => Opcode::Rnm(id),
                Symbol::Udt(id) => Opcode::Udt(id),
            },
            Expr::Udt(name) => match self.resolve(name)? {
                Symbol::Udt(id) => Opcode::Udt(id),
                Symbol::Rule(_) => return Err(self.undefined(name)),
            },
            Expr::Trg(min, max) => Opcode::Trg {
                min: *min,
                max: *max,
            },
            Expr::Tbs(lit) => Opcode::Tbs(lit.chars().collect()),
            Expr::Tls(lit) => Opcode::Tls(lit.chars().collect()),
            Expr::And(expr) => Opcode::And(self.emit(expr)?),
            Expr::Not(expr) => Opcode::Not(self.emit(expr)?),
        };

        self.opcodes[index] = op;
        Ok(index as OpIndex)
    }

    fn emit_all(&mut self, items: &[Expr]) -> Result<Vec<OpIndex>, GrammarError> {
        items.iter().map(|e| self.emit(e)).collect()
    }

    fn resolve(&self, name: &str) -> Result<Symbol, GrammarError> {
        self.symbols
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| self.undefined(name))
    }

    fn undefined(&self, name: &str) -> GrammarError {
        GrammarError::UndefinedName {
            rule: self.rule.to_string(),
            name: name.to_string(),
        }
    }
}
