//! Abstract syntax tree observer.
//!
//! Records an open/close pair for every successful match of a selected rule
//! or UDT. Records written below an operator that later fails are discarded,
//! so the final record list only describes the accepted parse.

use std::fmt::Write as _;

use siwe_bytecode::{Grammar, Opcode, Symbol};

use super::error::RuntimeError;
use super::state::{ParseState, Phrase};
use super::trace::Tracer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Open,
    Close,
}

/// One side of a node, in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AstRecord {
    pub symbol: Symbol,
    pub kind: RecordKind,
    pub offset: usize,
    pub length: usize,
    /// Index of the matching open/close record.
    pub pair: usize,
}

/// A reconstructed node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AstNode {
    pub name: String,
    pub offset: usize,
    pub length: usize,
    pub children: Vec<AstNode>,
}

pub struct Ast<'g> {
    grammar: &'g Grammar,
    rules: Vec<bool>,
    udts: Vec<bool>,
    input: Vec<char>,
    records: Vec<AstRecord>,
    /// Record count at each operator entry, for rollback on failure.
    marks: Vec<usize>,
    /// Open records awaiting their close.
    open: Vec<usize>,
}

impl<'g> Ast<'g> {
    /// An observer with no nodes selected.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            rules: vec![false; grammar.rules().len()],
            udts: vec![false; grammar.udts().len()],
            input: Vec::new(),
            records: Vec::new(),
            marks: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Select a rule or UDT by name.
    pub fn include(mut self, name: &str) -> Result<Self, RuntimeError> {
        match self.grammar.lookup(name) {
            Some(Symbol::Rule(id)) => self.rules[id.index()] = true,
            Some(Symbol::Udt(id)) => self.udts[id.index()] = true,
            None => return Err(RuntimeError::UnknownName(name.to_string())),
        }
        Ok(self)
    }

    /// Select every rule and UDT.
    pub fn include_all(mut self) -> Self {
        self.rules.fill(true);
        self.udts.fill(true);
        self
    }

    pub fn records(&self) -> &[AstRecord] {
        &self.records
    }

    pub fn name(&self, symbol: Symbol) -> &'g str {
        match symbol {
            Symbol::Rule(id) => self.grammar.rule(id).name(),
            Symbol::Udt(id) => self.grammar.udt(id).name(),
        }
    }

    /// Matched text of a record.
    pub fn phrase(&self, record: &AstRecord) -> String {
        self.input[record.offset..record.offset + record.length]
            .iter()
            .collect()
    }

    /// Rebuild the node forest from the record list.
    pub fn nodes(&self) -> Vec<AstNode> {
        let mut stack: Vec<AstNode> = Vec::new();
        let mut roots = Vec::new();
        for record in &self.records {
            match record.kind {
                RecordKind::Open => stack.push(AstNode {
                    name: self.name(record.symbol).to_string(),
                    offset: record.offset,
                    length: record.length,
                    children: Vec::new(),
                }),
                RecordKind::Close => {
                    let Some(node) = stack.pop() else { continue };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => roots.push(node),
                    }
                }
            }
        }
        roots
    }

    /// Indented listing: `name [offset, length] 'phrase'`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut depth = 0;
        for record in &self.records {
            match record.kind {
                RecordKind::Open => {
                    let _ = writeln!(
                        out,
                        "{:indent$}{} [{}, {}] '{}'",
                        "",
                        self.name(record.symbol),
                        record.offset,
                        record.length,
                        self.phrase(record).escape_debug(),
                        indent = depth * 2
                    );
                    depth += 1;
                }
                RecordKind::Close => depth -= 1,
            }
        }
        out
    }

    fn selected(&self, op: &Opcode) -> Option<Symbol> {
        match op {
            Opcode::Rnm(id) if self.rules[id.index()] => Some(Symbol::Rule(*id)),
            Opcode::Udt(id) if self.udts[id.index()] => Some(Symbol::Udt(*id)),
            _ => None,
        }
    }
}

impl Tracer for Ast<'_> {
    fn trace_begin(&mut self, input: &[char]) {
        self.input = input.to_vec();
        self.records.clear();
        self.marks.clear();
        self.open.clear();
    }

    fn trace_down(&mut self, op: &Opcode, offset: usize) {
        self.marks.push(self.records.len());
        if let Some(symbol) = self.selected(op) {
            self.open.push(self.records.len());
            self.records.push(AstRecord {
                symbol,
                kind: RecordKind::Open,
                offset,
                length: 0,
                pair: 0,
            });
        }
    }

    fn trace_up(&mut self, op: &Opcode, phrase: Phrase, offset: usize) {
        let mark = self.marks.pop().unwrap_or(0);
        let selected = self.selected(op);
        let open = selected.and_then(|_| self.open.pop());

        if phrase.state == ParseState::NoMatch {
            self.records.truncate(mark);
            return;
        }

        if let (Some(symbol), Some(open)) = (selected, open) {
            let close = self.records.len();
            self.records[open].length = phrase.length;
            self.records[open].pair = close;
            self.records.push(AstRecord {
                symbol,
                kind: RecordKind::Close,
                offset,
                length: phrase.length,
                pair: open,
            });
        }
    }
}
