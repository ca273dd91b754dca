//! Operator and rule hit counts.

use std::fmt::Write as _;

use siwe_bytecode::{Grammar, Opcode, RuleId, UdtId};
use siwe_core::Colors;

use super::state::{ParseState, Phrase};
use super::trace::Tracer;

/// Outcome counts for one operator kind, rule or UDT.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub matched: u64,
    pub empty: u64,
    pub no_match: u64,
}

impl Counts {
    pub fn total(&self) -> u64 {
        self.matched + self.empty + self.no_match
    }

    fn record(&mut self, state: ParseState) {
        match state {
            ParseState::Matched => self.matched += 1,
            ParseState::EmptyMatch => self.empty += 1,
            ParseState::NoMatch | ParseState::Active => self.no_match += 1,
        }
    }
}

const OPERATORS: [&str; 10] = [
    "ALT", "CAT", "REP", "RNM", "TRG", "TBS", "TLS", "UDT", "AND", "NOT",
];

fn operator_slot(op: &Opcode) -> usize {
    match op {
        Opcode::Alt(_) => 0,
        Opcode::Cat(_) => 1,
        Opcode::Rep { .. } => 2,
        Opcode::Rnm(_) => 3,
        Opcode::Trg { .. } => 4,
        Opcode::Tbs(_) => 5,
        Opcode::Tls(_) => 6,
        Opcode::Udt(_) => 7,
        Opcode::And(_) => 8,
        Opcode::Not(_) => 9,
    }
}

/// Tracer that tallies results per operator kind and per rule/UDT.
///
/// Counts accumulate across parses until [`reset`](Self::reset).
pub struct Stats<'g> {
    grammar: &'g Grammar,
    operators: [Counts; 10],
    rules: Vec<Counts>,
    udts: Vec<Counts>,
}

impl<'g> Stats<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            operators: [Counts::default(); 10],
            rules: vec![Counts::default(); grammar.rules().len()],
            udts: vec![Counts::default(); grammar.udts().len()],
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.grammar);
    }

    /// Counts per operator mnemonic, in a fixed order.
    pub fn operators(&self) -> impl Iterator<Item = (&'static str, Counts)> + '_ {
        OPERATORS.iter().copied().zip(self.operators.iter().copied())
    }

    pub fn operator(&self, mnemonic: &str) -> Counts {
        OPERATORS
            .iter()
            .position(|m| *m == mnemonic)
            .map(|i| self.operators[i])
            .unwrap_or_default()
    }

    pub fn rule(&self, id: RuleId) -> Counts {
        self.rules[id.index()]
    }

    pub fn udt(&self, id: UdtId) -> Counts {
        self.udts[id.index()]
    }

    pub fn total(&self) -> Counts {
        self.operators.iter().fold(Counts::default(), |acc, c| Counts {
            matched: acc.matched + c.matched,
            empty: acc.empty + c.empty,
            no_match: acc.no_match + c.no_match,
        })
    }

    /// Table of operator counts, then rules and UDTs that were hit, most
    /// frequent first.
    pub fn render(&self, colors: Colors) -> String {
        let c = colors;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}{:<8} {:>9} {:>9} {:>9} {:>9}{}",
            c.dim, "OPERATOR", "MATCH", "EMPTY", "NOMATCH", "TOTAL", c.reset
        );
        for (name, counts) in self.operators().filter(|(_, c)| c.total() > 0) {
            write_row(&mut out, name, counts);
        }
        write_row(&mut out, "total", self.total());

        let mut hits: Vec<(&str, Counts)> = self
            .grammar
            .rules()
            .iter()
            .map(|r| (r.name(), self.rules[r.id().index()]))
            .chain(
                self.grammar
                    .udts()
                    .iter()
                    .map(|u| (u.name(), self.udts[u.id().index()])),
            )
            .filter(|(_, c)| c.total() > 0)
            .collect();
        if hits.is_empty() {
            return out;
        }
        hits.sort_by(|a, b| b.1.total().cmp(&a.1.total()).then(a.0.cmp(b.0)));

        out.push('\n');
        let _ = writeln!(
            out,
            "{}{:<24} {:>9} {:>9} {:>9} {:>9}{}",
            c.dim, "RULE", "MATCH", "EMPTY", "NOMATCH", "TOTAL", c.reset
        );
        for (name, counts) in hits {
            let _ = writeln!(
                out,
                "{}{:<24}{} {:>9} {:>9} {:>9} {:>9}",
                c.blue,
                name,
                c.reset,
                counts.matched,
                counts.empty,
                counts.no_match,
                counts.total()
            );
        }
        out
    }
}

fn write_row(out: &mut String, name: &str, counts: Counts) {
    let _ = writeln!(
        out,
        "{:<8} {:>9} {:>9} {:>9} {:>9}",
        name,
        counts.matched,
        counts.empty,
        counts.no_match,
        counts.total()
    );
}

impl Tracer for Stats<'_> {
    fn trace_begin(&mut self, _input: &[char]) {}

    fn trace_down(&mut self, _op: &Opcode, _offset: usize) {}

    fn trace_up(&mut self, op: &Opcode, phrase: Phrase, _offset: usize) {
        self.operators[operator_slot(op)].record(phrase.state);
        match op {
            Opcode::Rnm(id) => self.rules[id.index()].record(phrase.state),
            Opcode::Udt(id) => self.udts[id.index()].record(phrase.state),
            _ => {}
        }
    }
}
