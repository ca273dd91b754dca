//! Recursive opcode interpreter.

use siwe_bytecode::{Grammar, OpIndex, Opcode, RuleId, UdtId};

use super::callbacks::{Callback, CallbackTable};
use super::error::RuntimeError;
use super::state::{ParseState, Phrase};
use super::trace::{NoopTracer, Tracer};

/// Summary of one parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Start rule matched and consumed the whole input.
    pub success: bool,
    /// Final state of the start rule.
    pub state: ParseState,
    /// Input length in codepoints.
    pub length: usize,
    /// Codepoints matched by the start rule.
    pub matched: usize,
    /// Furthest offset reached by any successful operator outside lookahead.
    pub max_matched: usize,
    pub max_tree_depth: u32,
    /// Operators executed.
    pub node_hits: u64,
}

/// A grammar with callbacks bound to some of its rules and UDTs.
///
/// `D` is the accumulator threaded through every callback.
pub struct Parser<'g, D> {
    grammar: &'g Grammar,
    callbacks: CallbackTable<D>,
}

impl<'g, D> Parser<'g, D> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            callbacks: CallbackTable::new(grammar),
        }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Attach `callback` to the rule or UDT called `name` (case-insensitive).
    pub fn bind(mut self, name: &str, callback: Callback<D>) -> Result<Self, RuntimeError> {
        self.callbacks.bind(self.grammar, name, callback)?;
        Ok(self)
    }

    /// Parse `input` from `start`. See [`parse_with`](Self::parse_with).
    pub fn parse(
        &self,
        start: &str,
        input: &str,
        data: &mut D,
    ) -> Result<ParseResult, RuntimeError> {
        self.parse_with(start, input, data, &mut NoopTracer)
    }

    /// Parse `input` from `start`, reporting every operator to `tracer`.
    ///
    /// A syntactic mismatch is `Ok` with `success == false`; `Err` means a
    /// callback or setup contract was violated.
    pub fn parse_with<T: Tracer>(
        &self,
        start: &str,
        input: &str,
        data: &mut D,
        tracer: &mut T,
    ) -> Result<ParseResult, RuntimeError> {
        let start_id = self
            .grammar
            .rule_id(start)
            .ok_or_else(|| RuntimeError::UnknownStartRule(start.to_string()))?;

        if let Some(udt) = self
            .grammar
            .udts()
            .iter()
            .find(|u| self.callbacks.udt(u.id()).is_none())
        {
            return Err(RuntimeError::UnboundUdt(udt.name().to_string()));
        }

        let input: Vec<char> = input.chars().collect();
        tracer.trace_begin(&input);

        let mut exec = Exec {
            grammar: self.grammar,
            callbacks: &self.callbacks,
            input: &input,
            data,
            tracer,
            lookahead: 0,
            tree_depth: 0,
            max_tree_depth: 0,
            node_hits: 0,
            max_matched: 0,
        };

        let root = [Opcode::Rnm(start_id)];
        let phrase = exec.execute(&root, 0, 0)?;
        debug_assert_ne!(phrase.state, ParseState::Active);

        Ok(ParseResult {
            success: phrase.is_success() && phrase.length == input.len(),
            state: phrase.state,
            length: input.len(),
            matched: phrase.length,
            max_matched: exec.max_matched,
            max_tree_depth: exec.max_tree_depth,
            node_hits: exec.node_hits,
        })
    }
}

/// Per-parse execution record.
struct Exec<'a, D, T> {
    grammar: &'a Grammar,
    callbacks: &'a CallbackTable<D>,
    input: &'a [char],
    data: &'a mut D,
    tracer: &'a mut T,
    /// Nesting depth of AND/NOT; observers are silent while non-zero.
    lookahead: u32,
    tree_depth: u32,
    max_tree_depth: u32,
    node_hits: u64,
    max_matched: usize,
}

impl<D, T: Tracer> Exec<'_, D, T> {
    fn execute(
        &mut self,
        ops: &[Opcode],
        index: OpIndex,
        offset: usize,
    ) -> Result<Phrase, RuntimeError> {
        let op = &ops[index as usize];
        self.node_hits += 1;
        self.tree_depth += 1;
        self.max_tree_depth = self.max_tree_depth.max(self.tree_depth);

        let observed = self.lookahead == 0;
        if observed {
            self.tracer.trace_down(op, offset);
        }

        let phrase = match op {
            Opcode::Alt(children) => self.alt(ops, children, offset)?,
            Opcode::Cat(children) => self.cat(ops, children, offset)?,
            Opcode::Rep { min, max, child } => self.rep(ops, *min, *max, *child, offset)?,
            Opcode::Rnm(id) => self.rnm(*id, offset)?,
            Opcode::Trg { min, max } => self.trg(*min, *max, offset),
            Opcode::Tbs(lit) => self.tbs(lit, offset),
            Opcode::Tls(lit) => self.tls(lit, offset),
            Opcode::Udt(id) => self.udt(*id, offset)?,
            Opcode::And(child) => self.lookahead(ops, *child, offset, true)?,
            Opcode::Not(child) => self.lookahead(ops, *child, offset, false)?,
        };

        if observed {
            self.max_matched = self.max_matched.max(offset + phrase.length);
            self.tracer.trace_up(op, phrase, offset);
        }
        self.tree_depth -= 1;
        Ok(phrase)
    }

    fn alt(
        &mut self,
        ops: &[Opcode],
        children: &[OpIndex],
        offset: usize,
    ) -> Result<Phrase, RuntimeError> {
        for &child in children {
            let phrase = self.execute(ops, child, offset)?;
            if phrase.state != ParseState::NoMatch {
                return Ok(phrase);
            }
        }
        Ok(Phrase::NO_MATCH)
    }

    /// Side effects of children that matched before a failure are kept.
    fn cat(
        &mut self,
        ops: &[Opcode],
        children: &[OpIndex],
        offset: usize,
    ) -> Result<Phrase, RuntimeError> {
        let mut length = 0;
        for &child in children {
            let phrase = self.execute(ops, child, offset + length)?;
            if phrase.state == ParseState::NoMatch {
                return Ok(Phrase::NO_MATCH);
            }
            length += phrase.length;
        }
        Ok(Phrase::matched(length))
    }

    fn rep(
        &mut self,
        ops: &[Opcode],
        min: u32,
        max: Option<u32>,
        child: OpIndex,
        offset: usize,
    ) -> Result<Phrase, RuntimeError> {
        if max == Some(0) {
            return Ok(Phrase::EMPTY);
        }

        let mut count = 0u32;
        let mut length = 0;
        let mut last = ParseState::Active;
        loop {
            if offset + length >= self.input.len() {
                break;
            }
            let phrase = self.execute(ops, child, offset + length)?;
            last = phrase.state;
            if !matches!(last, ParseState::Matched) {
                break;
            }
            count += 1;
            length += phrase.length;
            if Some(count) == max {
                break;
            }
        }

        // An empty iteration ends the loop without failing it.
        if last == ParseState::EmptyMatch || count >= min {
            Ok(Phrase::matched(length))
        } else {
            Ok(Phrase::NO_MATCH)
        }
    }

    fn rnm(&mut self, id: RuleId, offset: usize) -> Result<Phrase, RuntimeError> {
        let grammar = self.grammar;
        let rule = grammar.rule(id);

        let Some(callback) = self.callbacks.rule(id) else {
            return self.execute(rule.opcodes(), 0, offset);
        };

        let remaining = self.input.len() - offset;
        let mut phrase = Phrase::ACTIVE;
        callback(&mut phrase, self.input, offset, self.data);
        check_callback(rule.name(), &mut phrase, remaining, true)?;
        if phrase.state != ParseState::Active {
            return Ok(phrase);
        }

        let mut phrase = self.execute(rule.opcodes(), 0, offset)?;
        callback(&mut phrase, self.input, offset, self.data);
        check_callback(rule.name(), &mut phrase, remaining, false)?;
        Ok(phrase)
    }

    fn trg(&self, min: u32, max: u32, offset: usize) -> Phrase {
        match self.input.get(offset) {
            Some(&c) if (min..=max).contains(&(c as u32)) => Phrase::matched(1),
            _ => Phrase::NO_MATCH,
        }
    }

    fn tbs(&self, lit: &[char], offset: usize) -> Phrase {
        match self.input.get(offset..offset + lit.len()) {
            Some(window) if window == lit => Phrase::matched(lit.len()),
            _ => Phrase::NO_MATCH,
        }
    }

    fn tls(&self, lit: &[char], offset: usize) -> Phrase {
        if lit.is_empty() {
            return Phrase::EMPTY;
        }
        match self.input.get(offset..offset + lit.len()) {
            Some(window)
                if window
                    .iter()
                    .zip(lit)
                    .all(|(c, l)| c.to_ascii_lowercase() == *l) =>
            {
                Phrase::matched(lit.len())
            }
            _ => Phrase::NO_MATCH,
        }
    }

    fn udt(&mut self, id: UdtId, offset: usize) -> Result<Phrase, RuntimeError> {
        let grammar = self.grammar;
        let udt = grammar.udt(id);
        let callback = self
            .callbacks
            .udt(id)
            .ok_or_else(|| RuntimeError::UnboundUdt(udt.name().to_string()))?;

        let mut phrase = Phrase::ACTIVE;
        callback(&mut phrase, self.input, offset, self.data);
        check_callback(udt.name(), &mut phrase, self.input.len() - offset, false)?;
        if phrase.state == ParseState::EmptyMatch && !udt.accepts_empty() {
            return Err(RuntimeError::EmptyUdt(udt.name().to_string()));
        }
        Ok(phrase)
    }

    fn lookahead(
        &mut self,
        ops: &[Opcode],
        child: OpIndex,
        offset: usize,
        positive: bool,
    ) -> Result<Phrase, RuntimeError> {
        self.lookahead += 1;
        let phrase = self.execute(ops, child, offset)?;
        self.lookahead -= 1;

        Ok(if phrase.is_success() == positive {
            Phrase::EMPTY
        } else {
            Phrase::NO_MATCH
        })
    }
}

/// Validate and normalize a phrase written by a callback.
fn check_callback(
    name: &str,
    phrase: &mut Phrase,
    remaining: usize,
    descending: bool,
) -> Result<(), RuntimeError> {
    if phrase.length > remaining {
        return Err(RuntimeError::PhraseOverrun {
            name: name.to_string(),
            length: phrase.length,
            remaining,
        });
    }

    match phrase.state {
        ParseState::Active if descending => {}
        ParseState::Active => return Err(RuntimeError::ActiveReturn(name.to_string())),
        ParseState::Matched if phrase.length == 0 => *phrase = Phrase::EMPTY,
        ParseState::Matched => {}
        ParseState::EmptyMatch => *phrase = Phrase::EMPTY,
        ParseState::NoMatch => *phrase = Phrase::NO_MATCH,
    }
    Ok(())
}
