//! Tracing infrastructure for observing parser execution.
//!
//! The parser is generic over [`Tracer`]. With [`NoopTracer`] every call is
//! an empty `#[inline(always)]` function and compiles away. Observers keep
//! their own state (depth counters, record stacks); the execution record
//! carries nothing on their behalf.
//!
//! Observers are not notified while a lookahead (AND/NOT) is being evaluated.

use siwe_bytecode::dump::escape;
use siwe_bytecode::{Grammar, Opcode};
use siwe_core::Colors;

use super::state::{ParseState, Phrase};

/// Observer of operator execution.
///
/// - `trace_begin` - once per parse, with the input codepoints
/// - `trace_down` - before an operator runs
/// - `trace_up` - after it returns, with its result
pub trait Tracer {
    fn trace_begin(&mut self, input: &[char]);

    fn trace_down(&mut self, op: &Opcode, offset: usize);

    fn trace_up(&mut self, op: &Opcode, phrase: Phrase, offset: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_begin(&mut self, _input: &[char]) {}

    #[inline(always)]
    fn trace_down(&mut self, _op: &Opcode, _offset: usize) {}

    #[inline(always)]
    fn trace_up(&mut self, _op: &Opcode, _phrase: Phrase, _offset: usize) {}
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn trace_begin(&mut self, input: &[char]) {
        (**self).trace_begin(input)
    }

    fn trace_down(&mut self, op: &Opcode, offset: usize) {
        (**self).trace_down(op, offset)
    }

    fn trace_up(&mut self, op: &Opcode, phrase: Phrase, offset: usize) {
        (**self).trace_up(op, phrase, offset)
    }
}

/// Fan out to two observers.
impl<A: Tracer, B: Tracer> Tracer for (A, B) {
    fn trace_begin(&mut self, input: &[char]) {
        self.0.trace_begin(input);
        self.1.trace_begin(input);
    }

    fn trace_down(&mut self, op: &Opcode, offset: usize) {
        self.0.trace_down(op, offset);
        self.1.trace_down(op, offset);
    }

    fn trace_up(&mut self, op: &Opcode, phrase: Phrase, offset: usize) {
        self.0.trace_up(op, phrase, offset);
        self.1.trace_up(op, phrase, offset);
    }
}

const DEFAULT_MAX_PHRASE: usize = 100;

/// Literals longer than this are cut in operator names.
const MAX_LITERAL: usize = 10;

/// Tracer that collects one line per operator entry and exit.
///
/// ```text
/// |-|[RNM(greeting)]hi there
/// .|-|[CAT]hi there
/// ..|-|[TLS(hi)]hi there
/// ..|M|[TLS(hi)]'hi'
/// ```
///
/// Lines are indented by depth with `.`, every fifth column a `|`. Down lines
/// show the upcoming input (capped); up lines show `M` (matched, with the
/// phrase), `E` (empty) or `N` (no match).
pub struct PrintTracer<'g> {
    grammar: &'g Grammar,
    colors: Colors,
    max_phrase: usize,
    input: Vec<char>,
    depth: usize,
    lines: Vec<String>,
}

pub struct PrintTracerBuilder<'g> {
    grammar: &'g Grammar,
    colors: Colors,
    max_phrase: usize,
}

impl<'g> PrintTracerBuilder<'g> {
    pub fn colored(mut self, enabled: bool) -> Self {
        self.colors = Colors::new(enabled);
        self
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    /// Codepoints of upcoming input shown on down lines.
    pub fn max_phrase(mut self, max: usize) -> Self {
        self.max_phrase = max;
        self
    }

    pub fn build(self) -> PrintTracer<'g> {
        PrintTracer {
            grammar: self.grammar,
            colors: self.colors,
            max_phrase: self.max_phrase,
            input: Vec::new(),
            depth: 0,
            lines: Vec::new(),
        }
    }
}

impl<'g> PrintTracer<'g> {
    pub fn builder(grammar: &'g Grammar) -> PrintTracerBuilder<'g> {
        PrintTracerBuilder {
            grammar,
            colors: Colors::OFF,
            max_phrase: DEFAULT_MAX_PHRASE,
        }
    }

    pub fn new(grammar: &'g Grammar, colors: Colors) -> Self {
        Self::builder(grammar).colors(colors).build()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn indent(&self) -> String {
        let c = &self.colors;
        let mut out = String::with_capacity(self.depth + c.dim.len() + c.reset.len());
        out.push_str(c.dim);
        for i in 1..=self.depth {
            out.push(if i % 5 == 0 { '|' } else { '.' });
        }
        out.push_str(c.reset);
        out
    }

    fn op_name(&self, op: &Opcode) -> String {
        let c = &self.colors;
        match op {
            Opcode::Rep { min, max, .. } => match max {
                Some(max) => format!("REP({min},{max})"),
                None => format!("REP({min},inf)"),
            },
            Opcode::Rnm(id) => {
                format!("RNM({}{}{})", c.blue, self.grammar.rule(*id).name(), c.reset)
            }
            Opcode::Udt(id) => {
                format!("UDT({}{}{})", c.blue, self.grammar.udt(*id).name(), c.reset)
            }
            Opcode::Trg { min, max } => format!("TRG({min},{max})"),
            Opcode::Tbs(lit) => format!("TBS({})", literal(lit)),
            Opcode::Tls(lit) => format!("TLS({})", literal(lit)),
            _ => op.mnemonic().to_string(),
        }
    }

    fn preview(&self, offset: usize) -> String {
        let rest = &self.input[offset.min(self.input.len())..];
        let shown = rest.len().min(self.max_phrase);
        let mut out = printable(&rest[..shown]);
        if shown < rest.len() {
            out.push_str("...");
        }
        out
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_begin(&mut self, input: &[char]) {
        self.input = input.to_vec();
        self.depth = 0;
        self.lines.clear();
    }

    fn trace_down(&mut self, op: &Opcode, offset: usize) {
        let c = self.colors;
        let line = format!(
            "{}|-|[{}]{}{}{}",
            self.indent(),
            self.op_name(op),
            c.dim,
            self.preview(offset),
            c.reset
        );
        self.lines.push(line);
        self.depth += 1;
    }

    fn trace_up(&mut self, op: &Opcode, phrase: Phrase, offset: usize) {
        self.depth = self.depth.saturating_sub(1);
        let c = self.colors;
        let (marker, tail) = match phrase.state {
            ParseState::Matched => {
                let text = &self.input[offset..offset + phrase.length];
                (
                    format!("{}|M|{}", c.green, c.reset),
                    format!("'{}{}{}'", c.green, printable(text), c.reset),
                )
            }
            ParseState::EmptyMatch => (format!("{}|E|{}", c.green, c.reset), "''".to_string()),
            ParseState::NoMatch | ParseState::Active => {
                (format!("{}|N|{}", c.red, c.reset), String::new())
            }
        };
        let line = format!("{}{}[{}]{}", self.indent(), marker, self.op_name(op), tail);
        self.lines.push(line);
    }
}

fn literal(lit: &[char]) -> String {
    if lit.len() > MAX_LITERAL {
        format!("{}...", escape(&lit[..MAX_LITERAL]))
    } else {
        escape(lit)
    }
}

/// Escape control characters so each trace entry stays on one line.
fn printable(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    for &ch in chars {
        if ch.is_control() {
            out.extend(ch.escape_debug());
        } else {
            out.push(ch);
        }
    }
    out
}
