//! Human-readable listing of grammar tables.
//!
//! One block per rule: a `name:` header followed by one line per opcode,
//! `<index> <MNEMONIC> <operands>`. Child references are opcode indices
//! within the same rule. UDTs are listed after the rules.

use std::fmt::Write as _;

use siwe_core::Colors;

use super::grammar::Grammar;
use super::ids::RuleId;
use super::opcode::Opcode;

/// Dump every rule and UDT.
pub fn dump(grammar: &Grammar, colors: Colors) -> String {
    let mut out = String::new();
    for (i, rule) in grammar.rules().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_rule(&mut out, grammar, rule.id(), colors);
    }

    if !grammar.udts().is_empty() {
        out.push('\n');
        for udt in grammar.udts() {
            let empty = if udt.accepts_empty() { " (empty)" } else { "" };
            let _ = writeln!(
                out,
                "{}udt{} {}{}{}{}",
                colors.dim, colors.reset, colors.blue, udt.name(), colors.reset, empty
            );
        }
    }
    out
}

/// Dump a single rule.
pub fn dump_rule(grammar: &Grammar, id: RuleId, colors: Colors) -> String {
    let mut out = String::new();
    write_rule(&mut out, grammar, id, colors);
    out
}

fn write_rule(out: &mut String, grammar: &Grammar, id: RuleId, colors: Colors) {
    let rule = grammar.rule(id);
    let c = colors;
    let _ = writeln!(out, "{}{}{}:", c.blue, rule.name(), c.reset);

    let width = width_for_count(rule.opcodes().len());
    for (i, op) in rule.opcodes().iter().enumerate() {
        let operands = format_operands(grammar, op, width, colors);
        let _ = writeln!(
            out,
            "  {}{:>width$}{} {}{}",
            c.dim,
            i,
            c.reset,
            op.mnemonic(),
            operands
        );
    }
}

fn format_operands(grammar: &Grammar, op: &Opcode, width: usize, colors: Colors) -> String {
    let c = colors;
    let index = |i: &u32| format!("{i:0width$}");
    match op {
        Opcode::Alt(children) | Opcode::Cat(children) => {
            let list: Vec<_> = children.iter().map(index).collect();
            format!(" {}{}{}", c.dim, list.join(" "), c.reset)
        }
        Opcode::Rep { min, max, child } => {
            let max = max.map_or_else(|| "inf".to_string(), |m| m.to_string());
            format!(" {min}*{max} {}-> {}{}", c.dim, index(child), c.reset)
        }
        Opcode::Rnm(id) => format!(" {}{}{}", c.blue, grammar.rule(*id).name(), c.reset),
        Opcode::Udt(id) => format!(" {}{}{}", c.blue, grammar.udt(*id).name(), c.reset),
        Opcode::Trg { min, max } if min == max => format!(" %d{min}"),
        Opcode::Trg { min, max } => format!(" %d{min}-{max}"),
        Opcode::Tbs(lit) | Opcode::Tls(lit) => {
            format!(" {}\"{}\"{}", c.green, escape(lit), c.reset)
        }
        Opcode::And(child) | Opcode::Not(child) => {
            format!(" {}-> {}{}", c.dim, index(child), c.reset)
        }
    }
}

/// Escape a literal for display on one line.
pub fn escape(lit: &[char]) -> String {
    lit.iter().flat_map(|c| c.escape_debug()).collect()
}

/// Digits needed to print indices below `count`.
pub fn width_for_count(count: usize) -> usize {
    let mut n = count.saturating_sub(1);
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}
