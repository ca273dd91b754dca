//! The SABNF operator set.

use super::ids::{OpIndex, RuleId, UdtId};

/// One node of a rule's opcode tree.
///
/// Children are referenced by index into the owning rule's opcode list;
/// index 0 is the rule root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Ordered choice: first child that does not fail wins.
    Alt(Vec<OpIndex>),
    /// Concatenation.
    Cat(Vec<OpIndex>),
    /// Repetition; `max: None` is unbounded.
    Rep {
        min: u32,
        max: Option<u32>,
        child: OpIndex,
    },
    /// Rule name reference.
    Rnm(RuleId),
    /// Single codepoint in the inclusive range.
    Trg { min: u32, max: u32 },
    /// Case-sensitive literal, never empty.
    Tbs(Box<[char]>),
    /// ASCII case-insensitive literal, stored lower-cased. May be empty.
    Tls(Box<[char]>),
    /// User-defined terminal.
    Udt(UdtId),
    /// Positive lookahead.
    And(OpIndex),
    /// Negative lookahead.
    Not(OpIndex),
}

impl Opcode {
    /// Short operator mnemonic.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Alt(_) => "ALT",
            Opcode::Cat(_) => "CAT",
            Opcode::Rep { .. } => "REP",
            Opcode::Rnm(_) => "RNM",
            Opcode::Trg { .. } => "TRG",
            Opcode::Tbs(_) => "TBS",
            Opcode::Tls(_) => "TLS",
            Opcode::Udt(_) => "UDT",
            Opcode::And(_) => "AND",
            Opcode::Not(_) => "NOT",
        }
    }

    /// Child opcode indices, in evaluation order.
    pub fn children(&self) -> &[OpIndex] {
        match self {
            Opcode::Alt(c) | Opcode::Cat(c) => c,
            Opcode::Rep { child, .. } | Opcode::And(child) | Opcode::Not(child) => {
                std::slice::from_ref(child)
            }
            _ => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Opcode::Trg { .. } | Opcode::Tbs(_) | Opcode::Tls(_) | Opcode::Udt(_)
        )
    }
}
