//! Validated grammar tables.

use indexmap::IndexMap;

use super::ids::{OpIndex, RuleId, UdtId};
use super::opcode::Opcode;

/// A named rule and its flattened opcode tree (root at index 0).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    name: String,
    id: RuleId,
    opcodes: Vec<Opcode>,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }
}

/// A user-defined terminal. Matching is delegated to a callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Udt {
    name: String,
    id: UdtId,
    accepts_empty: bool,
}

impl Udt {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> UdtId {
        self.id
    }

    /// Whether the callback may return a zero-length match.
    pub fn accepts_empty(&self) -> bool {
        self.accepts_empty
    }
}

/// What a grammar name resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Rule(RuleId),
    Udt(UdtId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("duplicate rule or UDT name '{0}' (names are case-insensitive)")]
    DuplicateName(String),
    #[error("rule '{0}' has no opcodes")]
    EmptyRule(String),
    #[error("rule '{rule}': reference to undefined name '{name}'")]
    UndefinedName { rule: String, name: String },
    #[error("rule '{rule}' opcode {op}: child index {child} must point forward within the rule")]
    BadChild {
        rule: String,
        op: OpIndex,
        child: OpIndex,
    },
    #[error("rule '{rule}' opcode {op}: rule index {target} out of range")]
    RuleOutOfRange {
        rule: String,
        op: OpIndex,
        target: u32,
    },
    #[error("rule '{rule}' opcode {op}: UDT index {target} out of range")]
    UdtOutOfRange {
        rule: String,
        op: OpIndex,
        target: u32,
    },
    #[error("rule '{rule}' opcode {op}: TBS literal must not be empty")]
    EmptyTbs { rule: String, op: OpIndex },
    #[error("rule '{rule}' opcode {op}: range minimum {min} exceeds maximum {max}")]
    InvertedRange {
        rule: String,
        op: OpIndex,
        min: u32,
        max: u32,
    },
}

/// Immutable rule and UDT tables with case-insensitive name lookup.
///
/// A grammar is built once and shared by any number of parses.
#[derive(Clone, Debug)]
pub struct Grammar {
    rules: Vec<Rule>,
    udts: Vec<Udt>,
    /// Lower-cased name to symbol, in declaration order (rules first).
    names: IndexMap<String, Symbol>,
}

impl Grammar {
    /// Validate raw tables. Rule and UDT ids are their positions.
    ///
    /// TLS literals are lower-cased here so matching only folds the input.
    pub fn new(
        rules: Vec<(String, Vec<Opcode>)>,
        udts: Vec<(String, bool)>,
    ) -> Result<Self, GrammarError> {
        let mut names = IndexMap::with_capacity(rules.len() + udts.len());

        for (i, (name, _)) in rules.iter().enumerate() {
            let key = name.to_ascii_lowercase();
            if names.insert(key, Symbol::Rule(RuleId(i as u32))).is_some() {
                return Err(GrammarError::DuplicateName(name.clone()));
            }
        }
        for (i, (name, _)) in udts.iter().enumerate() {
            let key = name.to_ascii_lowercase();
            if names.insert(key, Symbol::Udt(UdtId(i as u32))).is_some() {
                return Err(GrammarError::DuplicateName(name.clone()));
            }
        }

        let rule_count = rules.len() as u32;
        let udt_count = udts.len() as u32;

        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(i, (name, opcodes))| {
                let opcodes = validate_rule(&name, opcodes, rule_count, udt_count)?;
                Ok(Rule {
                    name,
                    id: RuleId(i as u32),
                    opcodes,
                })
            })
            .collect::<Result<Vec<_>, GrammarError>>()?;

        let udts = udts
            .into_iter()
            .enumerate()
            .map(|(i, (name, accepts_empty))| Udt {
                name,
                id: UdtId(i as u32),
                accepts_empty,
            })
            .collect();

        Ok(Self { rules, udts, names })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn udts(&self) -> &[Udt] {
        &self.udts
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn udt(&self, id: UdtId) -> &Udt {
        &self.udts[id.index()]
    }

    /// Resolve a rule or UDT name, ignoring ASCII case.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.names.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        match self.lookup(name)? {
            Symbol::Rule(id) => Some(id),
            Symbol::Udt(_) => None,
        }
    }

    pub fn udt_id(&self, name: &str) -> Option<UdtId> {
        match self.lookup(name)? {
            Symbol::Udt(id) => Some(id),
            Symbol::Rule(_) => None,
        }
    }
}

fn validate_rule(
    name: &str,
    mut opcodes: Vec<Opcode>,
    rule_count: u32,
    udt_count: u32,
) -> Result<Vec<Opcode>, GrammarError> {
    if opcodes.is_empty() {
        return Err(GrammarError::EmptyRule(name.to_string()));
    }

    let len = opcodes.len() as u32;
    for (i, op) in opcodes.iter_mut().enumerate() {
        let i = i as OpIndex;

        // Forward-only children keep every rule an acyclic tree.
        if let Some(&child) = op.children().iter().find(|&&c| c <= i || c >= len) {
            return Err(GrammarError::BadChild {
                rule: name.to_string(),
                op: i,
                child,
            });
        }

        match op {
            Opcode::Rnm(id) if id.0 >= rule_count => {
                return Err(GrammarError::RuleOutOfRange {
                    rule: name.to_string(),
                    op: i,
                    target: id.0,
                });
            }
            Opcode::Udt(id) if id.0 >= udt_count => {
                return Err(GrammarError::UdtOutOfRange {
                    rule: name.to_string(),
                    op: i,
                    target: id.0,
                });
            }
            Opcode::Tbs(lit) if lit.is_empty() => {
                return Err(GrammarError::EmptyTbs {
                    rule: name.to_string(),
                    op: i,
                });
            }
            Opcode::Trg { min, max } if *min > *max => {
                return Err(GrammarError::InvertedRange {
                    rule: name.to_string(),
                    op: i,
                    min: *min,
                    max: *max,
                });
            }
            Opcode::Rep {
                min,
                max: Some(max),
                ..
            } if *min > *max => {
                return Err(GrammarError::InvertedRange {
                    rule: name.to_string(),
                    op: i,
                    min: *min,
                    max: *max,
                });
            }
            Opcode::Tls(lit) => {
                for c in lit.iter_mut() {
                    *c = c.to_ascii_lowercase();
                }
            }
            _ => {}
        }
    }

    Ok(opcodes)
}
