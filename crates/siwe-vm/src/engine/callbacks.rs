//! Callback signature and the per-grammar binding table.

use siwe_bytecode::{Grammar, RuleId, Symbol, UdtId};

use super::error::RuntimeError;
use super::state::Phrase;

/// Semantic action for a rule or UDT.
///
/// Arguments: the phrase record, the input codepoints, the offset where the
/// rule or UDT starts, and the caller's accumulator.
///
/// Rule callbacks run twice: descending with `Active` (leave it to run the
/// rule body, or set a result to skip it) and ascending with the body's
/// result, which they may override. UDT callbacks run once and must decide.
pub type Callback<D> = fn(&mut Phrase, &[char], usize, &mut D);

/// Callbacks indexed by rule and UDT id, resolved once at bind time.
pub(crate) struct CallbackTable<D> {
    rules: Vec<Option<Callback<D>>>,
    udts: Vec<Option<Callback<D>>>,
}

impl<D> CallbackTable<D> {
    pub(crate) fn new(grammar: &Grammar) -> Self {
        Self {
            rules: vec![None; grammar.rules().len()],
            udts: vec![None; grammar.udts().len()],
        }
    }

    pub(crate) fn bind(
        &mut self,
        grammar: &Grammar,
        name: &str,
        callback: Callback<D>,
    ) -> Result<(), RuntimeError> {
        match grammar.lookup(name) {
            Some(Symbol::Rule(id)) => self.rules[id.index()] = Some(callback),
            Some(Symbol::Udt(id)) => self.udts[id.index()] = Some(callback),
            None => return Err(RuntimeError::UnknownName(name.to_string())),
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn rule(&self, id: RuleId) -> Option<Callback<D>> {
        self.rules[id.index()]
    }

    #[inline]
    pub(crate) fn udt(&self, id: UdtId) -> Option<Callback<D>> {
        self.udts[id.index()]
    }
}
