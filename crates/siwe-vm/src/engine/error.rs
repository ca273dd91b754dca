//! Contract violations detected while binding or executing a grammar.
//!
//! A syntactic mismatch is not an error; it is reported through
//! [`ParseResult::success`](super::ParseResult::success).

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("start rule '{0}' not recognized")]
    UnknownStartRule(String),

    /// Name given to a callback or AST filter matches no rule or UDT.
    #[error("'{0}' is not a rule or UDT name")]
    UnknownName(String),

    #[error("UDT '{0}' has no callback")]
    UnboundUdt(String),

    #[error(
        "{name}: callback returned phrase length {length} but only {remaining} characters remain"
    )]
    PhraseOverrun {
        name: String,
        length: usize,
        remaining: usize,
    },

    #[error("{0}: callback must not return ACTIVE here")]
    ActiveReturn(String),

    #[error("{0}: UDT returned an empty phrase but does not accept empty")]
    EmptyUdt(String),
}
