//! Errors reported by the SIWE message parser.

use std::ops::Range;

use siwe_vm::RuntimeError;

pub type Result<T> = std::result::Result<T, SiweError>;

/// A required message line whose prefix did not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredLine {
    Uri,
    Version,
    ChainId,
    Nonce,
    IssuedAt,
}

impl RequiredLine {
    pub fn label(self) -> &'static str {
        match self {
            RequiredLine::Uri => "URI",
            RequiredLine::Version => "Version",
            RequiredLine::ChainId => "Chain ID",
            RequiredLine::Nonce => "Nonce",
            RequiredLine::IssuedAt => "Issued At",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            RequiredLine::Uri => "URI: ",
            RequiredLine::Version => "Version: ",
            RequiredLine::ChainId => "Chain ID: ",
            RequiredLine::Nonce => "Nonce: ",
            RequiredLine::IssuedAt => "Issued At: ",
        }
    }
}

/// First failure found while parsing a message.
///
/// Spans and offsets are byte positions in the parsed message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiweError {
    #[error("invalid siwe message: {} missing or invalid prefix \"{}\"", line.label(), line.prefix())]
    MissingLine { line: RequiredLine, offset: usize },

    #[error(
        "invalid siwe message: carefully check message syntax, especially after required \"Issued At: \""
    )]
    Syntax { offset: usize },

    #[error("invalid scheme: {value}")]
    InvalidScheme { value: String, span: Range<usize> },

    #[error("invalid domain: {value}")]
    InvalidDomain { value: String, span: Range<usize> },

    #[error("invalid address: {value}")]
    InvalidAddress { value: String, span: Range<usize> },

    #[error("invalid ERC-55 format address: 'validate' specified, MUST be ERC55-conformant: {value}")]
    NotErc55 { value: String, span: Range<usize> },

    #[error("invalid statement: {value}")]
    InvalidStatement { value: String, span: Range<usize> },

    #[error("invalid URI: {value}")]
    InvalidUri { value: String, span: Range<usize> },

    #[error("invalid Version: {value}")]
    InvalidVersion { value: String, span: Range<usize> },

    #[error("invalid Chain ID: {value}")]
    InvalidChainId { value: String, span: Range<usize> },

    #[error("invalid integer: not a number: {value}")]
    NotANumber { value: String, span: Range<usize> },

    #[error("invalid integer: Infinity: {value}")]
    Infinity { value: String, span: Range<usize> },

    #[error("invalid Nonce: {value}")]
    InvalidNonce { value: String, span: Range<usize> },

    #[error("invalid date time: {field} not date time string format: {value}")]
    InvalidDateTime {
        field: &'static str,
        value: String,
        span: Range<usize>,
    },

    #[error("invalid Request ID: {value}")]
    InvalidRequestId { value: String, span: Range<usize> },

    #[error("invalid resource URI [{index}]: {value}")]
    InvalidResource {
        index: usize,
        value: String,
        span: Range<usize>,
    },

    /// The bundled grammar and its callbacks disagree; not a message error.
    #[error(transparent)]
    Engine(#[from] RuntimeError),
}

impl SiweError {
    /// Source location of the failure, if it has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            SiweError::MissingLine { offset, .. } | SiweError::Syntax { offset } => {
                Some(*offset..*offset)
            }
            SiweError::InvalidScheme { span, .. }
            | SiweError::InvalidDomain { span, .. }
            | SiweError::InvalidAddress { span, .. }
            | SiweError::NotErc55 { span, .. }
            | SiweError::InvalidStatement { span, .. }
            | SiweError::InvalidUri { span, .. }
            | SiweError::InvalidVersion { span, .. }
            | SiweError::InvalidChainId { span, .. }
            | SiweError::NotANumber { span, .. }
            | SiweError::Infinity { span, .. }
            | SiweError::InvalidNonce { span, .. }
            | SiweError::InvalidDateTime { span, .. }
            | SiweError::InvalidRequestId { span, .. }
            | SiweError::InvalidResource { span, .. } => Some(span.clone()),
            SiweError::Engine(_) => None,
        }
    }

    pub fn is_engine(&self) -> bool {
        matches!(self, SiweError::Engine(_))
    }
}
