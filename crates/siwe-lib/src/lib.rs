#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Sign-In with Ethereum (ERC-4361) message parsing.
//!
//! Messages are parsed in two passes over one bundled SABNF grammar: a
//! structural pass that captures each line, then a field pass that checks
//! every captured value against its RFC 3986, RFC 3339 or ERC-4361 rule.
//!
//! # Example
//!
//! ```
//! use siwe_lib::{AddressPolicy, parse_siwe_message};
//!
//! let text = "example.com wants you to sign in with your Ethereum account:\n\
//!     0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2\n\
//!     \n\
//!     \n\
//!     URI: https://example.com/login\n\
//!     Version: 1\n\
//!     Chain ID: 1\n\
//!     Nonce: 32891756\n\
//!     Issued At: 2021-09-30T16:25:24Z";
//!
//! let message = parse_siwe_message(text, AddressPolicy::Validate).unwrap();
//! assert_eq!(message.domain, "example.com");
//! assert_eq!(message.statement, None);
//! assert_eq!(message.to_string(), text);
//! ```

mod callbacks;
pub mod datetime;
mod diagnostics;
mod error;
pub mod grammar;
mod message;
mod uri;

#[cfg(test)]
mod diagnostics_tests;

pub use diagnostics::ErrorPrinter;
pub use error::{RequiredLine, Result, SiweError};
pub use grammar::siwe_grammar;
pub use message::{AddressPolicy, SiweMessage, SiweParser, parse_siwe_message};
pub use uri::{UriParts, is_uri};

pub use siwe_core::{is_erc55, keccak256, to_erc55};
