//! Two-pass parsing and stringification of ERC-4361 messages.
//!
//! The structural pass slices the message into raw lines and reports a
//! missing required line precisely. The field pass then checks each captured
//! value against its strict grammar rule, in message order, and stops at the
//! first failure.

use std::fmt;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use siwe_bytecode::Grammar;
use siwe_core::{is_erc55, to_erc55};
use siwe_vm::{ParseResult, Parser, Tracer};

use crate::callbacks::{Capture, MESSAGE_CALLBACKS, MessageCaptures, URI_CALLBACKS, UriCaptures};
use crate::datetime::is_valid_date_time;
use crate::error::{Result, SiweError};
use crate::grammar::{FIRST_PASS, siwe_grammar};
use crate::uri::UriParts;

/// A validated Sign-In with Ethereum message.
///
/// `None` and `Some("")` differ for `statement` and `request_id`, and
/// `None` and `Some(vec![])` differ for `resources`: each distinguishes a
/// missing line from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiweMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    pub domain: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
    pub uri: String,
    pub version: u32,
    pub chain_id: u128,
    pub nonce: String,
    pub issued_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

/// What to do with an address that is valid hex but not ERC-55 checksummed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddressPolicy {
    /// Reject it.
    #[default]
    Validate,
    /// Rewrite it in ERC-55 form.
    Convert,
    /// Keep it as written.
    Ignore,
}

impl AddressPolicy {
    /// `"validate"` and `"convert"` select those policies; any other name
    /// means [`AddressPolicy::Ignore`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "validate" => AddressPolicy::Validate,
            "convert" => AddressPolicy::Convert,
            _ => AddressPolicy::Ignore,
        }
    }
}

/// Parse `text` as a SIWE message with the shared parser.
pub fn parse_siwe_message(text: &str, policy: AddressPolicy) -> Result<SiweMessage> {
    SiweParser::shared().parse(text, policy)
}

/// The bundled grammar with both callback sets bound.
pub struct SiweParser {
    message: Parser<'static, MessageCaptures>,
    fields: Parser<'static, UriCaptures>,
}

impl SiweParser {
    pub fn new() -> Result<Self> {
        let grammar = siwe_grammar();
        let message = MESSAGE_CALLBACKS
            .iter()
            .try_fold(Parser::new(grammar), |p, &(name, cb)| p.bind(name, cb))?;
        let fields = URI_CALLBACKS
            .iter()
            .try_fold(Parser::new(grammar), |p, &(name, cb)| p.bind(name, cb))?;
        Ok(Self { message, fields })
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> &'static SiweParser {
        static PARSER: OnceLock<SiweParser> = OnceLock::new();
        PARSER.get_or_init(|| Self::new().expect("bundled SIWE callbacks match the grammar"))
    }

    pub fn grammar(&self) -> &'static Grammar {
        self.message.grammar()
    }

    pub fn parse(&self, text: &str, policy: AddressPolicy) -> Result<SiweMessage> {
        let mut captures = MessageCaptures::default();
        let result = self.message.parse(FIRST_PASS, text, &mut captures)?;

        if let Some((line, offset)) = captures.missing {
            return Err(SiweError::MissingLine { line, offset });
        }
        let syntax = SiweError::Syntax {
            offset: char_to_byte(text, result.max_matched),
        };
        if !result.success {
            return Err(syntax);
        }

        let required = |capture: Option<Capture>| capture.ok_or_else(|| syntax.clone());
        let domain = required(captures.domain)?;
        let address = required(captures.address)?;
        let uri = required(captures.uri)?;
        let version = required(captures.version)?;
        let chain_id = required(captures.chain_id)?;
        let nonce = required(captures.nonce)?;
        let issued_at = required(captures.issued_at)?;

        if let Some(scheme) = &captures.scheme
            && !self.check("scheme", &scheme.text)?
        {
            return Err(SiweError::InvalidScheme {
                value: scheme.text.clone(),
                span: scheme.span(),
            });
        }

        if !self.check("authority", &domain.text)? {
            return Err(SiweError::InvalidDomain {
                value: domain.text.clone(),
                span: domain.span(),
            });
        }

        let address_text = self.checked_address(&address, policy)?;

        if let Some(statement) = &captures.statement
            && !statement.text.is_empty()
            && !self.check("statement", &statement.text)?
        {
            return Err(SiweError::InvalidStatement {
                value: statement.text.clone(),
                span: statement.span(),
            });
        }

        if self.is_uri(&uri.text).is_none() {
            return Err(SiweError::InvalidUri {
                value: uri.text.clone(),
                span: uri.span(),
            });
        }

        if !self.check("version", &version.text)? {
            return Err(SiweError::InvalidVersion {
                value: version.text.clone(),
                span: version.span(),
            });
        }
        let version_number = parse_integer::<u32>(&version)?;

        if !self.check("chain-id", &chain_id.text)? {
            return Err(SiweError::InvalidChainId {
                value: chain_id.text.clone(),
                span: chain_id.span(),
            });
        }
        let chain_id_number = parse_integer::<u128>(&chain_id)?;

        if !self.check("nonce", &nonce.text)? {
            return Err(SiweError::InvalidNonce {
                value: nonce.text.clone(),
                span: nonce.span(),
            });
        }

        self.check_date_time(&issued_at, "Issued At")?;
        if let Some(expiration_time) = &captures.expiration_time {
            self.check_date_time(expiration_time, "Expiration Time")?;
        }
        if let Some(not_before) = &captures.not_before {
            self.check_date_time(not_before, "Not Before")?;
        }

        if let Some(request_id) = &captures.request_id
            && !request_id.text.is_empty()
            && !self.check("request-id", &request_id.text)?
        {
            return Err(SiweError::InvalidRequestId {
                value: request_id.text.clone(),
                span: request_id.span(),
            });
        }

        if let Some(resources) = &captures.resources
            && let Some((index, bad)) = resources
                .iter()
                .enumerate()
                .find(|(_, r)| self.is_uri(&r.text).is_none())
        {
            return Err(SiweError::InvalidResource {
                index,
                value: bad.text.clone(),
                span: bad.span(),
            });
        }

        let text_of = |capture: Option<Capture>| capture.map(|c| c.text);
        Ok(SiweMessage {
            scheme: text_of(captures.scheme),
            domain: domain.text,
            address: address_text,
            statement: text_of(captures.statement),
            uri: uri.text,
            version: version_number,
            chain_id: chain_id_number,
            nonce: nonce.text,
            issued_at: issued_at.text,
            expiration_time: text_of(captures.expiration_time),
            not_before: text_of(captures.not_before),
            request_id: text_of(captures.request_id),
            resources: captures
                .resources
                .map(|resources| resources.into_iter().map(|r| r.text).collect()),
        })
    }

    /// Split `text` into URI components, or `None` if it is not a URI.
    pub fn is_uri(&self, text: &str) -> Option<UriParts> {
        let mut captures = UriCaptures::default();
        match self.fields.parse("URI", text, &mut captures) {
            Ok(result) if result.success => Some(UriParts::from_captures(captures)),
            _ => None,
        }
    }

    /// Match all of `text` against a single grammar rule.
    pub fn check(&self, rule: &str, text: &str) -> Result<bool> {
        let result = self.fields.parse(rule, text, &mut UriCaptures::default())?;
        Ok(result.success)
    }

    /// Parse `input` from `rule`, reporting every operator to `tracer`.
    ///
    /// The structural start rule runs with the message callbacks, every other
    /// rule with the field callbacks.
    pub fn parse_rule_with<T: Tracer>(
        &self,
        rule: &str,
        input: &str,
        tracer: &mut T,
    ) -> Result<ParseResult> {
        let result = if rule.eq_ignore_ascii_case(FIRST_PASS) {
            self.message
                .parse_with(rule, input, &mut MessageCaptures::default(), tracer)?
        } else {
            self.fields
                .parse_with(rule, input, &mut UriCaptures::default(), tracer)?
        };
        Ok(result)
    }

    fn checked_address(&self, address: &Capture, policy: AddressPolicy) -> Result<String> {
        let invalid = || SiweError::InvalidAddress {
            value: address.text.clone(),
            span: address.span(),
        };
        if !self.check("address", &address.text)? {
            return Err(invalid());
        }
        match policy {
            AddressPolicy::Validate if !is_erc55(&address.text) => Err(SiweError::NotErc55 {
                value: address.text.clone(),
                span: address.span(),
            }),
            AddressPolicy::Convert => to_erc55(&address.text).map_err(|_| invalid()),
            _ => Ok(address.text.clone()),
        }
    }

    fn check_date_time(&self, capture: &Capture, field: &'static str) -> Result<()> {
        if self.check("date-time", &capture.text)? && is_valid_date_time(&capture.text) {
            return Ok(());
        }
        Err(SiweError::InvalidDateTime {
            field,
            value: capture.text.clone(),
            span: capture.span(),
        })
    }
}

fn parse_integer<T: FromStr<Err = ParseIntError>>(capture: &Capture) -> Result<T> {
    capture.text.parse().map_err(|e: ParseIntError| {
        let value = capture.text.clone();
        let span = capture.span();
        match e.kind() {
            IntErrorKind::PosOverflow => SiweError::Infinity { value, span },
            _ => SiweError::NotANumber { value, span },
        }
    })
}

fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(i, _)| i)
}

impl FromStr for SiweMessage {
    type Err = SiweError;

    /// Parses with [`AddressPolicy::Validate`].
    fn from_str(s: &str) -> Result<Self> {
        parse_siwe_message(s, AddressPolicy::Validate)
    }
}

/// The wire format. Round-trips with [`parse_siwe_message`] for any message
/// it returned; the fields themselves are not validated.
impl fmt::Display for SiweMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = self.scheme.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "{scheme}://")?;
        }
        writeln!(
            f,
            "{} wants you to sign in with your Ethereum account:",
            self.domain
        )?;
        writeln!(f, "{}", self.address)?;
        writeln!(f)?;
        if let Some(statement) = &self.statement {
            writeln!(f, "{statement}")?;
        }
        writeln!(f)?;
        writeln!(f, "URI: {}", self.uri)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        write!(f, "Issued At: {}", self.issued_at)?;
        if let Some(t) = self.expiration_time.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "\nExpiration Time: {t}")?;
        }
        if let Some(t) = self.not_before.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "\nNot Before: {t}")?;
        }
        if let Some(id) = &self.request_id {
            write!(f, "\nRequest ID: {id}")?;
        }
        if let Some(resources) = &self.resources {
            write!(f, "\nResources:")?;
            for r in resources {
                write!(f, "\n- {r}")?;
            }
        }
        Ok(())
    }
}
