//! Semantic callbacks for the bundled grammar.
//!
//! The structural pass collects raw field text into [`MessageCaptures`]; the
//! field pass uses [`UriCaptures`] to split URIs and to apply the IPv6 group
//! count and IPv4 octet range checks the grammar alone cannot express.

use std::ops::Range;

use siwe_vm::{Callback, ParseState, Phrase, phrase_text};

use crate::error::RequiredLine;

/// Field text with its byte position in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Capture {
    pub(crate) text: String,
    pub(crate) start: usize,
}

impl Capture {
    pub(crate) fn new(input: &[char], offset: usize, length: usize) -> Self {
        Self {
            text: phrase_text(input, offset, length),
            start: byte_offset(input, offset),
        }
    }

    pub(crate) fn span(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }
}

/// Byte position of codepoint `offset`.
pub(crate) fn byte_offset(input: &[char], offset: usize) -> usize {
    input[..offset.min(input.len())]
        .iter()
        .map(|c| c.len_utf8())
        .sum()
}

#[derive(Debug, Default)]
pub(crate) struct MessageCaptures {
    pub(crate) scheme: Option<Capture>,
    pub(crate) domain: Option<Capture>,
    pub(crate) address: Option<Capture>,
    pub(crate) statement: Option<Capture>,
    pub(crate) uri: Option<Capture>,
    pub(crate) version: Option<Capture>,
    pub(crate) chain_id: Option<Capture>,
    pub(crate) nonce: Option<Capture>,
    pub(crate) issued_at: Option<Capture>,
    pub(crate) expiration_time: Option<Capture>,
    pub(crate) not_before: Option<Capture>,
    pub(crate) request_id: Option<Capture>,
    pub(crate) resources: Option<Vec<Capture>>,
    /// First required line whose prefix failed, with its byte offset.
    pub(crate) missing: Option<(RequiredLine, usize)>,
}

macro_rules! capture_line {
    ($($name:ident => $field:ident),* $(,)?) => {
        $(
            fn $name(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut MessageCaptures) {
                if phrase.state == ParseState::Matched {
                    data.$field = Some(Capture::new(input, offset, phrase.length));
                }
            }
        )*
    };
}

capture_line! {
    fdomain => domain,
    faddress => address,
    fstatement => statement,
    furi => uri,
    fversion => version,
    fchain_id => chain_id,
    fnonce => nonce,
    fissued_at => issued_at,
    fexpiration_time => expiration_time,
    fnot_before => not_before,
}

macro_rules! required_prefix {
    ($($name:ident => $line:expr),* $(,)?) => {
        $(
            fn $name(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut MessageCaptures) {
                if matches!(phrase.state, ParseState::NoMatch | ParseState::EmptyMatch) {
                    data.missing.get_or_insert(($line, byte_offset(input, offset)));
                }
            }
        )*
    };
}

required_prefix! {
    pre_uri => RequiredLine::Uri,
    pre_version => RequiredLine::Version,
    pre_chain_id => RequiredLine::ChainId,
    pre_nonce => RequiredLine::Nonce,
    pre_issued_at => RequiredLine::IssuedAt,
}

/// Strips the trailing `://`.
fn ffscheme(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut MessageCaptures) {
    if phrase.state == ParseState::Matched {
        data.scheme = Some(Capture::new(input, offset, phrase.length - 3));
    }
}

fn frequest_id(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut MessageCaptures) {
    match phrase.state {
        ParseState::Matched | ParseState::EmptyMatch => {
            data.request_id = Some(Capture::new(input, offset, phrase.length));
        }
        _ => {}
    }
}

fn fresources(phrase: &mut Phrase, _: &[char], _: usize, data: &mut MessageCaptures) {
    if phrase.state == ParseState::Active {
        data.resources = Some(Vec::new());
    }
}

/// Strips the leading `- `.
fn fresource(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut MessageCaptures) {
    if phrase.state == ParseState::Matched {
        let resource = Capture::new(input, offset + 2, phrase.length - 2);
        data.resources.get_or_insert_with(Vec::new).push(resource);
    }
}

/// The statement line is present but blank.
fn empty_statement(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut MessageCaptures) {
    if phrase.state == ParseState::Matched {
        data.statement = Some(Capture::new(input, offset + 1, 0));
    }
}

fn no_statement(phrase: &mut Phrase, _: &[char], _: usize, data: &mut MessageCaptures) {
    if phrase.state == ParseState::Matched {
        data.statement = None;
    }
}

pub(crate) const MESSAGE_CALLBACKS: &[(&str, Callback<MessageCaptures>)] = &[
    ("ffscheme", ffscheme),
    ("fdomain", fdomain),
    ("faddress", faddress),
    ("fstatement", fstatement),
    ("furi", furi),
    ("fversion", fversion),
    ("fchain-id", fchain_id),
    ("fnonce", fnonce),
    ("fissued-at", fissued_at),
    ("fexpiration-time", fexpiration_time),
    ("fnot-before", fnot_before),
    ("frequest-id", frequest_id),
    ("fresources", fresources),
    ("fresource", fresource),
    ("empty-statement", empty_statement),
    ("no-statement", no_statement),
    ("pre-uri", pre_uri),
    ("pre-version", pre_version),
    ("pre-chain-id", pre_chain_id),
    ("pre-nonce", pre_nonce),
    ("pre-issued-at", pre_issued_at),
];

/// Components of the last URI parsed, plus scratch state for host checks.
#[derive(Debug, Default)]
pub(crate) struct UriCaptures {
    pub(crate) uri: Option<String>,
    pub(crate) scheme: Option<String>,
    pub(crate) userinfo: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<u64>,
    pub(crate) path: Option<String>,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
    ip_literal: bool,
    ipv4: bool,
    h16_count: u32,
    octet: u32,
}

fn uri(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Active => *data = UriCaptures::default(),
        ParseState::Matched => data.uri = Some(phrase_text(input, offset, phrase.length)),
        ParseState::EmptyMatch => phrase.reject(),
        ParseState::NoMatch => {}
    }
}

fn scheme(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        data.scheme = Some(phrase_text(input, offset, phrase.length));
    }
}

/// Drops the trailing `@`.
fn userinfo_at(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        data.userinfo = Some(phrase_text(input, offset, phrase.length - 1));
    }
}

fn host(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Active => data.ip_literal = false,
        ParseState::Matched if data.ip_literal => {
            data.host = Some(phrase_text(input, offset + 1, phrase.length - 2));
        }
        ParseState::Matched => data.host = Some(phrase_text(input, offset, phrase.length)),
        ParseState::EmptyMatch => data.host = Some(String::new()),
        ParseState::NoMatch => {}
    }
}

fn ip_literal(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        data.ip_literal = true;
    }
}

fn port(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Matched => match phrase_text(input, offset, phrase.length).parse() {
            Ok(port) => data.port = Some(port),
            Err(_) => phrase.reject(),
        },
        ParseState::EmptyMatch => data.port = None,
        _ => {}
    }
}

fn path_abempty(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Matched => data.path = Some(phrase_text(input, offset, phrase.length)),
        ParseState::EmptyMatch => data.path = Some(String::new()),
        _ => {}
    }
}

fn path_nonempty(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        data.path = Some(phrase_text(input, offset, phrase.length));
    }
}

/// Only ever an empty match.
fn path_empty(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Active => {}
        ParseState::EmptyMatch => data.path = Some(String::new()),
        ParseState::Matched | ParseState::NoMatch => {
            phrase.reject();
            data.path = Some(String::new());
        }
    }
}

fn query(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Matched => data.query = Some(phrase_text(input, offset, phrase.length)),
        ParseState::EmptyMatch => data.query = Some(String::new()),
        _ => {}
    }
}

fn fragment(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Matched => data.fragment = Some(phrase_text(input, offset, phrase.length)),
        ParseState::EmptyMatch => data.fragment = Some(String::new()),
        _ => {}
    }
}

fn ipv4(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        data.ipv4 = true;
    }
}

fn h16(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        data.h16_count += 1;
    }
}

/// Eight groups, or six followed by an IPv4 address.
fn nodcolon(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Active => {
            data.h16_count = 0;
            data.ipv4 = false;
        }
        ParseState::Matched => {
            let expected = if data.ipv4 { 6 } else { 8 };
            if data.h16_count != expected {
                phrase.reject();
            }
        }
        _ => {}
    }
}

/// "::" stands for at least one group.
fn dcolon(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Active => {
            data.h16_count = 0;
            data.ipv4 = false;
        }
        ParseState::Matched => {
            let limit = if data.ipv4 { 6 } else { 8 };
            if data.h16_count >= limit {
                phrase.reject();
            }
        }
        _ => {}
    }
}

fn dec_octet(phrase: &mut Phrase, _: &[char], _: usize, data: &mut UriCaptures) {
    match phrase.state {
        ParseState::Active => data.octet = 0,
        ParseState::Matched if data.octet > 255 => phrase.reject(),
        _ => {}
    }
}

fn dec_digit(phrase: &mut Phrase, input: &[char], offset: usize, data: &mut UriCaptures) {
    if phrase.state == ParseState::Matched {
        let digit = input[offset].to_digit(10).unwrap_or(0);
        data.octet = data.octet * 10 + digit;
    }
}

pub(crate) const URI_CALLBACKS: &[(&str, Callback<UriCaptures>)] = &[
    ("URI", uri),
    ("scheme", scheme),
    ("userinfo-at", userinfo_at),
    ("host", host),
    ("IP-literal", ip_literal),
    ("port", port),
    ("path-abempty", path_abempty),
    ("path-absolute", path_nonempty),
    ("path-rootless", path_nonempty),
    ("path-empty", path_empty),
    ("query", query),
    ("fragment", fragment),
    ("IPv4address", ipv4),
    ("nodcolon", nodcolon),
    ("dcolon", dcolon),
    ("h16", h16),
    ("h16c", h16),
    ("h16n", h16),
    ("h16cn", h16),
    ("dec-octet", dec_octet),
    ("dec-digit", dec_digit),
];
