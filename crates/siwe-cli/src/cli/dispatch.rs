//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep the raw `ColorChoice`,
//! so the terminal check happens only when a command is about to run.

use std::path::PathBuf;

use clap::ArgMatches;
use siwe_lib::AddressPolicy;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::erc55::Erc55Args;
use crate::commands::format::FormatArgs;
use crate::commands::keccak::KeccakArgs;
use crate::commands::parse::ParseArgs;
use crate::commands::trace::TraceArgs;
use crate::commands::uri::UriArgs;

pub struct ParseParams {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub policy: AddressPolicy,
    pub compact: bool,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input_path: m.get_one::<PathBuf>("input_path").cloned(),
            input_text: m.get_one::<String>("input_text").cloned(),
            policy: parse_policy(m),
            compact: m.get_flag("compact"),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            input_path: p.input_path,
            input_text: p.input_text,
            policy: p.policy,
            compact: p.compact,
            color: p.color.should_colorize(),
        }
    }
}

pub struct FormatParams {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub validate: bool,
    pub policy: AddressPolicy,
    pub color: ColorChoice,
}

impl FormatParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input_path: m.get_one::<PathBuf>("input_path").cloned(),
            input_text: m.get_one::<String>("input_text").cloned(),
            validate: m.get_flag("validate"),
            policy: parse_policy(m),
            color: parse_color(m),
        }
    }
}

impl From<FormatParams> for FormatArgs {
    fn from(p: FormatParams) -> Self {
        Self {
            input_path: p.input_path,
            input_text: p.input_text,
            validate: p.validate,
            policy: p.policy,
            color: p.color.should_colorize(),
        }
    }
}

pub struct UriParams {
    pub uri: String,
    pub compact: bool,
}

impl UriParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            uri: m.get_one::<String>("uri").cloned().unwrap_or_default(),
            compact: m.get_flag("compact"),
        }
    }
}

impl From<UriParams> for UriArgs {
    fn from(p: UriParams) -> Self {
        Self {
            uri: p.uri,
            compact: p.compact,
        }
    }
}

pub struct KeccakParams {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
}

impl KeccakParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input_path: m.get_one::<PathBuf>("input_path").cloned(),
            input_text: m.get_one::<String>("input_text").cloned(),
        }
    }
}

impl From<KeccakParams> for KeccakArgs {
    fn from(p: KeccakParams) -> Self {
        Self {
            input_path: p.input_path,
            input_text: p.input_text,
        }
    }
}

pub struct Erc55Params {
    pub address: String,
    pub check: bool,
}

impl Erc55Params {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            address: m.get_one::<String>("address").cloned().unwrap_or_default(),
            check: m.get_flag("check"),
        }
    }
}

impl From<Erc55Params> for Erc55Args {
    fn from(p: Erc55Params) -> Self {
        Self {
            address: p.address,
            check: p.check,
        }
    }
}

pub struct TraceParams {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub rule: String,
    pub ast: bool,
    pub stats: bool,
    pub max_phrase: usize,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            input_path: m.get_one::<PathBuf>("input_path").cloned(),
            input_text: m.get_one::<String>("input_text").cloned(),
            rule: m
                .get_one::<String>("rule")
                .cloned()
                .unwrap_or_else(|| siwe_lib::grammar::FIRST_PASS.to_string()),
            ast: m.get_flag("ast"),
            stats: m.get_flag("stats"),
            max_phrase: m.get_one::<usize>("max_phrase").copied().unwrap_or(100),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        Self {
            input_path: p.input_path,
            input_text: p.input_text,
            rule: p.rule,
            ast: p.ast,
            stats: p.stats,
            max_phrase: p.max_phrase,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub rule: Option<String>,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            rule: m.get_one::<String>("rule").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            rule: p.rule,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_policy(m: &ArgMatches) -> AddressPolicy {
    m.get_one::<String>("address_policy")
        .map(|s| AddressPolicy::from_name(s))
        .unwrap_or_default()
}
