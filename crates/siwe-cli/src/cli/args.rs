//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Input file, `-` for stdin (positional).
pub fn input_path_arg() -> Arg {
    Arg::new("input_path")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Input file (- for stdin)")
}

/// Inline input text (-t/--text).
pub fn input_text_arg() -> Arg {
    Arg::new("input_text")
        .short('t')
        .long("text")
        .value_name("TEXT")
        .help("Inline input text")
}

/// Address handling (--address-policy).
pub fn address_policy_arg() -> Arg {
    Arg::new("address_policy")
        .long("address-policy")
        .value_name("POLICY")
        .default_value("validate")
        .value_parser(["validate", "convert", "ignore"])
        .help("How to treat addresses that are not ERC-55 checksummed")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON (default: pretty)")
}

/// Re-parse formatted output (--validate).
pub fn validate_arg() -> Arg {
    Arg::new("validate")
        .long("validate")
        .action(ArgAction::SetTrue)
        .help("Parse the formatted message and report the first error")
}

/// URI to split (positional, required).
pub fn uri_arg() -> Arg {
    Arg::new("uri")
        .value_name("URI")
        .required(true)
        .help("URI to check")
}

/// Address (positional, required).
pub fn address_arg() -> Arg {
    Arg::new("address")
        .value_name("ADDRESS")
        .required(true)
        .help("0x-prefixed 20-byte hex address")
}

/// Only check the checksum (--check).
pub fn check_arg() -> Arg {
    Arg::new("check")
        .long("check")
        .action(ArgAction::SetTrue)
        .help("Exit with status 1 unless the address is already ERC-55")
}

/// Grammar rule (--rule).
pub fn rule_arg() -> Arg {
    Arg::new("rule")
        .short('r')
        .long("rule")
        .value_name("NAME")
        .help("Grammar rule (case-insensitive)")
}

/// Print the AST after the trace (--ast).
pub fn ast_arg() -> Arg {
    Arg::new("ast")
        .long("ast")
        .action(ArgAction::SetTrue)
        .help("Print the AST of every matched rule")
}

/// Print operator statistics after the trace (--stats).
pub fn stats_arg() -> Arg {
    Arg::new("stats")
        .long("stats")
        .action(ArgAction::SetTrue)
        .help("Print per-operator and per-rule hit counts")
}

/// Phrase preview length (--max-phrase).
pub fn max_phrase_arg() -> Arg {
    Arg::new("max_phrase")
        .long("max-phrase")
        .value_name("N")
        .default_value("100")
        .value_parser(value_parser!(usize))
        .help("Characters of remaining input shown per trace line")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
