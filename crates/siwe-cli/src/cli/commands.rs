//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("siwe")
        .about("Sign-In with Ethereum (ERC-4361) message tools")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(parse_command())
        .subcommand(format_command())
        .subcommand(uri_command())
        .subcommand(keccak_command())
        .subcommand(erc55_command())
        .subcommand(trace_command())
        .subcommand(dump_command())
}

/// Parse and validate a message, printing it as JSON.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Parse and validate a SIWE message")
        .override_usage(
            "\
  siwe parse <FILE>
  siwe parse -t <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  siwe parse message.txt                          # validate, print JSON
  siwe parse - < message.txt                      # read stdin
  siwe parse message.txt --address-policy convert # checksum the address
  siwe parse message.txt --compact                # single-line JSON"#,
        )
        .arg(input_path_arg())
        .arg(input_text_arg())
        .arg(address_policy_arg())
        .arg(compact_arg())
        .arg(color_arg())
}

/// Render a JSON message object in the wire format.
pub fn format_command() -> Command {
    Command::new("format")
        .about("Format a JSON message object as a SIWE message")
        .override_usage(
            "\
  siwe format <FILE>
  siwe format -t <JSON>",
        )
        .after_help(
            r#"EXAMPLES:
  siwe format message.json                # print the message
  siwe format message.json --validate     # also parse the result"#,
        )
        .arg(input_path_arg())
        .arg(input_text_arg())
        .arg(validate_arg())
        .arg(address_policy_arg())
        .arg(color_arg())
}

/// Split a URI into its components.
pub fn uri_command() -> Command {
    Command::new("uri")
        .about("Check an RFC 3986 URI and print its components")
        .override_usage("  siwe uri <URI>")
        .after_help(
            r#"EXAMPLES:
  siwe uri 'https://user@example.com:8080/path?q=1#top'
  siwe uri 'http://[::1]/' --compact"#,
        )
        .arg(uri_arg())
        .arg(compact_arg())
}

/// Hash text with Keccak-256.
pub fn keccak_command() -> Command {
    Command::new("keccak")
        .about("Print the Keccak-256 digest of the input")
        .override_usage(
            "\
  siwe keccak <FILE>
  siwe keccak -t <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  siwe keccak -t ''                       # empty input
  siwe keccak -t 'Hello world!'"#,
        )
        .arg(input_path_arg())
        .arg(input_text_arg())
}

/// Checksum or check an address.
pub fn erc55_command() -> Command {
    Command::new("erc55")
        .about("Convert an address to ERC-55 form, or check that it is")
        .override_usage("  siwe erc55 <ADDRESS> [--check]")
        .after_help(
            r#"EXAMPLES:
  siwe erc55 0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed
  siwe erc55 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed --check"#,
        )
        .arg(address_arg())
        .arg(check_arg())
}

/// Trace the parser on one rule.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace the parser over the input")
        .override_usage(
            "\
  siwe trace <FILE> [--rule <NAME>]
  siwe trace -t <TEXT> [--rule <NAME>]",
        )
        .after_help(
            r#"EXAMPLES:
  siwe trace message.txt                  # structural pass
  siwe trace -t 'a@b.c' --rule authority  # any grammar rule
  siwe trace message.txt --ast --stats    # plus AST and hit counts"#,
        )
        .arg(input_path_arg())
        .arg(input_text_arg())
        .arg(rule_arg().default_value("siwe-first-pass"))
        .arg(ast_arg())
        .arg(stats_arg())
        .arg(max_phrase_arg())
        .arg(color_arg())
}

/// List the grammar's rules and opcodes.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("List the bundled grammar")
        .override_usage("  siwe dump [--rule <NAME>]")
        .after_help(
            r#"EXAMPLES:
  siwe dump                               # every rule
  siwe dump --rule date-time              # one rule"#,
        )
        .arg(rule_arg())
        .arg(color_arg())
}
