//! Parse and validate a message, printing the fields as JSON.

use std::path::PathBuf;

use siwe_lib::{AddressPolicy, SiweMessage, parse_siwe_message};

use super::input::load_or_exit;

pub struct ParseArgs {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub policy: AddressPolicy,
    pub compact: bool,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let input = load_or_exit(args.input_path.as_deref(), args.input_text.as_deref());

    let message = match parse_siwe_message(&input.text, args.policy) {
        Ok(message) => message,
        Err(e) => {
            let mut printer = e.printer().source(&input.text).colored(args.color);
            if let Some(name) = &input.name {
                printer = printer.path(name);
            }
            eprintln!("{}", printer.render());
            std::process::exit(if e.is_engine() { 2 } else { 1 });
        }
    };

    match to_json(&message, !args.compact) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: JSON serialization failed: {}", e);
            std::process::exit(1);
        }
    }
}

pub(crate) fn to_json(message: &SiweMessage, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(message)
    } else {
        serde_json::to_string(message)
    }
}
