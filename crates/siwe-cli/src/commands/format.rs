//! Render a JSON message object in the ERC-4361 wire format.

use std::path::PathBuf;

use siwe_lib::{AddressPolicy, SiweMessage, parse_siwe_message};

use super::input::load_or_exit;

pub struct FormatArgs {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub validate: bool,
    pub policy: AddressPolicy,
    pub color: bool,
}

pub fn run(args: FormatArgs) {
    let input = load_or_exit(args.input_path.as_deref(), args.input_text.as_deref());

    let text = match message_from_json(&input.text) {
        Ok(message) => message.to_string(),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    if args.validate
        && let Err(e) = parse_siwe_message(&text, args.policy)
    {
        let printer = e.printer().source(&text).colored(args.color);
        eprintln!("{}", printer.render());
        std::process::exit(if e.is_engine() { 2 } else { 1 });
    }

    println!("{}", text);
}

pub(crate) fn message_from_json(json: &str) -> Result<SiweMessage, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid message object: {}", e))
}
