use std::path::PathBuf;

use siwe_core::keccak256;

use super::input::read_or_exit;

pub struct KeccakArgs {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
}

pub fn run(args: KeccakArgs) {
    let input = read_or_exit(args.input_path.as_deref(), args.input_text.as_deref());
    match keccak256(&input.text) {
        Ok(digest) => println!("{}", digest),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
