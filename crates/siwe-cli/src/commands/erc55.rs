use siwe_core::{is_erc55, to_erc55};

pub struct Erc55Args {
    pub address: String,
    pub check: bool,
}

pub fn run(args: Erc55Args) {
    if args.check {
        if !is_erc55(&args.address) {
            eprintln!("error: {} is not ERC-55 checksummed", args.address);
            std::process::exit(1);
        }
        return;
    }

    match to_erc55(&args.address) {
        Ok(address) => println!("{}", address),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
