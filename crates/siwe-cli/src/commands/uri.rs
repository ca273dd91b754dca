use siwe_lib::is_uri;

pub struct UriArgs {
    pub uri: String,
    pub compact: bool,
}

pub fn run(args: UriArgs) {
    let Some(parts) = is_uri(&args.uri) else {
        eprintln!("error: not a valid URI: {}", args.uri);
        std::process::exit(1);
    };

    let json = if args.compact {
        serde_json::to_string(&parts)
    } else {
        serde_json::to_string_pretty(&parts)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: JSON serialization failed: {}", e);
            std::process::exit(1);
        }
    }
}
