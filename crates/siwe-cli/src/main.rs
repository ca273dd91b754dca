mod cli;
mod commands;

use cli::{
    DumpParams, Erc55Params, FormatParams, KeccakParams, ParseParams, TraceParams, UriParams,
    build_cli,
};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("parse", m)) => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        Some(("format", m)) => {
            let params = FormatParams::from_matches(m);
            commands::format::run(params.into());
        }
        Some(("uri", m)) => {
            let params = UriParams::from_matches(m);
            commands::uri::run(params.into());
        }
        Some(("keccak", m)) => {
            let params = KeccakParams::from_matches(m);
            commands::keccak::run(params.into());
        }
        Some(("erc55", m)) => {
            let params = Erc55Params::from_matches(m);
            commands::erc55::run(params.into());
        }
        Some(("trace", m)) => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
