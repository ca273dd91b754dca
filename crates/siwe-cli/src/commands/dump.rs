use siwe_bytecode::{dump, dump_rule};
use siwe_core::Colors;
use siwe_lib::siwe_grammar;

pub struct DumpArgs {
    pub rule: Option<String>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let grammar = siwe_grammar();
    let colors = Colors::new(args.color);

    let Some(name) = args.rule else {
        print!("{}", dump(grammar, colors));
        return;
    };

    match grammar.rule_id(&name) {
        Some(id) => print!("{}", dump_rule(grammar, id, colors)),
        None => {
            eprintln!("error: unknown rule '{}'", name);
            std::process::exit(1);
        }
    }
}
