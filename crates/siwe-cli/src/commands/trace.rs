//! Trace the parser over one grammar rule for debugging.

use std::path::PathBuf;

use siwe_core::Colors;
use siwe_lib::{SiweParser, siwe_grammar};
use siwe_vm::{Ast, PrintTracer, Stats};

use super::input::load_or_exit;

pub struct TraceArgs {
    pub input_path: Option<PathBuf>,
    pub input_text: Option<String>,
    pub rule: String,
    pub ast: bool,
    pub stats: bool,
    pub max_phrase: usize,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let input = load_or_exit(args.input_path.as_deref(), args.input_text.as_deref());
    let grammar = siwe_grammar();

    if grammar.rule_id(&args.rule).is_none() {
        eprintln!("error: unknown rule '{}'", args.rule);
        std::process::exit(1);
    }

    let colors = Colors::new(args.color);
    let mut tracer = (
        PrintTracer::builder(grammar)
            .colored(args.color)
            .max_phrase(args.max_phrase)
            .build(),
        (Ast::new(grammar).include_all(), Stats::new(grammar)),
    );

    let result = match SiweParser::shared().parse_rule_with(&args.rule, &input.text, &mut tracer) {
        Ok(result) => result,
        Err(e) => {
            tracer.0.print();
            eprintln!("runtime error: {}", e);
            std::process::exit(2);
        }
    };

    let (printer, (ast, stats)) = tracer;
    printer.print();

    if args.ast {
        println!("{}---{}", colors.dim, colors.reset);
        print!("{}", ast.dump());
    }
    if args.stats {
        println!("{}---{}", colors.dim, colors.reset);
        print!("{}", stats.render(colors));
    }

    println!("{}---{}", colors.dim, colors.reset);
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: JSON serialization failed: {}", e);
            std::process::exit(1);
        }
    }

    if !result.success {
        std::process::exit(1);
    }
}
