use siwe_bytecode::builder::*;
use siwe_bytecode::{Expr, Grammar};
use siwe_core::Colors;

use super::*;

fn single(name: &str, expr: Expr) -> Grammar {
    GrammarBuilder::new().rule(name, expr).build().unwrap()
}

fn trace(grammar: &Grammar, start: &str, input: &str) -> String {
    let mut tracer = PrintTracer::new(grammar, Colors::OFF);
    Parser::new(grammar)
        .parse_with(start, input, &mut (), &mut tracer)
        .unwrap();
    tracer.render()
}

#[test]
fn alternation() {
    let g = single("ab", alt([tls("A"), tls("b")]));
    insta::assert_snapshot!(trace(&g, "ab", "b"), @r"
    |-|[RNM(ab)]b
    .|-|[ALT]b
    ..|-|[TLS(a)]b
    ..|N|[TLS(a)]
    ..|-|[TLS(b)]b
    ..|M|[TLS(b)]'b'
    .|M|[ALT]'b'
    |M|[RNM(ab)]'b'
    ");
}

#[test]
fn repetition() {
    let g = single("word", star(rng(97, 122)));
    insta::assert_snapshot!(trace(&g, "word", "ab"), @r"
    |-|[RNM(word)]ab
    .|-|[REP(0,inf)]ab
    ..|-|[TRG(97,122)]ab
    ..|M|[TRG(97,122)]'a'
    ..|-|[TRG(97,122)]b
    ..|M|[TRG(97,122)]'b'
    .|M|[REP(0,inf)]'ab'
    |M|[RNM(word)]'ab'
    ");
}

#[test]
fn empty_match() {
    let g = single("word", star(rng(97, 122)));
    let out = trace(&g, "word", "");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(
        lines,
        [
            "|-|[RNM(word)]",
            ".|-|[REP(0,inf)]",
            ".|E|[REP(0,inf)]''",
            "|E|[RNM(word)]''",
        ]
    );
}

#[test]
fn lookahead_is_silent() {
    let g = single("r", cat([not(tbs("x")), tbs("a")]));
    insta::assert_snapshot!(trace(&g, "r", "a"), @r"
    |-|[RNM(r)]a
    .|-|[CAT]a
    ..|-|[NOT]a
    ..|E|[NOT]''
    ..|-|[TBS(a)]a
    ..|M|[TBS(a)]'a'
    .|M|[CAT]'a'
    |M|[RNM(r)]'a'
    ");
}

#[test]
fn every_fifth_indent_is_a_bar() {
    let g = GrammarBuilder::new()
        .rule("d0", rnm("d1"))
        .rule("d1", rnm("d2"))
        .rule("d2", rnm("d3"))
        .rule("d3", rnm("d4"))
        .rule("d4", rnm("d5"))
        .rule("d5", tbs("a"))
        .build()
        .unwrap();
    let out = trace(&g, "d0", "a");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[5], "....||-|[RNM(d5)]a");
    assert_eq!(lines[6], "....|.|-|[TBS(a)]a");
    assert_eq!(lines[7], "....|.|M|[TBS(a)]'a'");
    assert_eq!(lines.len(), 14);
}

#[test]
fn preview_is_capped() {
    let g = single("r", tbs("abcdef"));
    let mut tracer = PrintTracer::builder(&g).max_phrase(3).build();
    Parser::new(&g)
        .parse_with("r", "abcdef", &mut (), &mut tracer)
        .unwrap();
    assert_eq!(tracer.lines()[0], "|-|[RNM(r)]abc...");
    assert_eq!(tracer.lines()[3], "|M|[RNM(r)]'abcdef'");
}

#[test]
fn long_literals_are_cut() {
    let g = single("r", tls("abcdefghijkl"));
    let out = trace(&g, "r", "x");
    assert_eq!(out.lines().nth(1), Some(".|-|[TLS(abcdefghij...)]x"));
}

#[test]
fn control_characters_are_escaped() {
    let g = single("r", tbs("a\nb"));
    let out = trace(&g, "r", "a\nb");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], r".|-|[TBS(a\nb)]a\nb");
    assert_eq!(lines[2], r".|M|[TBS(a\nb)]'a\nb'");
}

#[test]
fn colored_output() {
    let g = single("r", tbs("a"));
    let mut tracer = PrintTracer::builder(&g).colored(true).build();
    Parser::new(&g)
        .parse_with("r", "a", &mut (), &mut tracer)
        .unwrap();
    let up = tracer.lines().last().unwrap();
    assert!(up.contains(Colors::ON.green));
    assert!(up.contains(Colors::ON.blue));
}

#[test]
fn tracer_is_reset_between_parses() {
    let g = single("r", tbs("a"));
    let parser = Parser::new(&g);
    let mut tracer = PrintTracer::new(&g, Colors::OFF);
    parser.parse_with("r", "a", &mut (), &mut tracer).unwrap();
    parser.parse_with("r", "b", &mut (), &mut tracer).unwrap();
    assert_eq!(
        tracer.lines(),
        ["|-|[RNM(r)]b", ".|-|[TBS(a)]b", ".|N|[TBS(a)]", "|N|[RNM(r)]"]
    );
}

#[test]
fn fan_out_to_two_observers() {
    let g = single("r", cat([tbs("a"), tbs("b")]));
    let mut both = (PrintTracer::new(&g, Colors::OFF), Stats::new(&g));
    Parser::new(&g)
        .parse_with("r", "ab", &mut (), &mut both)
        .unwrap();
    assert_eq!(both.0.lines().len(), 8);
    assert_eq!(both.1.operator("TBS").matched, 2);
}

#[test]
fn noop_tracer_matches_plain_parse() {
    let g = single("r", plus(rng(48, 57)));
    let parser = Parser::new(&g);
    let plain = parser.parse("r", "123", &mut ()).unwrap();
    let traced = parser
        .parse_with("r", "123", &mut (), &mut NoopTracer)
        .unwrap();
    assert_eq!(plain, traced);
}
