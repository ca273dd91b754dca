use siwe_bytecode::builder::*;
use siwe_bytecode::{Expr, Grammar};

use super::*;

fn grammar(rules: Vec<(&str, Expr)>) -> Grammar {
    rules
        .into_iter()
        .fold(GrammarBuilder::new(), |b, (name, expr)| b.rule(name, expr))
        .build()
        .unwrap()
}

fn run(grammar: &Grammar, input: &str) -> ParseResult {
    Parser::new(grammar)
        .parse(grammar.rules()[0].name(), input, &mut ())
        .unwrap()
}

#[test]
fn alt_takes_first_success() {
    let g = grammar(vec![("r", alt([tbs("a"), tbs("ab")]))]);
    let result = run(&g, "ab");
    assert!(!result.success);
    assert_eq!(result.state, ParseState::Matched);
    assert_eq!(result.matched, 1);
    assert_eq!(result.length, 2);
}

#[test]
fn alt_all_fail() {
    let g = grammar(vec![("r", alt([tbs("a"), tbs("b")]))]);
    let result = run(&g, "c");
    assert_eq!(result.state, ParseState::NoMatch);
    assert_eq!(result.matched, 0);
}

#[test]
fn cat_sums_lengths() {
    let g = grammar(vec![("r", cat([tbs("ab"), tls("CD"), ch(33)]))]);
    let result = run(&g, "abcd!");
    assert!(result.success);
    assert_eq!(result.matched, 5);
}

#[test]
fn cat_of_empties_is_empty() {
    let g = grammar(vec![("r", cat([tls(""), star(tbs("x"))]))]);
    let result = run(&g, "");
    assert!(result.success);
    assert_eq!(result.state, ParseState::EmptyMatch);
}

#[test]
fn rep_with_zero_max_is_empty() {
    let g = grammar(vec![("r", rep(0, 0, ch(97)))]);
    let result = run(&g, "");
    assert!(result.success);
    assert_eq!(result.state, ParseState::EmptyMatch);
}

#[test]
fn optional_miss_is_empty_match() {
    let g = grammar(vec![("r", cat([star(tbs("x")), tbs("y")]))]);
    assert!(run(&g, "y").success);
    assert!(run(&g, "xxxy").success);
}

#[test]
fn rep_below_minimum_fails() {
    let g = grammar(vec![("r", rep(2, 3, ch(97)))]);
    assert_eq!(run(&g, "a").state, ParseState::NoMatch);
    assert!(run(&g, "aa").success);
}

#[test]
fn rep_stops_at_maximum() {
    let g = grammar(vec![("r", rep(1, 2, ch(97)))]);
    let result = run(&g, "aaa");
    assert!(!result.success);
    assert_eq!(result.matched, 2);
}

#[test]
fn rep_stops_at_end_of_input() {
    let g = grammar(vec![("r", plus(opt(tbs("a"))))]);
    // The child could match empty, but the loop never runs past the end.
    assert_eq!(run(&g, "").state, ParseState::NoMatch);
}

#[test]
fn rep_empty_iteration_succeeds_below_minimum() {
    let g = grammar(vec![("r", cat([rep(3, 5, opt(tbs("a"))), tbs("b")]))]);
    let result = run(&g, "b");
    assert!(result.success);
}

#[test]
fn tls_ignores_ascii_case() {
    let g = grammar(vec![("r", tls("Hello"))]);
    assert!(run(&g, "hELLO").success);
    assert!(run(&g, "HELLO").success);
    assert!(!run(&g, "HELL").success);
}

#[test]
fn tbs_is_case_sensitive() {
    let g = grammar(vec![("r", tbs("Hello"))]);
    assert!(run(&g, "Hello").success);
    assert_eq!(run(&g, "hello").state, ParseState::NoMatch);
}

#[test]
fn trg_matches_inclusive_range() {
    let g = grammar(vec![("r", rng(48, 57))]);
    assert!(run(&g, "0").success);
    assert!(run(&g, "9").success);
    assert!(!run(&g, "a").success);
    assert!(!run(&g, "").success);
}

#[test]
fn trg_matches_non_ascii_codepoints() {
    let g = grammar(vec![("r", plus(rng(0x80, 0x10FFFF)))]);
    let result = run(&g, "\u{e9}\u{1F600}");
    assert!(result.success);
    assert_eq!(result.length, 2);
}

#[test]
fn lookahead_consumes_nothing() {
    let g = grammar(vec![(
        "r",
        cat([and(tbs("ab")), tbs("a"), not(tbs("c")), tbs("b")]),
    )]);
    assert!(run(&g, "ab").success);
}

#[test]
fn not_fails_when_child_matches() {
    let g = grammar(vec![("r", cat([not(tbs("a")), rng(97, 122)]))]);
    assert!(run(&g, "b").success);
    assert_eq!(run(&g, "a").state, ParseState::NoMatch);
}

#[test]
fn and_fails_when_child_fails() {
    let g = grammar(vec![("r", cat([and(tbs("x")), rng(97, 122)]))]);
    assert_eq!(run(&g, "y").state, ParseState::NoMatch);
}

#[test]
fn rule_references() {
    let g = grammar(vec![
        ("pair", cat([rnm("digit"), tbs(","), rnm("digit")])),
        ("digit", rng(48, 57)),
    ]);
    assert!(run(&g, "1,2").success);
    assert!(!run(&g, "1;2").success);
}

#[test]
fn start_rule_is_case_insensitive() {
    let g = grammar(vec![("Greeting", tbs("hi"))]);
    let result = Parser::new(&g).parse("GREETING", "hi", &mut ()).unwrap();
    assert!(result.success);
}

#[test]
fn unknown_start_rule() {
    let g = grammar(vec![("r", tbs("x"))]);
    let err = Parser::new(&g).parse("missing", "x", &mut ()).unwrap_err();
    assert_eq!(err, RuntimeError::UnknownStartRule("missing".into()));
}

#[test]
fn bind_unknown_name() {
    let g = grammar(vec![("r", tbs("x"))]);
    let err = Parser::<()>::new(&g)
        .bind("nope", |_, _, _, _| {})
        .err()
        .unwrap();
    assert_eq!(err, RuntimeError::UnknownName("nope".into()));
}

#[test]
fn counters() {
    let g = grammar(vec![("r", cat([tbs("a"), tbs("b")]))]);
    let result = run(&g, "ab");
    // RNM(r), CAT, TBS, TBS
    assert_eq!(result.node_hits, 4);
    assert_eq!(result.max_tree_depth, 3);
}

#[test]
fn max_matched_reports_furthest_progress() {
    let g = grammar(vec![("r", cat([tbs("abc"), tbs("x")]))]);
    let result = run(&g, "abcy");
    assert!(!result.success);
    assert_eq!(result.state, ParseState::NoMatch);
    assert_eq!(result.matched, 0);
    assert_eq!(result.max_matched, 3);
}

#[test]
fn max_matched_ignores_lookahead() {
    let g = grammar(vec![("r", cat([and(tbs("abcd")), tbs("a")]))]);
    let result = run(&g, "abcd");
    assert_eq!(result.max_matched, 1);
}

#[test]
fn result_serializes_camel_case() {
    let g = grammar(vec![("r", tbs("a"))]);
    let json = serde_json::to_value(run(&g, "a")).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["state"], "matched");
    assert_eq!(json["maxMatched"], 1);
    assert_eq!(json["maxTreeDepth"], 2);
    assert_eq!(json["nodeHits"], 2);
}

// ---------------------------------------------------------------------------
// Callbacks
// ---------------------------------------------------------------------------

fn skip_two(phrase: &mut Phrase, _: &[char], _: usize, _: &mut ()) {
    if phrase.state == ParseState::Active {
        *phrase = Phrase::matched(2);
    }
}

#[test]
fn descending_callback_skips_body() {
    let g = grammar(vec![
        ("top", cat([rnm("any2"), tbs("!")])),
        ("any2", tbs("zz")),
    ]);
    let parser = Parser::new(&g).bind("any2", skip_two).unwrap();
    assert!(parser.parse("top", "ab!", &mut ()).unwrap().success);
}

fn reject_seven(phrase: &mut Phrase, input: &[char], offset: usize, _: &mut ()) {
    if phrase.state == ParseState::Matched && input[offset] == '7' {
        phrase.reject();
    }
}

#[test]
fn ascending_callback_overrides_result() {
    let g = grammar(vec![("digits", plus(rnm("digit"))), ("digit", rng(48, 57))]);
    let parser = Parser::new(&g).bind("DIGIT", reject_seven).unwrap();
    assert!(parser.parse("digits", "123", &mut ()).unwrap().success);

    let result = parser.parse("digits", "1273", &mut ()).unwrap();
    assert!(!result.success);
    assert_eq!(result.matched, 2);
}

fn collect_words(phrase: &mut Phrase, input: &[char], offset: usize, words: &mut Vec<String>) {
    if phrase.state == ParseState::Matched {
        words.push(phrase_text(input, offset, phrase.length));
    }
}

#[test]
fn callbacks_fill_accumulator() {
    let g = grammar(vec![
        ("list", cat([rnm("word"), star(cat([tbs(","), rnm("word")]))])),
        ("word", plus(rng(97, 122))),
    ]);
    let parser = Parser::new(&g).bind("word", collect_words).unwrap();

    let mut words = Vec::new();
    assert!(parser.parse("list", "ab,c,def", &mut words).unwrap().success);
    assert_eq!(words, ["ab", "c", "def"]);
}

#[test]
fn cat_failure_keeps_callback_side_effects() {
    let g = grammar(vec![
        ("top", alt([cat([rnm("word"), tbs("!")]), rnm("word")])),
        ("word", plus(rng(97, 122))),
    ]);
    let parser = Parser::new(&g).bind("word", collect_words).unwrap();

    let mut words = Vec::new();
    assert!(parser.parse("top", "abc", &mut words).unwrap().success);
    assert_eq!(words, ["abc", "abc"]);
}

fn count_hits(phrase: &mut Phrase, _: &[char], _: usize, hits: &mut u32) {
    if phrase.state != ParseState::Active {
        *hits += 1;
    }
}

#[test]
fn callbacks_run_inside_lookahead() {
    let g = grammar(vec![
        ("top", cat([not(rnm("x")), rng(97, 122)])),
        ("x", tbs("x")),
    ]);
    let parser = Parser::new(&g).bind("x", count_hits).unwrap();

    let mut hits = 0;
    assert!(parser.parse("top", "a", &mut hits).unwrap().success);
    assert_eq!(hits, 1);
}

#[test]
fn parser_is_reusable() {
    let g = grammar(vec![("word", plus(rng(97, 122)))]);
    let parser = Parser::new(&g).bind("word", count_hits).unwrap();

    let mut first = 0;
    let mut second = 0;
    let a = parser.parse("word", "abc", &mut first).unwrap();
    let b = parser.parse("word", "abc", &mut second).unwrap();
    assert_eq!(a, b);
    assert_eq!((first, second), (1, 1));
}

fn overrun(phrase: &mut Phrase, _: &[char], _: usize, _: &mut ()) {
    *phrase = Phrase::matched(10);
}

#[test]
fn callback_length_beyond_input_is_fatal() {
    let g = grammar(vec![("r", tbs("ab"))]);
    let err = Parser::new(&g)
        .bind("r", overrun)
        .unwrap()
        .parse("r", "ab", &mut ())
        .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::PhraseOverrun {
            name: "r".into(),
            length: 10,
            remaining: 2
        }
    );
}

fn stay_active(phrase: &mut Phrase, _: &[char], _: usize, _: &mut ()) {
    phrase.state = ParseState::Active;
}

#[test]
fn active_on_ascent_is_fatal() {
    let g = grammar(vec![("r", tbs("ab"))]);
    let err = Parser::new(&g)
        .bind("r", stay_active)
        .unwrap()
        .parse("r", "ab", &mut ())
        .unwrap_err();
    assert_eq!(err, RuntimeError::ActiveReturn("r".into()));
}

fn zero_length_match(phrase: &mut Phrase, _: &[char], _: usize, _: &mut ()) {
    if phrase.state != ParseState::Active {
        *phrase = Phrase {
            state: ParseState::Matched,
            length: 0,
        };
    }
}

#[test]
fn zero_length_match_becomes_empty() {
    let g = grammar(vec![("top", cat([rnm("r"), tbs("ab")])), ("r", tbs("ab"))]);
    let result = Parser::new(&g)
        .bind("r", zero_length_match)
        .unwrap()
        .parse("top", "ab", &mut ())
        .unwrap();
    assert!(result.success);
}

fn no_match_with_length(phrase: &mut Phrase, _: &[char], _: usize, _: &mut ()) {
    if phrase.state != ParseState::Active {
        *phrase = Phrase {
            state: ParseState::NoMatch,
            length: 1,
        };
    }
}

#[test]
fn no_match_length_is_cleared() {
    let g = grammar(vec![("top", alt([rnm("r"), tbs("a")])), ("r", tbs("a"))]);
    let result = Parser::new(&g)
        .bind("r", no_match_with_length)
        .unwrap()
        .parse("top", "a", &mut ())
        .unwrap();
    assert!(result.success);
    assert_eq!(result.matched, 1);
}

// ---------------------------------------------------------------------------
// UDTs
// ---------------------------------------------------------------------------

fn udt_grammar(accepts_empty: bool) -> Grammar {
    GrammarBuilder::new()
        .rule("num", cat([tbs("#"), udt("u_digits"), tbs(";")]))
        .udt("u_digits", accepts_empty)
        .build()
        .unwrap()
}

fn u_digits(phrase: &mut Phrase, input: &[char], offset: usize, _: &mut ()) {
    let len = input[offset..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    *phrase = Phrase::matched(len);
}

#[test]
fn udt_callback_decides_match() {
    let g = udt_grammar(false);
    let parser = Parser::new(&g).bind("u_digits", u_digits).unwrap();
    assert!(parser.parse("num", "#123;", &mut ()).unwrap().success);
}

#[test]
fn udt_empty_rejected_unless_allowed() {
    let g = udt_grammar(false);
    let parser = Parser::new(&g).bind("u_digits", u_digits).unwrap();
    let err = parser.parse("num", "#;", &mut ()).unwrap_err();
    assert_eq!(err, RuntimeError::EmptyUdt("u_digits".into()));

    let g = udt_grammar(true);
    let parser = Parser::new(&g).bind("u_digits", u_digits).unwrap();
    assert!(parser.parse("num", "#;", &mut ()).unwrap().success);
}

#[test]
fn udt_must_not_stay_active() {
    let g = udt_grammar(true);
    let parser = Parser::new(&g).bind("u_digits", stay_active).unwrap();
    let err = parser.parse("num", "#1;", &mut ()).unwrap_err();
    assert_eq!(err, RuntimeError::ActiveReturn("u_digits".into()));
}

#[test]
fn unbound_udt_detected_before_parsing() {
    let g = udt_grammar(false);
    let err = Parser::new(&g).parse("num", "#1;", &mut ()).unwrap_err();
    assert_eq!(err, RuntimeError::UnboundUdt("u_digits".into()));
}
