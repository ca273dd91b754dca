use siwe_core::Colors;

use crate::builder::*;
use crate::dump::{dump, dump_rule, width_for_count};

fn sample() -> crate::Grammar {
    GrammarBuilder::new()
        .rule("greeting", cat([tls("Hi"), opt(rnm("name")), not(ch(10))]))
        .rule("name", plus(rng(97, 122)))
        .udt("u_word", true)
        .build()
        .unwrap()
}

#[test]
fn dump_rules_and_udts() {
    insta::assert_snapshot!(dump(&sample(), Colors::OFF), @r#"
    greeting:
      0 CAT 1 2 4
      1 TLS "hi"
      2 REP 0*1 -> 3
      3 RNM name
      4 NOT -> 5
      5 TRG %d10

    name:
      0 REP 1*inf -> 1
      1 TRG %d97-122

    udt u_word (empty)
    "#);
}

#[test]
fn dump_single_rule() {
    let grammar = sample();
    let id = grammar.rule_id("name").unwrap();
    insta::assert_snapshot!(dump_rule(&grammar, id, Colors::OFF), @r"
    name:
      0 REP 1*inf -> 1
      1 TRG %d97-122
    ");
}

#[test]
fn dump_pads_child_indices() {
    let grammar = GrammarBuilder::new()
        .rule(
            "wide",
            cat((0..11).map(|i| tbs(char::from(b'a' + i as u8).to_string()))),
        )
        .build()
        .unwrap();
    let out = dump(&grammar, Colors::OFF);
    assert!(out.contains("   0 CAT 01 02 03 04 05 06 07 08 09 10 11"));
    assert!(out.contains("  11 TBS \"k\""));
}

#[test]
fn dump_escapes_control_characters() {
    let grammar = GrammarBuilder::new()
        .rule("lf", tbs("\n\n"))
        .build()
        .unwrap();
    assert_eq!(dump(&grammar, Colors::OFF), "lf:\n  0 TBS \"\\n\\n\"\n");
}

#[test]
fn dump_colored_names() {
    let out = dump(&sample(), Colors::ON);
    assert!(out.contains("\x1b[34mgreeting\x1b[0m:"));
}

#[test]
fn widths() {
    assert_eq!(width_for_count(0), 1);
    assert_eq!(width_for_count(10), 1);
    assert_eq!(width_for_count(11), 2);
    assert_eq!(width_for_count(101), 3);
}
