use siwe_bytecode::Grammar;
use siwe_bytecode::builder::*;
use siwe_core::Colors;

use super::*;

fn word() -> Grammar {
    GrammarBuilder::new()
        .rule("word", star(rng(97, 122)))
        .build()
        .unwrap()
}

fn counts(matched: u64, empty: u64, no_match: u64) -> Counts {
    Counts {
        matched,
        empty,
        no_match,
    }
}

#[test]
fn counts_per_operator_and_rule() {
    let g = word();
    let mut stats = Stats::new(&g);
    Parser::new(&g)
        .parse_with("word", "ab1", &mut (), &mut stats)
        .unwrap();

    assert_eq!(stats.operator("TRG"), counts(2, 0, 1));
    assert_eq!(stats.operator("REP"), counts(1, 0, 0));
    assert_eq!(stats.operator("RNM"), counts(1, 0, 0));
    assert_eq!(stats.operator("CAT"), Counts::default());
    assert_eq!(stats.operator("bogus"), Counts::default());
    assert_eq!(stats.rule(g.rule_id("word").unwrap()), counts(1, 0, 0));
    assert_eq!(stats.total(), counts(4, 0, 1));
    assert_eq!(stats.total().total(), 5);
}

#[test]
fn accumulates_until_reset() {
    let g = word();
    let parser = Parser::new(&g);
    let mut stats = Stats::new(&g);
    parser.parse_with("word", "", &mut (), &mut stats).unwrap();
    parser.parse_with("word", "", &mut (), &mut stats).unwrap();
    assert_eq!(stats.operator("REP"), counts(0, 2, 0));

    stats.reset();
    assert_eq!(stats.total(), Counts::default());
}

#[test]
fn udt_counts() {
    fn any(phrase: &mut Phrase, input: &[char], offset: usize, _: &mut ()) {
        *phrase = Phrase::matched(input.len() - offset);
    }

    let g = GrammarBuilder::new()
        .rule("r", udt("u_any"))
        .udt("u_any", true)
        .build()
        .unwrap();
    let mut stats = Stats::new(&g);
    let parser = Parser::new(&g).bind("u_any", any).unwrap();
    parser.parse_with("r", "xyz", &mut (), &mut stats).unwrap();
    parser.parse_with("r", "", &mut (), &mut stats).unwrap();

    assert_eq!(stats.udt(g.udt_id("u_any").unwrap()), counts(1, 1, 0));
}

#[test]
fn render_tables() {
    let g = word();
    let mut stats = Stats::new(&g);
    Parser::new(&g)
        .parse_with("word", "ab", &mut (), &mut stats)
        .unwrap();

    let out = stats.render(Colors::OFF);
    let rows: Vec<Vec<&str>> = out.lines().map(|l| l.split_whitespace().collect()).collect();
    assert_eq!(
        rows,
        [
            vec!["OPERATOR", "MATCH", "EMPTY", "NOMATCH", "TOTAL"],
            vec!["REP", "1", "0", "0", "1"],
            vec!["RNM", "1", "0", "0", "1"],
            vec!["TRG", "2", "0", "0", "2"],
            vec!["total", "4", "0", "0", "4"],
            vec![],
            vec!["RULE", "MATCH", "EMPTY", "NOMATCH", "TOTAL"],
            vec!["word", "1", "0", "0", "1"],
        ]
    );
}

#[test]
fn render_without_hits() {
    let g = word();
    let out = Stats::new(&g).render(Colors::OFF);
    assert_eq!(out.lines().count(), 2);
    assert!(!out.contains("RULE"));
}
