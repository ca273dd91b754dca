use crate::builder::*;
use crate::{GrammarError, Opcode, RuleId, UdtId};

#[test]
fn flattens_in_preorder() {
    let grammar = GrammarBuilder::new()
        .rule("pair", cat([alt([tbs("a"), tbs("b")]), rep(1, 4, rng(48, 57))]))
        .build()
        .unwrap();

    let ops = grammar.rule(RuleId(0)).opcodes();
    assert_eq!(
        ops,
        &[
            Opcode::Cat(vec![1, 4]),
            Opcode::Alt(vec![2, 3]),
            Opcode::Tbs(vec!['a'].into()),
            Opcode::Tbs(vec!['b'].into()),
            Opcode::Rep {
                min: 1,
                max: Some(4),
                child: 5
            },
            Opcode::Trg { min: 48, max: 57 },
        ]
    );
}

#[test]
fn resolves_rule_names_case_insensitively() {
    let grammar = GrammarBuilder::new()
        .rule("Outer", rnm("INNER"))
        .rule("inner", ch(65))
        .build()
        .unwrap();

    assert_eq!(grammar.rule(RuleId(0)).opcodes(), &[Opcode::Rnm(RuleId(1))]);
    assert_eq!(grammar.rule_id("outer"), Some(RuleId(0)));
}

#[test]
fn resolves_udt_references() {
    let grammar = GrammarBuilder::new()
        .rule("r", cat([udt("u_a"), rnm("u_b")]))
        .udt("u_a", false)
        .udt("u_b", true)
        .build()
        .unwrap();

    assert_eq!(
        grammar.rule(RuleId(0)).opcodes(),
        &[
            Opcode::Cat(vec![1, 2]),
            Opcode::Udt(UdtId(0)),
            Opcode::Udt(UdtId(1))
        ]
    );
    assert!(grammar.udt(UdtId(1)).accepts_empty());
}

#[test]
fn optional_star_plus_shorthands() {
    assert_eq!(
        opt(ch(1)),
        Expr::Rep {
            min: 0,
            max: Some(1),
            expr: Box::new(ch(1))
        }
    );
    assert_eq!(
        star(ch(1)),
        Expr::Rep {
            min: 0,
            max: None,
            expr: Box::new(ch(1))
        }
    );
    assert_eq!(
        plus(ch(1)),
        Expr::Rep {
            min: 1,
            max: None,
            expr: Box::new(ch(1))
        }
    );
}

#[test]
fn undefined_rule_name() {
    let err = GrammarBuilder::new()
        .rule("a", rnm("missing"))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        GrammarError::UndefinedName {
            rule: "a".into(),
            name: "missing".into()
        }
    );
}

#[test]
fn udt_reference_to_rule_is_undefined() {
    let err = GrammarBuilder::new()
        .rule("a", udt("b"))
        .rule("b", ch(1))
        .build()
        .unwrap_err();
    assert!(matches!(err, GrammarError::UndefinedName { .. }));
}

#[test]
fn duplicate_names_across_rules_and_udts() {
    let err = GrammarBuilder::new()
        .rule("dup", ch(1))
        .udt("DUP", false)
        .build()
        .unwrap_err();
    assert_eq!(err, GrammarError::DuplicateName("DUP".into()));
}

#[test]
fn empty_tbs_rejected() {
    let err = GrammarBuilder::new().rule("a", tbs("")).build().unwrap_err();
    assert_eq!(
        err,
        GrammarError::EmptyTbs {
            rule: "a".into(),
            op: 0
        }
    );
}

#[test]
fn empty_tls_allowed() {
    let grammar = GrammarBuilder::new().rule("e", tls("")).build().unwrap();
    assert_eq!(grammar.rule(RuleId(0)).opcodes(), &[Opcode::Tls(Box::default())]);
}

#[test]
fn inverted_repetition_rejected() {
    let err = GrammarBuilder::new()
        .rule("a", rep(3, 2, ch(1)))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        GrammarError::InvertedRange { min: 3, max: 2, .. }
    ));
}

#[test]
fn inverted_terminal_range_rejected() {
    let err = GrammarBuilder::new()
        .rule("a", cat([ch(1), rng(0x7a, 0x61)]))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        GrammarError::InvertedRange {
            min: 0x7a,
            max: 0x61,
            ..
        }
    ));

    let ok = GrammarBuilder::new()
        .rule("a", cat([rng(0x61, 0x61), rep(2, 2, ch(1))]))
        .build();
    assert!(ok.is_ok());
}
