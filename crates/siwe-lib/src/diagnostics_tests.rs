use siwe_vm::RuntimeError;

use crate::{AddressPolicy, SiweError, parse_siwe_message};

const MESSAGE: &str = "example.com wants you to sign in with your Ethereum account:\n\
    0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2\n\
    \n\
    \n\
    URI: https://example.com/login\n\
    Version: 1\n\
    Chain ID: 1\n\
    Nonce: <32891756>\n\
    Issued At: 2021-09-30T16:25:24Z";

#[test]
fn points_at_the_field() {
    let err = parse_siwe_message(MESSAGE, AddressPolicy::Ignore).unwrap_err();
    let out = err.printer().source(MESSAGE).render();

    assert!(out.starts_with("error: invalid Nonce: <32891756>"), "{out}");
    assert!(out.contains("| Nonce: <32891756>"), "{out}");
    assert!(out.contains("^^^^^^^^^^ rejected by the field grammar"), "{out}");
}

#[test]
fn includes_path() {
    let err = parse_siwe_message(MESSAGE, AddressPolicy::Ignore).unwrap_err();
    let out = err.printer().source(MESSAGE).path("message.txt").render();
    assert!(out.contains("message.txt:8:8"), "{out}");
}

#[test]
fn empty_span_gets_a_caret() {
    let text = MESSAGE.replace("URI: ", "URL: ");
    let err = parse_siwe_message(&text, AddressPolicy::Ignore).unwrap_err();
    let out = err.printer().source(&text).render();

    assert!(out.contains("URI missing or invalid prefix"), "{out}");
    assert!(out.contains("^ expected here"), "{out}");
}

#[test]
fn caret_at_end_of_input() {
    let err = SiweError::Syntax { offset: 3 };
    let out = err.printer().source("abc").render();
    assert!(out.starts_with("error: invalid siwe message"), "{out}");
}

#[test]
fn plain_without_source_or_span() {
    let err = parse_siwe_message(MESSAGE, AddressPolicy::Ignore).unwrap_err();
    assert_eq!(
        err.printer().render(),
        "error: invalid Nonce: <32891756>"
    );

    let engine = SiweError::from(RuntimeError::UnknownStartRule("x".into()));
    assert_eq!(engine.span(), None);
    assert!(engine.is_engine());
    assert_eq!(
        engine.printer().source(MESSAGE).render(),
        "error: start rule 'x' not recognized"
    );
}

#[test]
fn colored_output_has_escapes() {
    let err = parse_siwe_message(MESSAGE, AddressPolicy::Ignore).unwrap_err();
    let out = err.printer().source(MESSAGE).colored(true).render();
    assert!(out.contains("\x1b["));
}
