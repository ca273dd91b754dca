//! The SIWE message grammar, with the RFC 3339 date-time and RFC 3986 URI
//! grammars it depends on.
//!
//! Field rules prefixed with `f` are permissive ("anything but a line feed")
//! and only slice the message into lines; the unprefixed rules validate each
//! field strictly on a second pass.
//!
//! RFC 3986 deviations:
//! - `IPv6address` is split into `nodcolon` / `dcolon`; the number of 16-bit
//!   groups is checked by callbacks.
//! - `dec-octet` is `*3dec-digit`; the value is checked by a callback, so
//!   zero-padded octets are accepted.
//! - `host` rejects an IPv4 address followed by a `reg-name` character, so
//!   `1.2.3.4.example` parses as a registered name.

use std::sync::OnceLock;

use siwe_bytecode::builder::*;
use siwe_bytecode::{Expr, Grammar, GrammarError};

/// Start rule of the structural pass.
pub const FIRST_PASS: &str = "siwe-first-pass";

/// The bundled grammar, built on first use.
pub fn siwe_grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| build().expect("bundled SIWE grammar is well-formed"))
}

fn lf() -> Expr {
    ch(10)
}

/// Any codepoint in 0-127 except line feed.
fn line_char() -> Expr {
    alt([rng(0, 9), rng(11, 127)])
}

fn digit() -> Expr {
    rng(48, 57)
}

fn lower() -> Expr {
    rng(97, 122)
}

fn upper() -> Expr {
    rng(65, 90)
}

fn hexdig() -> Expr {
    alt([digit(), rng(65, 70), rng(97, 102)])
}

fn segments() -> Expr {
    star(cat([tbs("/"), rnm("segment")]))
}

fn h16_groups() -> Expr {
    cat([rnm("h16n"), star(rnm("h16cn"))])
}

fn ipv4_tail() -> Expr {
    opt(cat([ch(58), rnm("IPv4address")]))
}

pub fn build() -> Result<Grammar, GrammarError> {
    GrammarBuilder::new()
        .rule(
            FIRST_PASS,
            cat([
                opt(rnm("ffscheme")),
                rnm("fdomain"),
                tbs(" wants you to sign in with your Ethereum account:"),
                lf(),
                rnm("faddress"),
                lf(),
                alt([
                    rnm("empty-statement"),
                    rnm("no-statement"),
                    rnm("actual-statement"),
                ]),
                rnm("pre-uri"),
                rnm("furi"),
                lf(),
                rnm("pre-version"),
                rnm("fversion"),
                lf(),
                rnm("pre-chain-id"),
                rnm("fchain-id"),
                lf(),
                rnm("pre-nonce"),
                rnm("fnonce"),
                lf(),
                rnm("pre-issued-at"),
                rnm("fissued-at"),
                opt(cat([lf(), tbs("Expiration Time: "), rnm("fexpiration-time")])),
                opt(cat([lf(), tbs("Not Before: "), rnm("fnot-before")])),
                opt(cat([lf(), tbs("Request ID: "), rnm("frequest-id")])),
                opt(cat([lf(), tbs("Resources:"), rnm("fresources")])),
            ]),
        )
        .rule("pre-uri", tbs("URI: "))
        .rule("pre-version", tbs("Version: "))
        .rule("pre-chain-id", tbs("Chain ID: "))
        .rule("pre-nonce", tbs("Nonce: "))
        .rule("pre-issued-at", tbs("Issued At: "))
        .rule("ffscheme", cat([rnm("fscheme"), tbs("://")]))
        .rule("fdomain", plus(alt([rng(0, 31), rng(33, 127)])))
        .rule("fissued-at", plus(line_char()))
        .rule("fexpiration-time", plus(line_char()))
        .rule("fnot-before", plus(line_char()))
        .rule("furi", plus(line_char()))
        .rule("fscheme", plus(alt([rng(0, 57), rng(59, 127)])))
        .rule("faddress", plus(line_char()))
        .rule("fstatement", plus(line_char()))
        .rule("fversion", plus(line_char()))
        .rule("fchain-id", plus(line_char()))
        .rule("fnonce", plus(line_char()))
        .rule("frequest-id", star(line_char()))
        .rule("fresources", star(cat([lf(), rnm("fresource")])))
        .rule("fresource", cat([tls("- "), plus(line_char())]))
        .rule("no-statement", tbs("\n\n"))
        .rule("empty-statement", tbs("\n\n\n"))
        .rule(
            "actual-statement",
            cat([lf(), rnm("fstatement"), tbs("\n\n")]),
        )
        // Strict field rules.
        .rule("domain", rnm("authority"))
        .rule("address", cat([tbs("0x"), rep(40, 40, hexdig())]))
        .rule(
            "statement",
            plus(alt([rnm("reserved"), rnm("unreserved"), tls(" ")])),
        )
        .rule("version", tbs("1"))
        .rule("chain-id", plus(digit()))
        .rule("nonce", rep_min(8, alt([lower(), upper(), digit()])))
        .rule("issued-at", rnm("date-time"))
        .rule("expiration-time", rnm("date-time"))
        .rule("not-before", rnm("date-time"))
        .rule("request-id", star(rnm("pchar")))
        .rule("resources", star(cat([lf(), rnm("resource")])))
        .rule("resource", cat([tbs("- "), rnm("URI")]))
        // RFC 3339
        .rule("date-fullyear", rep(4, 4, digit()))
        .rule("date-month", rep(2, 2, digit()))
        .rule("date-mday", rep(2, 2, digit()))
        .rule("time-hour", rep(2, 2, digit()))
        .rule("time-minute", rep(2, 2, digit()))
        .rule("time-second", rep(2, 2, digit()))
        .rule("time-secfrac", cat([tbs("."), plus(digit())]))
        .rule(
            "time-numoffset",
            cat([
                alt([tbs("+"), tbs("-")]),
                rnm("time-hour"),
                tbs(":"),
                rnm("time-minute"),
            ]),
        )
        .rule("time-offset", alt([tls("Z"), rnm("time-numoffset")]))
        .rule(
            "partial-time",
            cat([
                rnm("time-hour"),
                tbs(":"),
                rnm("time-minute"),
                tbs(":"),
                rnm("time-second"),
                opt(rnm("time-secfrac")),
            ]),
        )
        .rule(
            "full-date",
            cat([
                rnm("date-fullyear"),
                tbs("-"),
                rnm("date-month"),
                tbs("-"),
                rnm("date-mday"),
            ]),
        )
        .rule("full-time", cat([rnm("partial-time"), rnm("time-offset")]))
        .rule(
            "date-time",
            cat([rnm("full-date"), tls("T"), rnm("full-time")]),
        )
        // RFC 3986
        .rule(
            "URI",
            cat([
                rnm("scheme"),
                tbs(":"),
                rnm("hier-part"),
                opt(cat([tbs("?"), rnm("query")])),
                opt(cat([tbs("#"), rnm("fragment")])),
            ]),
        )
        .rule(
            "hier-part",
            alt([
                cat([tbs("//"), rnm("authority"), rnm("path-abempty")]),
                rnm("path-absolute"),
                rnm("path-rootless"),
                rnm("path-empty"),
            ]),
        )
        .rule(
            "authority",
            cat([
                opt(rnm("userinfo-at")),
                rnm("host"),
                opt(cat([tbs(":"), rnm("port")])),
            ]),
        )
        .rule("path-abempty", segments())
        .rule(
            "path-absolute",
            cat([tbs("/"), opt(cat([rnm("segment-nz"), segments()]))]),
        )
        .rule("path-rootless", cat([rnm("segment-nz"), segments()]))
        .rule("path-empty", tls(""))
        // Includes the "@" so a bare host never matches as userinfo.
        .rule("userinfo-at", cat([rnm("userinfo"), ch(64)]))
        .rule(
            "userinfo",
            star(alt([
                lower(),
                upper(),
                digit(),
                rnm("pct-encoded"),
                ch(33),
                ch(36),
                rng(38, 46),
                rng(58, 59),
                ch(61),
                ch(95),
                ch(126),
            ])),
        )
        .rule(
            "host",
            alt([
                rnm("IP-literal"),
                cat([rnm("IPv4address"), not(rnm("reg-name-char"))]),
                rnm("reg-name"),
            ]),
        )
        .rule(
            "IP-literal",
            cat([
                tbs("["),
                alt([rnm("IPv6address"), rnm("IPvFuture")]),
                tbs("]"),
            ]),
        )
        .rule(
            "IPvFuture",
            cat([
                tls("v"),
                plus(hexdig()),
                tls("."),
                plus(alt([
                    lower(),
                    upper(),
                    digit(),
                    ch(33),
                    ch(36),
                    rng(38, 46),
                    rng(58, 59),
                    ch(61),
                    ch(95),
                    ch(126),
                ])),
            ]),
        )
        .rule("IPv6address", alt([rnm("nodcolon"), rnm("dcolon")]))
        .rule("nodcolon", cat([h16_groups(), ipv4_tail()]))
        .rule(
            "dcolon",
            cat([
                opt(cat([rnm("h16"), star(rnm("h16c"))])),
                tbs("::"),
                alt([
                    cat([h16_groups(), ipv4_tail()]),
                    opt(rnm("IPv4address")),
                ]),
            ]),
        )
        .rule("h16", rep(1, 4, hexdig()))
        .rule("h16c", cat([ch(58), rep(1, 4, hexdig())]))
        .rule("h16n", cat([rep(1, 4, hexdig()), not(ch(46))]))
        .rule("h16cn", cat([ch(58), rep(1, 4, hexdig()), not(ch(46))]))
        .rule(
            "IPv4address",
            cat([
                rnm("dec-octet"),
                tbs("."),
                rnm("dec-octet"),
                tbs("."),
                rnm("dec-octet"),
                tbs("."),
                rnm("dec-octet"),
            ]),
        )
        .rule("dec-octet", rep(0, 3, rnm("dec-digit")))
        .rule("dec-digit", digit())
        .rule("reg-name", star(rnm("reg-name-char")))
        .rule(
            "reg-name-char",
            alt([
                lower(),
                upper(),
                digit(),
                rnm("pct-encoded"),
                ch(33),
                ch(36),
                rng(38, 46),
                ch(59),
                ch(61),
                ch(95),
                ch(126),
            ]),
        )
        .rule("port", star(digit()))
        .rule("query", star(alt([rnm("pchar"), ch(47), ch(63)])))
        .rule("fragment", star(alt([rnm("pchar"), ch(47), ch(63)])))
        .rule("segment", star(rnm("pchar")))
        .rule("segment-nz", plus(rnm("pchar")))
        .rule(
            "scheme",
            cat([
                alt([lower(), upper()]),
                star(alt([lower(), upper(), digit(), ch(43), rng(45, 46)])),
            ]),
        )
        .rule(
            "pchar",
            alt([
                lower(),
                rng(64, 90),
                rng(48, 59),
                ch(33),
                ch(36),
                rng(38, 46),
                ch(61),
                ch(95),
                ch(126),
                rnm("pct-encoded"),
            ]),
        )
        .rule("pct-encoded", cat([tbs("%"), hexdig(), hexdig()]))
        .rule(
            "unreserved",
            alt([lower(), upper(), digit(), rng(45, 46), ch(95), ch(126)]),
        )
        .rule(
            "reserved",
            alt([
                ch(33),
                rng(35, 36),
                rng(38, 44),
                ch(47),
                rng(58, 59),
                ch(61),
                rng(63, 64),
                ch(91),
                ch(93),
            ]),
        )
        .build()
}
