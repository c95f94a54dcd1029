//! Directive tokenizer.
//!
//! All directive forms are matched by a single alternation in textual order.
//! Everything between two matches becomes a `Text` token, so concatenating
//! the raw source of every token reproduces the input.

use std::sync::LazyLock;

use regex::Regex;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\{\{(?P<interp>.*?)\}\}",
        r#"|<for\s+condition="\s*let\s+(?P<item>.+?)\s+in\s+(?P<collection>.+?)"\s*>"#,
        r"|(?P<for_close></for\s*>)",
        r#"|<if\s+condition="(?P<cond>.*?)"\s*>"#,
        r"|(?P<if_close></if\s*>)",
        r#"|\[(?P<attr>[A-Za-z_:@][-A-Za-z0-9_:.@]*)\]="(?P<value>.*?)""#,
    ))
    .expect("directive pattern is valid")
});

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind<'a> {
    Text(&'a str),
    Interpolation(&'a str),
    ForOpen { item: &'a str, collection: &'a str },
    ForClose,
    IfOpen(&'a str),
    IfClose,
    Attribute { name: &'a str, value: &'a str },
}

/// A token with the byte offset where its source begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

/// Split `source` into directive and text tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in DIRECTIVE.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };

        if whole.start() > last {
            tokens.push(Token {
                kind: TokenKind::Text(&source[last..whole.start()]),
                offset: last,
            });
        }

        let group = |name: &str| caps.name(name).map(|m| m.as_str());

        let kind = if let Some(expr) = group("interp") {
            TokenKind::Interpolation(expr.trim())
        } else if let (Some(item), Some(collection)) = (group("item"), group("collection")) {
            TokenKind::ForOpen {
                item: item.trim(),
                collection: collection.trim(),
            }
        } else if group("for_close").is_some() {
            TokenKind::ForClose
        } else if let Some(cond) = group("cond") {
            TokenKind::IfOpen(cond.trim())
        } else if group("if_close").is_some() {
            TokenKind::IfClose
        } else if let (Some(name), Some(value)) = (group("attr"), group("value")) {
            TokenKind::Attribute {
                name,
                value: value.trim(),
            }
        } else {
            TokenKind::Text(whole.as_str())
        };

        tokens.push(Token {
            kind,
            offset: whole.start(),
        });
        last = whole.end();
    }

    if last < source.len() {
        tokens.push(Token {
            kind: TokenKind::Text(&source[last..]),
            offset: last,
        });
    }

    tokens
}
