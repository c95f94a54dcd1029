//! Expression language used inside directives.
//!
//! # Grammar
//! ```text
//! or      := and ( "||" and )*
//! and     := equal ( "&&" equal )*
//! equal   := compare ( ( "==" | "!=" | "===" | "!==" ) compare )*
//! compare := unary ( ( "<" | "<=" | ">" | ">=" ) unary )*
//! unary   := ( "!" | "-" ) unary | postfix
//! postfix := primary ( "." IDENT | "[" or "]" )*
//! primary := NUMBER | STRING | true | false | null | IDENT | "(" or ")"
//! ```
//! `==` and the relational operators coerce like JavaScript (route params are
//! strings, so `params.page == 1` holds for `page = "1"`); `===` and `!==`
//! never coerce.

use std::fmt;

use serde_json::{Number, Value};

use crate::template::error::{TemplateError, TemplateResult};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne | BinOp::StrictEq | BinOp::StrictNe => 3,
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 4,
        }
    }
}

/// A parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(String),
    Member(Box<Expr>, String),
    Index(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
}

const UNARY: u8 = 5;
const POSTFIX: u8 = 6;
const PRIMARY: u8 = 7;

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Literal(_) | Expr::Var(_) => PRIMARY,
            Expr::Member(..) | Expr::Index(..) => POSTFIX,
            Expr::Not(_) | Expr::Neg(_) => UNARY,
            Expr::Binary(_, op, _) => op.precedence(),
        }
    }
}

/// Writes `expr`, parenthesized when it binds looser than `min`.
struct Operand<'a>(&'a Expr, u8);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.precedence() < self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Member(object, name) => write!(f, "{}.{}", Operand(object, POSTFIX), name),
            Expr::Index(object, index) => write!(f, "{}[{}]", Operand(object, POSTFIX), index),
            Expr::Not(inner) => write!(f, "!{}", Operand(inner, UNARY)),
            Expr::Neg(inner) => write!(f, "-{}", Operand(inner, UNARY)),
            Expr::Binary(left, op, right) => {
                // Left-associative: an equal-precedence right operand needs parens.
                let p = op.precedence();
                write!(
                    f,
                    "{} {} {}",
                    Operand(left, p),
                    op.symbol(),
                    Operand(right, p + 1)
                )
            }
        }
    }
}

/// Returns true if `s` is a valid variable name.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Parse an expression source.
pub fn parse(source: &str) -> TemplateResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = ExprParser {
        source,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_or()?;
    match parser.peek() {
        Tok::Eof => Ok(expr),
        other => Err(parser.error(format!("unexpected {:?}", other))),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Number(f64),
    Str(String),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Not,
    Minus,
    Op(BinOp),
    Eof,
}

fn tokenize(source: &str) -> TemplateResult<Vec<Tok>> {
    let error = |message: String| TemplateError::Expression {
        source_text: source.to_string(),
        message,
    };

    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let n = text
                .parse::<f64>()
                .map_err(|_| error(format!("invalid number '{}'", text)))?;
            tokens.push(Tok::Number(n));
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = c;
            let mut value = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(error("unterminated string".to_string())),
                    Some(&ch) if ch == quote => {
                        i += 1;
                        break;
                    }
                    Some(&'\\') => {
                        let escaped = chars
                            .get(i + 1)
                            .ok_or_else(|| error("unterminated string".to_string()))?;
                        value.push(match *escaped {
                            'n' => '\n',
                            't' => '\t',
                            other => other,
                        });
                        i += 2;
                    }
                    Some(&ch) => {
                        value.push(ch);
                        i += 1;
                    }
                }
            }
            tokens.push(Tok::Str(value));
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
            {
                i += 1;
            }
            tokens.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        let (tok, width) = match (c, next) {
            ('=', Some('=')) if chars.get(i + 2) == Some(&'=') => (Tok::Op(BinOp::StrictEq), 3),
            ('=', Some('=')) => (Tok::Op(BinOp::Eq), 2),
            ('!', Some('=')) if chars.get(i + 2) == Some(&'=') => (Tok::Op(BinOp::StrictNe), 3),
            ('!', Some('=')) => (Tok::Op(BinOp::Ne), 2),
            ('!', _) => (Tok::Not, 1),
            ('<', Some('=')) => (Tok::Op(BinOp::Le), 2),
            ('<', _) => (Tok::Op(BinOp::Lt), 1),
            ('>', Some('=')) => (Tok::Op(BinOp::Ge), 2),
            ('>', _) => (Tok::Op(BinOp::Gt), 1),
            ('&', Some('&')) => (Tok::Op(BinOp::And), 2),
            ('|', Some('|')) => (Tok::Op(BinOp::Or), 2),
            ('.', _) => (Tok::Dot, 1),
            ('[', _) => (Tok::LBracket, 1),
            (']', _) => (Tok::RBracket, 1),
            ('(', _) => (Tok::LParen, 1),
            (')', _) => (Tok::RParen, 1),
            ('-', _) => (Tok::Minus, 1),
            _ => return Err(error(format!("unexpected character '{}'", c))),
        };
        tokens.push(tok);
        i += width;
    }

    tokens.push(Tok::Eof);
    Ok(tokens)
}

struct ExprParser<'a> {
    source: &'a str,
    tokens: Vec<Tok>,
    pos: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> &Tok {
        self.tokens.get(self.pos).unwrap_or(&Tok::Eof)
    }

    fn advance(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Tok) -> TemplateResult<()> {
        let tok = self.advance();
        if tok == expected {
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", expected, tok)))
        }
    }

    fn error(&self, message: String) -> TemplateError {
        TemplateError::Expression {
            source_text: self.source.to_string(),
            message,
        }
    }

    fn parse_binary(
        &mut self,
        ops: &[BinOp],
        next: fn(&mut Self) -> TemplateResult<Expr>,
    ) -> TemplateResult<Expr> {
        let mut left = next(self)?;
        while let Tok::Op(op) = *self.peek() {
            if !ops.contains(&op) {
                break;
            }
            self.advance();
            let right = next(self)?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> TemplateResult<Expr> {
        self.parse_binary(&[BinOp::Or], Self::parse_and)
    }

    fn parse_and(&mut self) -> TemplateResult<Expr> {
        self.parse_binary(&[BinOp::And], Self::parse_equal)
    }

    fn parse_equal(&mut self) -> TemplateResult<Expr> {
        self.parse_binary(
            &[BinOp::Eq, BinOp::Ne, BinOp::StrictEq, BinOp::StrictNe],
            Self::parse_compare,
        )
    }

    fn parse_compare(&mut self) -> TemplateResult<Expr> {
        self.parse_binary(
            &[BinOp::Lt, BinOp::Le, BinOp::Gt, BinOp::Ge],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> TemplateResult<Expr> {
        match self.peek() {
            Tok::Not => {
                self.advance();
                Ok(Expr::Not(Box::new(self.parse_unary()?)))
            }
            Tok::Minus => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> TemplateResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek() {
                Tok::Dot => {
                    self.advance();
                    match self.advance() {
                        Tok::Ident(name) => expr = Expr::Member(Box::new(expr), name),
                        other => {
                            return Err(self.error(format!("expected property name, found {:?}", other)))
                        }
                    }
                }
                Tok::LBracket => {
                    self.advance();
                    let index = self.parse_or()?;
                    self.expect(Tok::RBracket)?;
                    expr = Expr::Index(Box::new(expr), Box::new(index));
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> TemplateResult<Expr> {
        match self.advance() {
            Tok::Number(n) => Ok(Expr::Literal(number_value(n))),
            Tok::Str(s) => Ok(Expr::Literal(Value::String(s))),
            Tok::Ident(name) => Ok(match name.as_str() {
                "true" => Expr::Literal(Value::Bool(true)),
                "false" => Expr::Literal(Value::Bool(false)),
                "null" | "undefined" => Expr::Literal(Value::Null),
                _ => Expr::Var(name),
            }),
            Tok::LParen => {
                let inner = self.parse_or()?;
                self.expect(Tok::RParen)?;
                Ok(inner)
            }
            Tok::Eof => Err(self.error("unexpected end of expression".to_string())),
            other => Err(self.error(format!("unexpected {:?}", other))),
        }
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
