//! Recursive-descent parser building the directive tree.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::template::ast::Node;
use crate::template::error::{TemplateError, TemplateResult};
use crate::template::expr::{self, is_identifier};
use crate::template::lexer::{self, Token, TokenKind};

/// Block currently being parsed, with the offset of its opening tag.
#[derive(Debug, Clone, Copy)]
enum Block {
    For(usize),
    If(usize),
}

impl Block {
    fn tag(self) -> &'static str {
        match self {
            Block::For(_) => "for",
            Block::If(_) => "if",
        }
    }

    fn offset(self) -> usize {
        match self {
            Block::For(offset) | Block::If(offset) => offset,
        }
    }
}

/// Parse directive markup into a list of nodes.
pub fn parse(source: &str) -> TemplateResult<Vec<Node>> {
    let mut parser = Parser {
        tokens: lexer::tokenize(source).into_iter().peekable(),
    };
    parser.parse_block(None)
}

struct Parser<'a> {
    tokens: Peekable<IntoIter<Token<'a>>>,
}

impl Parser<'_> {
    fn parse_block(&mut self, open: Option<Block>) -> TemplateResult<Vec<Node>> {
        let mut nodes = Vec::new();

        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::Text(text) => push_text(&mut nodes, text),
                TokenKind::Interpolation(source) => {
                    nodes.push(Node::Interpolation(expr::parse(source)?));
                }
                TokenKind::Attribute { name, value } => {
                    nodes.push(Node::AttributeBinding {
                        name: name.to_string(),
                        value: expr::parse(value)?,
                    });
                }
                TokenKind::ForOpen { item, collection } => {
                    if !is_identifier(item) {
                        return Err(TemplateError::InvalidLoopBinding {
                            binding: item.to_string(),
                            offset: token.offset,
                        });
                    }
                    let collection = expr::parse(collection)?;
                    let body = self.parse_block(Some(Block::For(token.offset)))?;
                    nodes.push(Node::Loop {
                        item: item.to_string(),
                        collection,
                        body,
                    });
                }
                TokenKind::IfOpen(condition) => {
                    let condition = expr::parse(condition)?;
                    let body = self.parse_block(Some(Block::If(token.offset)))?;
                    nodes.push(Node::Conditional { condition, body });
                }
                TokenKind::ForClose => {
                    return close(open, Block::For(token.offset), nodes);
                }
                TokenKind::IfClose => {
                    return close(open, Block::If(token.offset), nodes);
                }
            }
        }

        match open {
            None => Ok(nodes),
            Some(block) => Err(TemplateError::Unclosed {
                tag: block.tag(),
                offset: block.offset(),
            }),
        }
    }
}

fn close(open: Option<Block>, closing: Block, nodes: Vec<Node>) -> TemplateResult<Vec<Node>> {
    match (open, closing) {
        (Some(Block::For(_)), Block::For(_)) | (Some(Block::If(_)), Block::If(_)) => Ok(nodes),
        _ => Err(TemplateError::UnexpectedClose {
            tag: closing.tag(),
            offset: closing.offset(),
        }),
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::expr::Expr;

    fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    #[test]
    fn test_flat_markup() {
        let nodes = parse("<h1>{{ title }}</h1>").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("<h1>".into()),
                Node::Interpolation(var("title")),
                Node::Text("</h1>".into()),
            ]
        );
    }

    #[test]
    fn test_nested_blocks() {
        let source = r#"<for condition="let row in rows"><if condition="row">{{row}}</if></for>"#;
        let nodes = parse(source).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Loop {
                item: "row".into(),
                collection: var("rows"),
                body: vec![Node::Conditional {
                    condition: var("row"),
                    body: vec![Node::Interpolation(var("row"))],
                }],
            }]
        );
    }

    #[test]
    fn test_nested_loops() {
        let source = concat!(
            r#"<for condition="let a in xs">"#,
            r#"<for condition="let b in a">{{b}}</for>"#,
            r#"</for>"#,
        );
        let nodes = parse(source).unwrap();
        match &nodes[0] {
            Node::Loop { body, .. } => assert!(matches!(body[0], Node::Loop { .. })),
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_block() {
        let err = parse(r#"<p><for condition="let i in xs">{{i}}"#).unwrap_err();
        assert_eq!(err, TemplateError::Unclosed { tag: "for", offset: 3 });
    }

    #[test]
    fn test_stray_and_mismatched_close() {
        let err = parse("text</if>").unwrap_err();
        assert_eq!(err, TemplateError::UnexpectedClose { tag: "if", offset: 4 });

        let err = parse(r#"<if condition="a"></for>"#).unwrap_err();
        assert!(matches!(err, TemplateError::UnexpectedClose { tag: "for", .. }));
    }

    #[test]
    fn test_invalid_loop_binding() {
        let err = parse(r#"<for condition="let a b in xs"></for>"#).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidLoopBinding { .. }));
    }

    #[test]
    fn test_bad_expression() {
        let err = parse("{{ a ++ }}").unwrap_err();
        assert!(matches!(err, TemplateError::Expression { .. }));
    }
}
