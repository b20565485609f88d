//! Recursive-descent parser over the token stream
//!
//! Blocks are matched balanced: an inner `{{#each}}` claims the next
//! `{{/each}}`, so nesting is unambiguous. Parsing is total, like the
//! lexer: a block opener that never finds its closer is demoted to literal
//! text (its already-parsed body is kept), and a stray closer at the top
//! level stays literal too.

use super::ast::{EachBlock, Marker, Node};
use super::lexer::{Token, lex};

/// Parse template source into a node list. Cannot fail.
pub fn parse(source: &str) -> Vec<Node> {
    let tokens = lex(source);
    let mut pos = 0;
    let (nodes, _closed) = parse_nodes(&tokens, &mut pos, false);
    nodes
}

/// Returns the parsed nodes and whether a matching `{{/each}}` was consumed
/// (only meaningful when `nested`).
fn parse_nodes(tokens: &[Token<'_>], pos: &mut usize, nested: bool) -> (Vec<Node>, bool) {
    let mut nodes = Vec::new();

    while *pos < tokens.len() {
        match &tokens[*pos] {
            Token::Text(text) => {
                nodes.push(Node::Text((*text).to_string()));
                *pos += 1;
            }
            Token::Marker { raw, inner } => {
                nodes.push(Node::Marker(Marker::from_inner(raw, inner)));
                *pos += 1;
            }
            Token::EachClose { raw } => {
                *pos += 1;
                if nested {
                    return (nodes, true);
                }
                nodes.push(Node::Text((*raw).to_string()));
            }
            Token::EachOpen { raw, path, var } => {
                *pos += 1;
                let (body, closed) = parse_nodes(tokens, pos, true);
                if closed {
                    nodes.push(Node::Each(EachBlock {
                        path: path.trim().to_string(),
                        var: var.trim().to_string(),
                        body,
                    }));
                } else {
                    // unclosed block: the opener becomes literal text and
                    // its would-be body rejoins the current level
                    nodes.push(Node::Text((*raw).to_string()));
                    nodes.extend(body);
                }
            }
        }
    }

    (nodes, false)
}
