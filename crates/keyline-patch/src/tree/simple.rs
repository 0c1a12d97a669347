//! A built-in structural tree over CSS text.
//!
//! `SimpleTree` is a tolerant structural lexer, not a CSS parser: it finds
//! rules, blocks, declarations, and value tokens, and records nothing about
//! what they mean. That is exactly the granularity the locator and the patch
//! engine need, and it keeps the tree robust on the half-typed source an
//! editing session produces — unbalanced braces and garbage runs degrade to
//! skipped spans, never a failure.

use std::ops::Range;

use crate::tree::{SyntaxTree, kind};

/// Handle to a node in a [`SimpleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

#[derive(Debug)]
struct NodeData {
    kind: &'static str,
    start: usize,
    end: usize,
    first_child: Option<usize>,
    next_sibling: Option<usize>,
}

/// A parsed tree over one snapshot of CSS source text.
#[derive(Debug)]
pub struct SimpleTree {
    nodes: Vec<NodeData>,
}

impl SimpleTree {
    /// Build a tree for the given source text. Never fails; malformed
    /// stretches produce fewer nodes, not errors.
    pub fn parse(text: &str) -> Self {
        let mut builder = Builder {
            text,
            pos: 0,
            nodes: vec![NodeData {
                kind: kind::STYLE_SHEET,
                start: 0,
                end: text.len(),
                first_child: None,
                next_sibling: None,
            }],
        };
        let items = builder.parse_rule_items(false);
        builder.link(0, &items);
        Self {
            nodes: builder.nodes,
        }
    }
}

impl SyntaxTree for SimpleTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> &str {
        self.nodes[node.0].kind
    }

    fn span(&self, node: NodeId) -> Range<usize> {
        let data = &self.nodes[node.0];
        data.start..data.end
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].first_child.map(NodeId)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].next_sibling.map(NodeId)
    }
}

/// Which grammar a block's contents follow.
enum BlockKind {
    /// `property: value;` declarations (style rule and keyframe bodies).
    Declarations,
    /// Keyframe stop headers and their blocks.
    Keyframes,
    /// Nested rules (at-rule bodies like `@media`).
    Rules,
}

struct Builder<'s> {
    text: &'s str,
    pos: usize,
    nodes: Vec<NodeData>,
}

impl<'s> Builder<'s> {
    fn byte(&self, at: usize) -> Option<u8> {
        self.text.as_bytes().get(at).copied()
    }

    fn peek(&self) -> Option<u8> {
        self.byte(self.pos)
    }

    fn leaf(&mut self, kind: &'static str, start: usize, end: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            start,
            end,
            first_child: None,
            next_sibling: None,
        });
        id
    }

    fn node(&mut self, kind: &'static str, span: Range<usize>, children: &[usize]) -> usize {
        let id = self.leaf(kind, span.start, span.end);
        self.link(id, children);
        id
    }

    fn link(&mut self, parent: usize, children: &[usize]) {
        let mut iter = children.iter().copied();
        let Some(first) = iter.next() else {
            return;
        };
        self.nodes[parent].first_child = Some(first);
        let mut prev = first;
        for child in iter {
            self.nodes[prev].next_sibling = Some(child);
            prev = child;
        }
    }

    /// Skip whitespace and `/* ... */` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(byte) if byte.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.byte(self.pos + 1) == Some(b'*') => {
                    self.pos += 2;
                    while self.peek().is_some() {
                        if self.peek() == Some(b'*') && self.byte(self.pos + 1) == Some(b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip a quoted string, including the closing quote if present.
    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(byte) = self.peek() {
            self.pos += 1;
            match byte {
                b'\\' => self.pos += 1,
                byte if byte == quote => break,
                _ => {}
            }
        }
    }

    fn scan_ident(&mut self) {
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte >= 0x80 {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Scan a number with optional sign, fraction, and unit (`-0.5s`, `50%`).
    fn scan_number(&mut self) {
        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        while self
            .peek()
            .is_some_and(|byte| byte.is_ascii_alphabetic() || byte == b'%')
        {
            self.pos += 1;
        }
    }

    fn starts_number(&self) -> bool {
        match self.peek() {
            Some(byte) if byte.is_ascii_digit() => true,
            Some(b'.') | Some(b'+') | Some(b'-') => self
                .byte(self.pos + 1)
                .is_some_and(|byte| byte.is_ascii_digit() || byte == b'.'),
            _ => false,
        }
    }

    fn starts_ident(&self) -> bool {
        self.peek()
            .is_some_and(|byte| byte.is_ascii_alphabetic() || byte == b'-' || byte == b'_' || byte >= 0x80)
    }

    /// Skip a balanced `( ... )` run, tolerating EOF.
    fn skip_balanced_parens(&mut self) {
        let mut depth = 0usize;
        while let Some(byte) = self.peek() {
            match byte {
                b'(' => {
                    depth += 1;
                    self.pos += 1;
                }
                b')' => {
                    self.pos += 1;
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                b'"' | b'\'' => self.skip_string(byte),
                _ => self.pos += 1,
            }
        }
    }

    /// Parse a run of rules until EOF (or `}` when inside a block).
    fn parse_rule_items(&mut self, stop_at_close: bool) -> Vec<usize> {
        let mut items = vec![];
        loop {
            self.skip_trivia();
            match self.peek() {
                None => break,
                Some(b'}') if stop_at_close => break,
                Some(b'}') | Some(b';') => self.pos += 1,
                Some(b'@') => {
                    if let Some(id) = self.parse_at_rule() {
                        items.push(id);
                    }
                }
                _ => {
                    if let Some(id) = self.parse_qualified_rule() {
                        items.push(id);
                    }
                }
            }
        }
        items
    }

    fn parse_at_rule(&mut self) -> Option<usize> {
        let start = self.pos;
        self.pos += 1; // '@'
        let name_start = self.pos;
        self.scan_ident();
        let name = &self.text[name_start..self.pos];

        if name.eq_ignore_ascii_case("keyframes") || name.eq_ignore_ascii_case("-webkit-keyframes")
        {
            return Some(self.parse_keyframes_statement(start));
        }

        // Generic at-rule: prelude up to ';' or a block.
        let mut children = vec![];
        loop {
            self.skip_trivia();
            match self.peek() {
                None | Some(b'}') => break,
                Some(b';') => {
                    self.pos += 1;
                    break;
                }
                Some(b'{') => {
                    children.push(self.parse_block(BlockKind::Rules));
                    break;
                }
                Some(byte @ (b'"' | b'\'')) => self.skip_string(byte),
                Some(b'(') => self.skip_balanced_parens(),
                _ => self.pos += 1,
            }
        }
        Some(self.node(kind::AT_RULE, start..self.pos, &children))
    }

    fn parse_keyframes_statement(&mut self, start: usize) -> usize {
        self.skip_trivia();
        let name_start = self.pos;
        self.scan_ident();
        let mut children = vec![];
        if self.pos > name_start {
            children.push(self.leaf(kind::KEYFRAME_NAME, name_start, self.pos));
        }
        self.skip_trivia();
        if self.peek() == Some(b'{') {
            children.push(self.parse_block(BlockKind::Keyframes));
        }
        self.node(kind::KEYFRAMES_STATEMENT, start..self.pos, &children)
    }

    fn parse_qualified_rule(&mut self) -> Option<usize> {
        let start = self.pos;
        loop {
            match self.peek() {
                None | Some(b'}') => {
                    // No block ever arrived; not a rule.
                    return None;
                }
                Some(b';') => {
                    self.pos += 1;
                    return None;
                }
                Some(b'{') => break,
                Some(byte @ (b'"' | b'\'')) => self.skip_string(byte),
                Some(b'(') => self.skip_balanced_parens(),
                Some(b'/') if self.byte(self.pos + 1) == Some(b'*') => self.skip_trivia(),
                _ => self.pos += 1,
            }
        }
        let block = self.parse_block(BlockKind::Declarations);
        Some(self.node(kind::RULE_SET, start..self.pos, &[block]))
    }

    /// Parse a `{ ... }` block, including both braces in its span.
    fn parse_block(&mut self, contents: BlockKind) -> usize {
        let start = self.pos;
        self.pos += 1; // '{'
        let children = match contents {
            BlockKind::Declarations => self.parse_declarations(),
            BlockKind::Keyframes => self.parse_keyframe_items(),
            BlockKind::Rules => self.parse_rule_items(true),
        };
        self.skip_trivia();
        if self.peek() == Some(b'}') {
            self.pos += 1;
        }
        self.node(kind::BLOCK, start..self.pos, &children)
    }

    fn parse_declarations(&mut self) -> Vec<usize> {
        let mut declarations = vec![];
        loop {
            self.skip_trivia();
            match self.peek() {
                None | Some(b'}') => break,
                Some(b';') => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let property_start = self.pos;
            self.scan_ident();
            if self.pos == property_start {
                self.skip_to_declaration_end();
                continue;
            }
            let property_end = self.pos;
            self.skip_trivia();
            if self.peek() != Some(b':') {
                self.skip_to_declaration_end();
                continue;
            }
            self.pos += 1; // ':'

            let mut tokens = vec![self.leaf(kind::PROPERTY_NAME, property_start, property_end)];
            let value_end = self.parse_value_tokens(&mut tokens);
            declarations.push(self.node(
                kind::DECLARATION,
                property_start..value_end,
                &tokens,
            ));
        }
        declarations
    }

    /// Lex value tokens up to `;` or the end of the block. Returns the end
    /// position of the last token (the declaration's semantic end).
    fn parse_value_tokens(&mut self, tokens: &mut Vec<usize>) -> usize {
        let mut last_end = self.pos;
        loop {
            self.skip_trivia();
            match self.peek() {
                None | Some(b';') | Some(b'}') => break,
                Some(b',') => {
                    let start = self.pos;
                    self.pos += 1;
                    tokens.push(self.leaf(kind::COMMA, start, self.pos));
                    last_end = self.pos;
                }
                Some(byte @ (b'"' | b'\'')) => {
                    let start = self.pos;
                    self.skip_string(byte);
                    tokens.push(self.leaf(kind::VALUE_NAME, start, self.pos));
                    last_end = self.pos;
                }
                _ if self.starts_number() => {
                    let start = self.pos;
                    self.scan_number();
                    tokens.push(self.leaf(kind::NUMBER_LITERAL, start, self.pos));
                    last_end = self.pos;
                }
                _ if self.starts_ident() => {
                    let start = self.pos;
                    self.scan_ident();
                    if self.peek() == Some(b'(') {
                        self.skip_balanced_parens();
                        tokens.push(self.leaf(kind::CALL_EXPRESSION, start, self.pos));
                    } else {
                        tokens.push(self.leaf(kind::VALUE_NAME, start, self.pos));
                    }
                    last_end = self.pos;
                }
                _ => self.pos += 1,
            }
        }
        last_end
    }

    fn parse_keyframe_items(&mut self) -> Vec<usize> {
        let mut items = vec![];
        loop {
            self.skip_trivia();
            match self.peek() {
                None | Some(b'}') => break,
                Some(b'{') => items.push(self.parse_block(BlockKind::Declarations)),
                Some(b',') => {
                    let start = self.pos;
                    self.pos += 1;
                    items.push(self.leaf(kind::COMMA, start, self.pos));
                }
                _ if self.starts_number() => {
                    let start = self.pos;
                    self.scan_number();
                    items.push(self.leaf(kind::NUMBER_LITERAL, start, self.pos));
                }
                _ if self.starts_ident() => {
                    let start = self.pos;
                    self.scan_ident();
                    let word = &self.text[start..self.pos];
                    let kind_name = if word.eq_ignore_ascii_case("from") {
                        kind::KEYFRAME_FROM
                    } else if word.eq_ignore_ascii_case("to") {
                        kind::KEYFRAME_TO
                    } else {
                        kind::VALUE_NAME
                    };
                    items.push(self.leaf(kind_name, start, self.pos));
                }
                _ => self.pos += 1,
            }
        }
        items
    }

    /// Error recovery inside a declaration block: skip to the next `;` at
    /// top level, swallowing nested brace/paren runs wholesale.
    fn skip_to_declaration_end(&mut self) {
        let mut depth = 0usize;
        while let Some(byte) = self.peek() {
            match byte {
                b';' if depth == 0 => {
                    self.pos += 1;
                    return;
                }
                b'}' if depth == 0 => return,
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                }
                b'"' | b'\'' => self.skip_string(byte),
                b'(' => self.skip_balanced_parens(),
                _ => self.pos += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::children;

    fn kinds_of_children(tree: &SimpleTree, node: NodeId) -> Vec<&str> {
        children(tree, node).map(|child| tree.kind(child)).collect()
    }

    #[test]
    fn rule_set_structure() {
        let text = ".a { animation: fade 1s; color: red; }";
        let tree = SimpleTree::parse(text);

        let rule = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(rule), kind::RULE_SET);
        assert_eq!(tree.span(rule), 0..text.len());

        let block = tree.child_of_kind(rule, kind::BLOCK).unwrap();
        assert_eq!(&text[tree.span(block)], "{ animation: fade 1s; color: red; }");
        assert_eq!(
            kinds_of_children(&tree, block),
            vec![kind::DECLARATION, kind::DECLARATION]
        );

        let declaration = tree.first_child(block).unwrap();
        assert_eq!(
            kinds_of_children(&tree, declaration),
            vec![kind::PROPERTY_NAME, kind::VALUE_NAME, kind::NUMBER_LITERAL]
        );
        assert_eq!(&text[tree.span(declaration)], "animation: fade 1s");
    }

    #[test]
    fn value_tokens_have_exact_spans() {
        let text = ".a { animation: spin 2s 100ms linear; }";
        let tree = SimpleTree::parse(text);
        let rule = tree.first_child(tree.root()).unwrap();
        let block = tree.child_of_kind(rule, kind::BLOCK).unwrap();
        let declaration = tree.first_child(block).unwrap();

        let texts: Vec<&str> = children(&tree, declaration)
            .map(|token| &text[tree.span(token)])
            .collect();
        assert_eq!(texts, vec!["animation", "spin", "2s", "100ms", "linear"]);
    }

    #[test]
    fn call_expressions_span_their_arguments() {
        let text = ".a { animation-timing-function: cubic-bezier(0.1, 0.2, 0.3, 0.4), linear; }";
        let tree = SimpleTree::parse(text);
        let rule = tree.first_child(tree.root()).unwrap();
        let block = tree.child_of_kind(rule, kind::BLOCK).unwrap();
        let declaration = tree.first_child(block).unwrap();

        let kinds = kinds_of_children(&tree, declaration);
        assert_eq!(
            kinds,
            vec![
                kind::PROPERTY_NAME,
                kind::CALL_EXPRESSION,
                kind::COMMA,
                kind::VALUE_NAME
            ]
        );
        let call = tree.child_of_kind(declaration, kind::CALL_EXPRESSION).unwrap();
        assert_eq!(&text[tree.span(call)], "cubic-bezier(0.1, 0.2, 0.3, 0.4)");
    }

    #[test]
    fn keyframes_structure() {
        let text = "@keyframes fade { from { opacity: 0 } 50%, 75% { opacity: 0.5 } to { opacity: 1 } }";
        let tree = SimpleTree::parse(text);

        let statement = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(statement), kind::KEYFRAMES_STATEMENT);
        let name = tree.child_of_kind(statement, kind::KEYFRAME_NAME).unwrap();
        assert_eq!(&text[tree.span(name)], "fade");

        let block = tree.child_of_kind(statement, kind::BLOCK).unwrap();
        assert_eq!(
            kinds_of_children(&tree, block),
            vec![
                kind::KEYFRAME_FROM,
                kind::BLOCK,
                kind::NUMBER_LITERAL,
                kind::COMMA,
                kind::NUMBER_LITERAL,
                kind::BLOCK,
                kind::KEYFRAME_TO,
                kind::BLOCK,
            ]
        );
    }

    #[test]
    fn media_queries_expose_nested_rules() {
        let text = "@media (min-width: 10px) { .a { animation: fade 1s; } }";
        let tree = SimpleTree::parse(text);

        let at_rule = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(at_rule), kind::AT_RULE);
        let block = tree.child_of_kind(at_rule, kind::BLOCK).unwrap();
        let nested = tree.first_child(block).unwrap();
        assert_eq!(tree.kind(nested), kind::RULE_SET);
    }

    #[test]
    fn comments_and_garbage_do_not_break_the_tree() {
        let text = "/* lead */ .a { 5bad; animation: fade 1s; } .b { }";
        let tree = SimpleTree::parse(text);

        let kinds = kinds_of_children(&tree, tree.root());
        assert_eq!(kinds, vec![kind::RULE_SET, kind::RULE_SET]);
    }

    #[test]
    fn unclosed_block_is_tolerated() {
        let text = ".a { animation: fade 1s";
        let tree = SimpleTree::parse(text);
        let rule = tree.first_child(tree.root()).unwrap();
        let block = tree.child_of_kind(rule, kind::BLOCK).unwrap();
        assert_eq!(tree.span(block).end, text.len());
        assert_eq!(kinds_of_children(&tree, block), vec![kind::DECLARATION]);
    }
}
