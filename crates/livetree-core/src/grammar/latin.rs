//! Bundled natural-language grammar
//!
//! Produces the concrete syntax tree
//! `Root > Paragraph > Sentence > (Word > Text | WhiteSpace | Punctuation)`.
//! Every byte of the input lands in exactly one text value, so rendering the
//! tree gives back the input.
//!
//! Lexing uses logos, which compiles the patterns to a DFA at build time.
//! Words joined by an inner apostrophe or hyphen (`don't`, `well-known`) are
//! merged after lexing instead of in the pattern, keeping the patterns free
//! of lookahead.

use logos::Logos;
use std::ops::Range;

use super::{Grammar, Tokenizer};
use crate::model::SnapshotTree;

pub const ROOT_NODE: &str = "RootNode";
pub const PARAGRAPH_NODE: &str = "ParagraphNode";
pub const SENTENCE_NODE: &str = "SentenceNode";
pub const WORD_NODE: &str = "WordNode";
pub const TEXT_NODE: &str = "TextNode";
pub const WHITE_SPACE_NODE: &str = "WhiteSpaceNode";
pub const PUNCTUATION_NODE: &str = "PunctuationNode";

/// Latin-script grammar with `Root`, `Paragraph` and `Sentence` entry points
#[derive(Debug, Clone, Copy, Default)]
pub struct LatinGrammar;

impl LatinGrammar {
    pub fn parse_root(text: &str) -> SnapshotTree {
        root(text, &lex(text))
    }

    pub fn parse_paragraph(text: &str) -> SnapshotTree {
        paragraph(text, &lex(text))
    }

    pub fn parse_sentence(text: &str) -> SnapshotTree {
        sentence(text, &lex(text))
    }
}

impl Grammar for LatinGrammar {
    fn entry_point(&self, name: &str) -> Option<Tokenizer> {
        match name {
            "Root" => Some(LatinGrammar::parse_root),
            "Paragraph" => Some(LatinGrammar::parse_paragraph),
            "Sentence" => Some(LatinGrammar::parse_sentence),
            _ => None,
        }
    }
}

// ===== Lexing =====

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    #[regex(r"[\p{L}\p{M}\p{N}]+")]
    Word,

    #[regex(r"\s+")]
    WhiteSpace,

    #[regex(r"[^\p{L}\p{M}\p{N}\s]")]
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: Lexeme,
    span: Range<usize>,
}

impl Token {
    fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.span.clone()]
    }
}

fn lex(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = Lexeme::lexer(text);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            // Anything the patterns miss is punctuation, one node per char
            Err(()) => {
                for (offset, ch) in text[span.clone()].char_indices() {
                    let start = span.start + offset;
                    tokens.push(Token {
                        kind: Lexeme::Punctuation,
                        span: start..start + ch.len_utf8(),
                    });
                }
            }
        }
    }

    join_words(text, tokens)
}

fn is_word_joiner(slice: &str) -> bool {
    matches!(slice, "'" | "\u{2019}" | "-")
}

/// Merge `Word Joiner Word` sequences into one word token
fn join_words(text: &str, tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let joins = token.kind == Lexeme::Punctuation
            && is_word_joiner(token.slice(text))
            && out.last().is_some_and(|prev| prev.kind == Lexeme::Word)
            && tokens.get(i + 1).is_some_and(|next| next.kind == Lexeme::Word);

        match out.last_mut() {
            Some(prev) if joins => {
                prev.span.end = tokens[i + 1].span.end;
                i += 2;
            }
            _ => {
                out.push(token.clone());
                i += 1;
            }
        }
    }

    out
}

fn is_terminal(token: &Token, text: &str) -> bool {
    token.kind == Lexeme::Punctuation && matches!(token.slice(text), "." | "?" | "!" | "\u{2026}")
}

fn is_line_break(token: &Token, text: &str) -> bool {
    token.kind == Lexeme::WhiteSpace && token.slice(text).contains('\n')
}

// ===== Tree building =====

fn leaf(token: &Token, text: &str) -> SnapshotTree {
    let value = token.slice(text);
    match token.kind {
        Lexeme::Word => {
            SnapshotTree::parent(WORD_NODE, vec![SnapshotTree::text(TEXT_NODE, value)])
        }
        Lexeme::WhiteSpace => SnapshotTree::text(WHITE_SPACE_NODE, value),
        Lexeme::Punctuation => SnapshotTree::text(PUNCTUATION_NODE, value),
    }
}

fn sentence(text: &str, tokens: &[Token]) -> SnapshotTree {
    SnapshotTree::parent(
        SENTENCE_NODE,
        tokens.iter().map(|token| leaf(token, text)).collect(),
    )
}

fn paragraph(text: &str, tokens: &[Token]) -> SnapshotTree {
    let mut children = Vec::new();
    let mut start = 0;

    while start < tokens.len() {
        // Whitespace between sentences belongs to the paragraph
        if tokens[start].kind == Lexeme::WhiteSpace {
            children.push(leaf(&tokens[start], text));
            start += 1;
            continue;
        }

        let mut end = start;
        while end < tokens.len() && !is_terminal(&tokens[end], text) {
            end += 1;
        }
        while end < tokens.len() && is_terminal(&tokens[end], text) {
            end += 1;
        }

        // Trailing whitespace of an unterminated sentence stays outside it
        let mut content_end = end;
        while content_end > start && tokens[content_end - 1].kind == Lexeme::WhiteSpace {
            content_end -= 1;
        }

        children.push(sentence(text, &tokens[start..content_end]));
        children.extend(tokens[content_end..end].iter().map(|t| leaf(t, text)));
        start = end;
    }

    SnapshotTree::parent(PARAGRAPH_NODE, children)
}

fn root(text: &str, tokens: &[Token]) -> SnapshotTree {
    let mut children = Vec::new();
    let mut start = 0;

    for (i, token) in tokens.iter().enumerate() {
        if is_line_break(token, text) {
            if start < i {
                children.push(paragraph(text, &tokens[start..i]));
            }
            children.push(leaf(token, text));
            start = i + 1;
        }
    }
    if start < tokens.len() {
        children.push(paragraph(text, &tokens[start..]));
    }

    SnapshotTree::parent(ROOT_NODE, children)
}
