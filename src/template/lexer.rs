//! Tokenizer: splits template source into literal text, expressions and tags

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `{% ... %}` or `{{ ... }}`, non-greedy, spanning newlines
    static ref DELIMITERS: Regex = Regex::new(r"(?s)\{%.*?%\}|\{\{.*?\}\}").unwrap();
}

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw text, emitted verbatim
    Literal(String),
    /// Interpolation: `{{ path }}` or `{{ path|safe }}`
    Expression { path: String, safe: bool },
    /// Control statement: `{% ... %}`, trimmed
    Tag { stmt: String, line: usize },
}

/// Tokenize a template in a single linear scan.
///
/// Text outside delimiters is kept byte for byte, so concatenating the
/// literals with the raw delimiter spans reproduces the source. An opening
/// delimiter that is never closed stays literal text.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    let mut line = 1;

    for span in DELIMITERS.find_iter(source) {
        if span.start() > last {
            let text = &source[last..span.start()];
            line += count_lines(text);
            tokens.push(Token::Literal(text.to_string()));
        }

        let raw = span.as_str();
        let inner = &raw[2..raw.len() - 2];
        if raw.starts_with("{%") {
            tokens.push(Token::Tag {
                stmt: inner.trim().to_string(),
                line,
            });
        } else {
            tokens.push(parse_expression(inner));
        }

        line += count_lines(raw);
        last = span.end();
    }

    if last < source.len() {
        tokens.push(Token::Literal(source[last..].to_string()));
    }

    tokens
}

/// Split off a trailing `|safe` marker (whitespace around the pipe allowed)
fn parse_expression(inner: &str) -> Token {
    let expr = inner.trim();
    if let Some(path) = expr
        .strip_suffix("safe")
        .and_then(|rest| rest.trim_end().strip_suffix('|'))
    {
        return Token::Expression {
            path: path.trim().to_string(),
            safe: true,
        };
    }
    Token::Expression {
        path: expr.to_string(),
        safe: false,
    }
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}
