//! Tokenizer for utility expressions.

use crate::{ExprError, ExprResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Num(f64),
    Str(String),
    Ident(String),
    True,
    False,
    And,
    Or,
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    StarStar,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
    Comma,
}

/// A token together with its byte offset in the source, for error messages.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos:   usize,
}

/// Split `src` into tokens.
pub fn tokenize(src: &str) -> ExprResult<Vec<Spanned>> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let token = if c.is_ascii_digit() || (c == '.' && next_is_digit(bytes, i + 1)) {
            let (num, end) = lex_number(src, i)?;
            i = end;
            Token::Num(num)
        } else if c.is_ascii_alphabetic() || c == '_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            keyword_or_ident(&src[start..i])
        } else if c == '\'' || c == '"' {
            let (text, end) = lex_string(src, i)?;
            i = end;
            Token::Str(text)
        } else {
            let two = src.get(i..i + 2).unwrap_or("");
            let (tok, width) = match two {
                "**" => (Token::StarStar, 2),
                "//" => (Token::SlashSlash, 2),
                "==" => (Token::Eq, 2),
                "!=" => (Token::Ne, 2),
                "<=" => (Token::Le, 2),
                ">=" => (Token::Ge, 2),
                _ => match c {
                    '+' => (Token::Plus, 1),
                    '-' => (Token::Minus, 1),
                    '*' => (Token::Star, 1),
                    '/' => (Token::Slash, 1),
                    '%' => (Token::Percent, 1),
                    '<' => (Token::Lt, 1),
                    '>' => (Token::Gt, 1),
                    '&' => (Token::And, 1),
                    '|' => (Token::Or, 1),
                    '~' => (Token::Not, 1),
                    '(' => (Token::LParen, 1),
                    ')' => (Token::RParen, 1),
                    ',' => (Token::Comma, 1),
                    other => {
                        return Err(ExprError::Syntax {
                            pos: i,
                            msg: format!("unexpected character {other:?}"),
                        });
                    }
                },
            };
            i += width;
            tok
        };

        out.push(Spanned { token, pos: start });
    }

    Ok(out)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn next_is_digit(bytes: &[u8], i: usize) -> bool {
    bytes.get(i).is_some_and(u8::is_ascii_digit)
}

fn keyword_or_ident(word: &str) -> Token {
    match word {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "True" | "true" => Token::True,
        "False" | "false" => Token::False,
        _ => Token::Ident(word.to_owned()),
    }
}

fn lex_number(src: &str, start: usize) -> ExprResult<(f64, usize)> {
    let bytes = src.as_bytes();
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // Optional exponent: e, E, followed by optional sign and digits.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if next_is_digit(bytes, j) {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    let text = &src[start..i];
    text.parse::<f64>()
        .map(|n| (n, i))
        .map_err(|_| ExprError::Syntax {
            pos: start,
            msg: format!("invalid number {text:?}"),
        })
}

fn lex_string(src: &str, start: usize) -> ExprResult<(String, usize)> {
    let quote = src.as_bytes()[start];
    let body_start = start + 1;
    match src[body_start..].find(quote as char) {
        Some(len) => Ok((src[body_start..body_start + len].to_owned(), body_start + len + 1)),
        None => Err(ExprError::Syntax {
            pos: start,
            msg: "unterminated string literal".into(),
        }),
    }
}
