//! Recursive-descent parser.
//!
//! Precedence, loosest first:
//!
//! ```text
//! or     :=  and   (('|' | 'or')  and)*
//! and    :=  not   (('&' | 'and') not)*
//! not    :=  ('~' | 'not') not | cmp
//! cmp    :=  sum   (cmp_op sum)?            -- comparisons do not chain
//! sum    :=  term  (('+' | '-') term)*
//! term   :=  unary (('*' | '/' | '//' | '%') unary)*
//! unary  :=  ('-' | '+') unary | power
//! power  :=  atom  ('**' unary)?            -- right associative
//! atom   :=  number | string | True | False | ident | ident '(' args ')' | '(' or ')'
//! ```
//!
//! A single leading `@` is stripped before tokenizing.

use crate::ast::{BinaryOp, Expr, Func, UnaryOp};
use crate::lexer::{Spanned, Token, tokenize};
use crate::{ExprError, ExprResult};

/// Parse expression text into an [`Expr`].
pub fn parse(src: &str) -> ExprResult<Expr> {
    let trimmed = src.trim();
    let body = trimmed.strip_prefix('@').unwrap_or(trimmed);

    let tokens = tokenize(body)?;
    if tokens.is_empty() {
        return Err(ExprError::Syntax { pos: 0, msg: "empty expression".into() });
    }

    let mut parser = Parser { tokens, pos: 0, end: body.len() };
    let expr = parser.or_expr()?;
    if let Some(extra) = parser.peek_spanned() {
        return Err(ExprError::Syntax {
            pos: extra.pos,
            msg: format!("unexpected trailing token {:?}", extra.token),
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos:    usize,
    end:    usize,
}

impl Parser {
    // ── Token cursor ──────────────────────────────────────────────────────

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_spanned(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn here(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|s| s.token.clone());
        self.pos += 1;
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token, what: &str) -> ExprResult<()> {
        if self.eat(&expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn error(&self, msg: String) -> ExprError {
        ExprError::Syntax { pos: self.here(), msg }
    }

    // ── Grammar ───────────────────────────────────────────────────────────

    fn or_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.and_expr()?;
        while self.eat(&Token::Or) {
            let rhs = self.and_expr()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.not_expr()?;
        while self.eat(&Token::And) {
            let rhs = self.not_expr()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> ExprResult<Expr> {
        if self.eat(&Token::Not) {
            let inner = self.not_expr()?;
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(inner)));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> ExprResult<Expr> {
        let lhs = self.sum()?;
        let Some(op) = self.peek().and_then(comparison_op) else {
            return Ok(lhs);
        };
        self.pos += 1;
        let rhs = self.sum()?;
        if self.peek().and_then(comparison_op).is_some() {
            return Err(self.error("chained comparisons are not supported; use '&'".into()));
        }
        Ok(Expr::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn sum(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> ExprResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::SlashSlash) => BinaryOp::FloorDiv,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> ExprResult<Expr> {
        if self.eat(&Token::Minus) {
            let inner = self.unary()?;
            // Fold negative literals so `-1` stays a constant.
            return Ok(match inner {
                Expr::Num(n) => Expr::Num(-n),
                other => Expr::Unary(UnaryOp::Neg, Box::new(other)),
            });
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> ExprResult<Expr> {
        let base = self.atom()?;
        if self.eat(&Token::StarStar) {
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> ExprResult<Expr> {
        let pos = self.here();
        match self.advance() {
            Some(Token::Num(n)) => Ok(Expr::Num(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::True) => Ok(Expr::Num(1.0)),
            Some(Token::False) => Ok(Expr::Num(0.0)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    self.call(&name)
                } else {
                    Ok(Expr::Ident(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.or_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(other) => Err(ExprError::Syntax {
                pos,
                msg: format!("unexpected token {other:?}"),
            }),
            None => Err(ExprError::Syntax { pos, msg: "unexpected end of expression".into() }),
        }
    }

    /// Parse the argument list of `name(`; the opening paren is consumed.
    fn call(&mut self, name: &str) -> ExprResult<Expr> {
        let func = Func::lookup(name)?;
        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.or_expr()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RParen, "',' or ')'")?;
                break;
            }
        }
        if args.len() != func.arity() {
            return Err(ExprError::Arity {
                name:     func.name(),
                expected: func.arity(),
                got:      args.len(),
            });
        }
        Ok(Expr::Call(func, args))
    }
}

fn comparison_op(token: &Token) -> Option<BinaryOp> {
    Some(match token {
        Token::Eq => BinaryOp::Eq,
        Token::Ne => BinaryOp::Ne,
        Token::Lt => BinaryOp::Lt,
        Token::Le => BinaryOp::Le,
        Token::Gt => BinaryOp::Gt,
        Token::Ge => BinaryOp::Ge,
        _ => return None,
    })
}
