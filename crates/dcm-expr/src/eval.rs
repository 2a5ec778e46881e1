//! Vectorized evaluation of an [`Expr`] against a [`Scope`].
//!
//! # Value model
//!
//! | Variant       | Meaning                                      |
//! |---------------|----------------------------------------------|
//! | `Num(f64)`    | one number shared by every agent row         |
//! | `Str(..)`     | one string shared by every agent row         |
//! | `Vec(..)`     | one number per agent row                     |
//! | `Cat(..)`     | one categorical label per agent row          |
//!
//! Booleans are `1.0` / `0.0`; any non-zero number is truthy.  Strings only
//! take part in `==` and `!=`.  Division by zero follows IEEE-754.

use std::borrow::Cow;

use dcm_core::{Categorical, Column, Scalar};

use crate::ast::{BinaryOp, Expr, Func, UnaryOp};
use crate::{ExprError, ExprResult};

// ── Scope ─────────────────────────────────────────────────────────────────────

/// What a name resolves to.
#[derive(Clone, Copy, Debug)]
pub enum Attr<'a> {
    /// Same value for every agent row (e.g. an alternative attribute).
    Scalar(Scalar<'a>),
    /// One value per agent row.
    Column(&'a Column),
}

/// Name resolution for evaluation.
///
/// `len` is the number of agent rows; every `Attr::Column` returned by
/// `lookup` must have exactly that many entries.
pub trait Scope {
    fn len(&self) -> usize;

    fn lookup(&self, name: &str) -> Option<Attr<'_>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Value ─────────────────────────────────────────────────────────────────────

/// Result of evaluating an expression (or a sub-expression).
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Num(f64),
    Str(Cow<'a, str>),
    Vec(Cow<'a, [f64]>),
    Cat(&'a Categorical),
}

impl<'a> Value<'a> {
    /// Short type name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::Vec(_) => "numeric column",
            Value::Cat(_) => "categorical column",
        }
    }

    /// Broadcast to one number per row.  Strings are a type error: a utility
    /// term must be numeric.
    pub fn into_numeric(self, len: usize) -> ExprResult<Vec<f64>> {
        match self {
            Value::Num(x) => Ok(vec![x; len]),
            Value::Vec(v) => Ok(v.into_owned()),
            other => Err(ExprError::TypeMismatch {
                op:    "utility term",
                left:  other.kind(),
                right: "number",
            }),
        }
    }

    fn from_attr(attr: Attr<'a>) -> Self {
        match attr {
            Attr::Scalar(Scalar::Num(x)) => Value::Num(x),
            Attr::Scalar(Scalar::Text(s)) => Value::Str(Cow::Borrowed(s)),
            Attr::Column(Column::Num(v)) => Value::Vec(Cow::Borrowed(v.as_slice())),
            Attr::Column(Column::Cat(c)) => Value::Cat(c),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Num(_) | Value::Vec(_))
    }
}

#[inline]
fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

#[inline]
fn truthy(x: f64) -> bool {
    x != 0.0
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Evaluate `expr` against `scope`.
pub fn evaluate<'s, S: Scope + ?Sized>(expr: &Expr, scope: &'s S) -> ExprResult<Value<'s>> {
    match expr {
        Expr::Num(x) => Ok(Value::Num(*x)),
        Expr::Str(s) => Ok(Value::Str(Cow::Owned(s.clone()))),
        Expr::Ident(name) => scope
            .lookup(name)
            .map(Value::from_attr)
            .ok_or_else(|| ExprError::UnknownAttribute(name.clone())),
        Expr::Unary(op, inner) => {
            let v = evaluate(inner, scope)?;
            match op {
                UnaryOp::Neg => map_num("-", v, |x| -x),
                UnaryOp::Not => map_num("~", v, |x| flag(!truthy(x))),
            }
        }
        Expr::Binary(op, l, r) => {
            let l = evaluate(l, scope)?;
            let r = evaluate(r, scope)?;
            binary(*op, l, r)
        }
        Expr::Call(func, args) => call(*func, args, scope),
    }
}

// ── Operators ─────────────────────────────────────────────────────────────────

fn binary<'a>(op: BinaryOp, l: Value<'a>, r: Value<'a>) -> ExprResult<Value<'a>> {
    let sym = op.symbol();
    match op {
        BinaryOp::Add => zip_num(sym, l, r, |a, b| a + b),
        BinaryOp::Sub => zip_num(sym, l, r, |a, b| a - b),
        BinaryOp::Mul => zip_num(sym, l, r, |a, b| a * b),
        BinaryOp::Div => zip_num(sym, l, r, |a, b| a / b),
        BinaryOp::FloorDiv => zip_num(sym, l, r, |a, b| (a / b).floor()),
        // Sign follows the divisor, as in spreadsheet and dataframe tools.
        BinaryOp::Mod => zip_num(sym, l, r, |a, b| a - b * (a / b).floor()),
        BinaryOp::Pow => zip_num(sym, l, r, f64::powf),
        BinaryOp::Eq => equality(sym, l, r, false),
        BinaryOp::Ne => equality(sym, l, r, true),
        BinaryOp::Lt => zip_num(sym, l, r, |a, b| flag(a < b)),
        BinaryOp::Le => zip_num(sym, l, r, |a, b| flag(a <= b)),
        BinaryOp::Gt => zip_num(sym, l, r, |a, b| flag(a > b)),
        BinaryOp::Ge => zip_num(sym, l, r, |a, b| flag(a >= b)),
        BinaryOp::And => zip_num(sym, l, r, |a, b| flag(truthy(a) && truthy(b))),
        BinaryOp::Or => zip_num(sym, l, r, |a, b| flag(truthy(a) || truthy(b))),
    }
}

/// Element-wise numeric operation with scalar broadcasting.
fn zip_num<'a>(
    op: &'static str,
    l:  Value<'a>,
    r:  Value<'a>,
    f:  impl Fn(f64, f64) -> f64,
) -> ExprResult<Value<'a>> {
    match (l, r) {
        (Value::Num(a), Value::Num(b)) => Ok(Value::Num(f(a, b))),
        (Value::Num(a), Value::Vec(b)) => {
            let mut out = b.into_owned();
            out.iter_mut().for_each(|y| *y = f(a, *y));
            Ok(Value::Vec(Cow::Owned(out)))
        }
        (Value::Vec(a), Value::Num(b)) => {
            let mut out = a.into_owned();
            out.iter_mut().for_each(|x| *x = f(*x, b));
            Ok(Value::Vec(Cow::Owned(out)))
        }
        (Value::Vec(a), Value::Vec(b)) => {
            let mut out = a.into_owned();
            out.iter_mut().zip(b.iter()).for_each(|(x, &y)| *x = f(*x, y));
            Ok(Value::Vec(Cow::Owned(out)))
        }
        (l, r) => Err(ExprError::TypeMismatch { op, left: l.kind(), right: r.kind() }),
    }
}

fn map_num<'a>(op: &'static str, v: Value<'a>, f: impl Fn(f64) -> f64) -> ExprResult<Value<'a>> {
    match v {
        Value::Num(x) => Ok(Value::Num(f(x))),
        Value::Vec(xs) => {
            let mut out = xs.into_owned();
            out.iter_mut().for_each(|x| *x = f(*x));
            Ok(Value::Vec(Cow::Owned(out)))
        }
        other => Err(ExprError::TypeMismatch { op, left: other.kind(), right: "number" }),
    }
}

/// `==` / `!=`, which also accept strings and categorical columns.
fn equality<'a>(op: &'static str, l: Value<'a>, r: Value<'a>, negate: bool) -> ExprResult<Value<'a>> {
    let cmp = |eq: bool| flag(eq != negate);

    if l.is_numeric() && r.is_numeric() {
        return zip_num(op, l, r, |a, b| cmp(a == b));
    }

    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Num(cmp(a == b))),
        (Value::Cat(c), Value::Str(s)) | (Value::Str(s), Value::Cat(c)) => {
            let out = match c.code_of(&s) {
                Some(code) => c.codes().iter().map(|&k| cmp(k == code)).collect(),
                None => vec![cmp(false); c.len()],
            };
            Ok(Value::Vec(Cow::Owned(out)))
        }
        (Value::Cat(a), Value::Cat(b)) => {
            let out = (0..a.len()).map(|i| cmp(a.label(i) == b.label(i))).collect();
            Ok(Value::Vec(Cow::Owned(out)))
        }
        (l, r) => Err(ExprError::TypeMismatch { op, left: l.kind(), right: r.kind() }),
    }
}

// ── Functions ─────────────────────────────────────────────────────────────────

fn call<'s, S: Scope + ?Sized>(func: Func, args: &[Expr], scope: &'s S) -> ExprResult<Value<'s>> {
    let name = func.name();
    let mut values = args
        .iter()
        .map(|a| evaluate(a, scope))
        .collect::<ExprResult<Vec<_>>>()?
        .into_iter();
    // Arity was checked by the parser.
    let mut next = || values.next().unwrap_or(Value::Num(f64::NAN));

    match func {
        Func::Abs => map_num(name, next(), f64::abs),
        Func::Exp => map_num(name, next(), f64::exp),
        Func::Log => map_num(name, next(), f64::ln),
        Func::Sqrt => map_num(name, next(), f64::sqrt),
        Func::Min => zip_num(name, next(), next(), f64::min),
        Func::Max => zip_num(name, next(), next(), f64::max),
        Func::Clip => {
            let x = next();
            let lo = next();
            let hi = next();
            let floored = zip_num(name, x, lo, f64::max)?;
            zip_num(name, floored, hi, f64::min)
        }
        Func::Where => {
            let cond = next();
            let then = next();
            let other = next();
            select(scope.len(), cond, then, other)
        }
    }
}

/// `where(cond, a, b)`: pick `a` where `cond` is truthy, else `b`.
fn select<'a>(len: usize, cond: Value<'a>, then: Value<'a>, other: Value<'a>) -> ExprResult<Value<'a>> {
    for v in [&cond, &then, &other] {
        if !v.is_numeric() {
            return Err(ExprError::TypeMismatch { op: "where", left: v.kind(), right: "number" });
        }
    }
    if let (Value::Num(c), Value::Num(a), Value::Num(b)) = (&cond, &then, &other) {
        return Ok(Value::Num(if truthy(*c) { *a } else { *b }));
    }
    let cond = cond.into_numeric(len)?;
    let then = then.into_numeric(len)?;
    let other = other.into_numeric(len)?;
    let out = cond
        .iter()
        .zip(then.iter().zip(other.iter()))
        .map(|(&c, (&a, &b))| if truthy(c) { a } else { b })
        .collect();
    Ok(Value::Vec(Cow::Owned(out)))
}
