//! Compiled expression tree.

use std::collections::BTreeSet;

use crate::{ExprError, ExprResult};

/// Binary operators, in no particular order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling, used in error messages.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Built-in functions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Func {
    Abs,
    Exp,
    Log,
    Sqrt,
    Min,
    Max,
    Clip,
    Where,
}

impl Func {
    /// Resolve a function name.
    pub fn lookup(name: &str) -> ExprResult<Func> {
        Ok(match name {
            "abs" => Func::Abs,
            "exp" => Func::Exp,
            "log" | "ln" => Func::Log,
            "sqrt" => Func::Sqrt,
            "min" => Func::Min,
            "max" => Func::Max,
            "clip" => Func::Clip,
            "where" => Func::Where,
            _ => return Err(ExprError::UnknownFunction(name.to_owned())),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Abs => "abs",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Sqrt => "sqrt",
            Func::Min => "min",
            Func::Max => "max",
            Func::Clip => "clip",
            Func::Where => "where",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Func::Abs | Func::Exp | Func::Log | Func::Sqrt => 1,
            Func::Min | Func::Max => 2,
            Func::Clip | Func::Where => 3,
        }
    }
}

/// A parsed expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Str(String),
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    /// Parse `src`; shorthand for [`crate::parse`].
    pub fn parse(src: &str) -> ExprResult<Expr> {
        crate::parse(src)
    }

    /// Every attribute name the expression reads.
    pub fn identifiers(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Num(_) | Expr::Str(_) => {}
            Expr::Ident(name) => {
                names.insert(name.as_str());
            }
            Expr::Unary(_, inner) => inner.collect_identifiers(names),
            Expr::Binary(_, l, r) => {
                l.collect_identifiers(names);
                r.collect_identifiers(names);
            }
            Expr::Call(_, args) => {
                for arg in args {
                    arg.collect_identifiers(names);
                }
            }
        }
    }
}
