//! The expression AST evaluated by the interpreter (§3.2, §4.4).
//!
//! This tree always arrives pre-built from the upstream style compiler — there is no
//! tokenizer/parser in this crate's scope, only the typed node shapes the evaluator
//! walks.

use crate::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A float literal that may still be an unsubstituted optimizer variable.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AFloat {
    /// Not yet substituted by the optimizer; encountering this during evaluation is
    /// `UnsubstitutedVarying`.
    Vary,
    Fix(f64),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    UPlus,
    UMinus,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    BPlus,
    BMinus,
    Multiply,
    Divide,
    Exp,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit(i64),
    StringLit(String),
    BoolLit(bool),
    AFloat(AFloat),

    UOp(UnaryOp, Box<Expr>),
    BinOp(BinaryOp, Box<Expr>, Box<Expr>),

    Tuple(Box<Expr>, Box<Expr>),
    List(Vec<Expr>),
    Vector(Vec<Expr>),

    /// `(pathExpr, idxExpr)` — indexed access into a vector or list-of-vectors.
    VectorAccess(Box<Expr>, Box<Expr>),
    /// `(pathExpr, [iExpr, jExpr])` — indexed access into a matrix.
    MatrixAccess(Box<Expr>, Box<Expr>, Box<Expr>),

    EPath(Path),
    CompApp(String, Vec<Expr>),

    /// Non-goal: general matrix literals. Always fails with `Unimplemented`.
    Matrix(Vec<Expr>),
    /// Non-goal: list access. Always fails with `Unimplemented`.
    ListAccess(Box<Expr>, Box<Expr>),
}
