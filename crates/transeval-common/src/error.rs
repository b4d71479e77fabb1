//! Evaluator error representation.
//!
//! - **`EvalErrorKind`** : the canonical set of evaluator failure modes
//! - **`EvalErrorContext`** : lightweight, path/expression diagnostic context
//! - **`EvalError`** : one struct that glues the two together
//!
//! Deliberately hand-rolled rather than derived: the kind/context split lets new
//! variants stay free of boilerplate while every error still carries a place to
//! attach the offending path for diagnostics.

use std::{error::Error, fmt};

use crate::path::Path;

/// All recognised evaluator failure modes (§7 of the design).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    UnresolvedPath,
    TypeMismatch,
    IndexOutOfBounds,
    Unimplemented,
    UnsubstitutedVarying,
    UnsupportedListElement,
    ShapeOrderingUnmatched,
    UnexpectedGPI,
    CyclicPath,
    InvalidOperand,
    UnknownExpression,
    UnknownFunction,
    PathMapLengthMismatch,
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnresolvedPath => "unresolved path",
            Self::TypeMismatch => "type mismatch",
            Self::IndexOutOfBounds => "index out of bounds",
            Self::Unimplemented => "unimplemented",
            Self::UnsubstitutedVarying => "unsubstituted varying",
            Self::UnsupportedListElement => "unsupported list element",
            Self::ShapeOrderingUnmatched => "shape ordering unmatched",
            Self::UnexpectedGPI => "unexpected GPI",
            Self::CyclicPath => "cyclic path",
            Self::InvalidOperand => "invalid operand",
            Self::UnknownExpression => "unknown expression",
            Self::UnknownFunction => "unknown function",
            Self::PathMapLengthMismatch => "path map length mismatch",
        })
    }
}

/// Generic, path-centric diagnostic context any error may carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EvalErrorContext {
    /// The path being resolved/written when the error occurred, if any.
    pub path: Option<Path>,
    /// A short rendering of the offending expression, for diagnostics only.
    pub expr: Option<String>,
}

/// The single error type the evaluator returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: Option<String>,
    pub context: Option<EvalErrorContext>,
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
        }
    }
}

impl EvalError {
    pub fn new(kind: EvalErrorKind) -> Self {
        kind.into()
    }

    pub fn with_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.message = Some(msg.into());
        self
    }

    pub fn with_path(mut self, path: Path) -> Self {
        let ctx = self.context.get_or_insert_with(EvalErrorContext::default);
        ctx.path = Some(path);
        self
    }

    pub fn with_expr<S: Into<String>>(mut self, expr: S) -> Self {
        let ctx = self.context.get_or_insert_with(EvalErrorContext::default);
        ctx.expr = Some(expr.into());
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref msg) = self.message {
            write!(f, ": {msg}")?;
        }
        if let Some(ref ctx) = self.context {
            if let Some(ref path) = ctx.path {
                write!(f, " (at {})", path.canonical())?;
            }
            if let Some(ref expr) = ctx.expr {
                write!(f, " [in {expr}]")?;
            }
        }
        Ok(())
    }
}

impl Error for EvalError {}

/// Convenience alias used throughout the evaluator.
pub type Result<T> = std::result::Result<T, EvalError>;
