//! Tagged cell values in the translation (§3.2).

use crate::expr::Expr;
use crate::value::Value;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum TagExpr {
    /// An unevaluated style expression.
    OptEval(Expr),
    /// A cached evaluated value.
    Done(Value),
    /// A value awaiting an asynchronous side-channel (e.g. text metrics); treated
    /// exactly like `Done` by the evaluator.
    Pending(Value),
}

impl TagExpr {
    /// `Done`/`Pending` both carry a ready value; `OptEval` does not.
    pub fn ready_value(&self) -> Option<&Value> {
        match self {
            TagExpr::Done(v) | TagExpr::Pending(v) => Some(v),
            TagExpr::OptEval(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        !matches!(self, TagExpr::OptEval(_))
    }
}
