//! Embeddable diagram expression evaluator.
//!
//! This crate re-exports the two lower-level crates that do the real work:
//! [`transeval_common`] (the expression/path/value vocabulary shared with whatever
//! compiles translations in the first place) and [`transeval_eval`] (the evaluator
//! itself — passes, the autodiff arena, the computation dictionary, the wire
//! boundary). Both are feature-gated so an embedder that only needs the vocabulary
//! (say, to build a translation) can depend on this crate without pulling in the
//! evaluator's dependency stack.

#[cfg(feature = "common")]
pub use transeval_common as common;

#[cfg(feature = "eval")]
pub use transeval_eval as eval;

#[cfg(all(feature = "common", feature = "eval"))]
pub mod prelude {
    //! The common combination: vocabulary types plus the evaluator's pass entry
    //! points, in one `use`.
    pub use transeval_common::{
        ArgVal, EvalError, EvalErrorKind, Expr, Path, Result, Translation, Value,
    };
    pub use transeval_eval::{
        default_dictionary, eval_functions, eval_shapes, DebugInfo, Dictionary, EvalConfig,
        RunState, Shape, ShapesInput, ShapesOutput, Tape, WireState,
    };
}
