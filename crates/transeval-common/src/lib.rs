pub mod error;
pub mod expr;
pub mod path;
pub mod scalar;
pub mod tagexpr;
pub mod translation;
pub mod value;

pub use error::{EvalError, EvalErrorContext, EvalErrorKind, Result};
pub use expr::{AFloat, BinaryOp, Expr, UnaryOp};
pub use path::{AccessIndex, Path};
pub use scalar::ScalarId;
pub use tagexpr::TagExpr;
pub use translation::{FieldEntry, Translation};
pub use value::{ArgVal, ColorData, ColorSpace, PathSegment, Value};
