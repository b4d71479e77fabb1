//! The value algebra (§3.1, §4.1).

use rustc_hash::FxHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scalar::ScalarId;

/// A style-domain color, carried through evaluation as an opaque `Done` payload.
///
/// The evaluator never inspects `components` — color arithmetic, if any, belongs to
/// the style-function dictionary, not the core evaluator.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ColorData {
    pub space: ColorSpace,
    pub components: Vec<f64>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Rgba,
    Hsva,
    None,
}

/// A single segment of an opaque style-domain path (as in "SVG path data", unrelated
/// to the translation `Path` addressing scheme in `crate::path`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CubicTo(f64, f64, f64, f64, f64, f64),
    ClosePath,
}

/// A tagged union over every kind of evaluated value (§3.1).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A differentiable scalar node.
    FloatV(ScalarId),
    /// A machine integer; kept distinct from `FloatV` until promotion is forced.
    IntV(i64),
    BoolV(bool),
    StrV(String),
    /// Ordered sequence of differentiable scalars.
    VectorV(Vec<ScalarId>),
    /// Ordered sequence of equal-length scalar vectors.
    MatrixV(Vec<Vec<ScalarId>>),
    /// A pair of differentiable scalars.
    TupV(ScalarId, ScalarId),
    /// A homogeneous list of scalars.
    ListV(Vec<ScalarId>),
    /// A list whose elements are themselves vectors, but is not a matrix.
    LListV(Vec<Vec<ScalarId>>),
    ColorV(ColorData),
    PathDataV(Vec<PathSegment>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::FloatV(_) => "FloatV",
            Value::IntV(_) => "IntV",
            Value::BoolV(_) => "BoolV",
            Value::StrV(_) => "StrV",
            Value::VectorV(_) => "VectorV",
            Value::MatrixV(_) => "MatrixV",
            Value::TupV(..) => "TupV",
            Value::ListV(_) => "ListV",
            Value::LListV(_) => "LListV",
            Value::ColorV(_) => "ColorV",
            Value::PathDataV(_) => "PathDataV",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::IntV(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float_scalar(&self) -> Option<ScalarId> {
        match self {
            Value::FloatV(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[ScalarId]> {
        match self {
            Value::VectorV(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&[Vec<ScalarId>]> {
        match self {
            Value::MatrixV(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_llist(&self) -> Option<&[Vec<ScalarId>]> {
        match self {
            Value::LListV(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::StrV(s) => Some(s),
            _ => None,
        }
    }
}

/// Either a plain value, or a shape (Graphical Primitive Instance): a shape type tag
/// plus its evaluated property map. Shape properties are always `Value`, never `GPI`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum ArgVal {
    Val(Value),
    Gpi(String, FxHashMap<String, Value>),
}

impl ArgVal {
    pub fn into_value(self) -> Option<Value> {
        match self {
            ArgVal::Val(v) => Some(v),
            ArgVal::Gpi(..) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ArgVal::Val(v) => Some(v),
            ArgVal::Gpi(..) => None,
        }
    }

    pub fn is_gpi(&self) -> bool {
        matches!(self, ArgVal::Gpi(..))
    }
}

impl From<Value> for ArgVal {
    fn from(v: Value) -> Self {
        ArgVal::Val(v)
    }
}
