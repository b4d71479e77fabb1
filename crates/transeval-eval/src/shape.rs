//! Materialize a shape by evaluating every property and sorting the output by
//! declared order (§4.6).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use transeval_common::{ArgVal, ColorData, EvalError, EvalErrorKind, Path, PathSegment, Result, Value};
use transeval_common::Translation;

use crate::ctx::EvalContext;
use crate::resolver::resolve_path;
use crate::tape::Tape;

/// The non-AD numeric projection of a [`Value`] — what the display layer consumes
/// (§4.6: "properties are the non-AD numeric projection of the evaluated values").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Str(String),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
    Tup(f64, f64),
    List(Vec<f64>),
    LList(Vec<Vec<f64>>),
    Color(ColorData),
    PathData(Vec<PathSegment>),
}

pub fn project(tape: &Tape, v: &Value) -> RenderValue {
    match v {
        Value::FloatV(s) => RenderValue::Float(tape.num_of(*s)),
        Value::IntV(i) => RenderValue::Int(*i),
        Value::BoolV(b) => RenderValue::Bool(*b),
        Value::StrV(s) => RenderValue::Str(s.clone()),
        Value::VectorV(v) => RenderValue::Vector(v.iter().map(|&id| tape.num_of(id)).collect()),
        Value::MatrixV(m) => {
            RenderValue::Matrix(m.iter().map(|row| row.iter().map(|&id| tape.num_of(id)).collect()).collect())
        }
        Value::TupV(a, b) => RenderValue::Tup(tape.num_of(*a), tape.num_of(*b)),
        Value::ListV(v) => RenderValue::List(v.iter().map(|&id| tape.num_of(id)).collect()),
        Value::LListV(m) => {
            RenderValue::LList(m.iter().map(|row| row.iter().map(|&id| tape.num_of(id)).collect()).collect())
        }
        Value::ColorV(c) => RenderValue::Color(c.clone()),
        Value::PathDataV(p) => RenderValue::PathData(p.clone()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub shape_type: String,
    pub properties: FxHashMap<String, RenderValue>,
}

impl Shape {
    pub fn name(&self) -> Option<&str> {
        match self.properties.get("name") {
            Some(RenderValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn not_a_shape(p: &Path) -> EvalError {
    EvalError::new(EvalErrorKind::UnresolvedPath)
        .with_path(p.clone())
        .with_message("shape path does not name an FGPI entry")
}

/// §2 step 3 "Evaluate shapes": for each shape path, evaluate every property
/// (memoizing via the resolver), then §2 step 4 "Sort": reorder by `shape_ordering`.
/// A declared name with no evaluated shape is `ShapeOrderingUnmatched`.
pub fn eval_shapes(
    shape_paths: &[Path],
    shape_ordering: &[String],
    t: &mut Translation,
    ctx: &mut EvalContext,
) -> Result<Vec<Shape>> {
    let mut by_name: FxHashMap<String, Shape> = FxHashMap::default();

    for p in shape_paths {
        let resolved = resolve_path(p, t, ctx)?;
        let (shape_type, props) = match resolved {
            ArgVal::Gpi(ty, props) => (ty, props),
            ArgVal::Val(_) => return Err(not_a_shape(p)),
        };
        let properties: FxHashMap<String, RenderValue> =
            props.into_iter().map(|(k, v)| (k, project(ctx.tape, &v))).collect();
        let shape = Shape { shape_type, properties };
        if let Some(name) = shape.name() {
            by_name.insert(name.to_string(), shape);
        }
    }

    let mut ordered = Vec::with_capacity(shape_ordering.len());
    for name in shape_ordering {
        let shape = by_name
            .remove(name)
            .ok_or_else(|| EvalError::new(EvalErrorKind::ShapeOrderingUnmatched).with_message(name.clone()))?;
        ordered.push(shape);
    }
    Ok(ordered)
}
