//! Read and write entries in the translation by field/property/indexed path (§4.3).

use transeval_common::{
    AccessIndex, EvalError, EvalErrorKind, Expr, FieldEntry, Path, Result, TagExpr, Translation,
    Value,
};

use crate::tape::Tape;

/// The result of reading a path: a plain tagged cell, or a whole shape (read only
/// reachable through a `Path::Field` that names an `FGPI`).
pub enum FindResult<'a> {
    Cell(&'a TagExpr),
    Shape(&'a str, &'a indexmap::IndexMap<String, TagExpr>),
}

fn unresolved(path: &Path) -> EvalError {
    EvalError::new(EvalErrorKind::UnresolvedPath).with_path(path.clone())
}

/// `findExpr` (§4.3). `AccessPath` is not supported through this reader — callers
/// compose `VectorAccess`/`MatrixAccess` expressions instead.
pub fn find_expr<'a>(t: &'a Translation, path: &Path) -> Result<FindResult<'a>> {
    match path {
        Path::Field { name, field } => {
            let entry = t.field(name, field).ok_or_else(|| unresolved(path))?;
            Ok(match entry {
                FieldEntry::FExpr(te) => FindResult::Cell(te),
                FieldEntry::FGPI(ty, props) => FindResult::Shape(ty, props),
            })
        }
        Path::Property { name, field, prop } => {
            let entry = t.field(name, field).ok_or_else(|| unresolved(path))?;
            match entry {
                FieldEntry::FGPI(_, props) => {
                    props.get(prop).map(FindResult::Cell).ok_or_else(|| unresolved(path))
                }
                FieldEntry::FExpr(_) => Err(unresolved(path)),
            }
        }
        Path::Access { .. } => Err(EvalError::new(EvalErrorKind::Unimplemented)
            .with_path(path.clone())
            .with_message("AccessPath is not readable through findExpr")),
    }
}

fn cell_mut<'a>(t: &'a mut Translation, name: &str, field: &str, prop: Option<&str>) -> Result<&'a mut TagExpr> {
    let entry = t
        .field_mut(name, field)
        .ok_or_else(|| unresolved(&match prop {
            Some(p) => Path::property(name, field, p),
            None => Path::field(name, field),
        }))?;
    match (entry, prop) {
        (FieldEntry::FExpr(te), None) => Ok(te),
        (FieldEntry::FGPI(_, props), Some(p)) => props
            .get_mut(p)
            .ok_or_else(|| unresolved(&Path::property(name, field, p))),
        (FieldEntry::FExpr(_), Some(p)) => Err(unresolved(&Path::property(name, field, p))),
        (FieldEntry::FGPI(..), None) => {
            // A `Field` path naming a shape is addressed through `find_expr`'s `Shape`
            // arm for reads; writes to a whole shape entry are not part of this
            // protocol.
            Err(unresolved(&Path::field(name, field)))
        }
    }
}

fn access_target<'a>(t: &'a mut Translation, inner: &Path) -> Result<&'a mut TagExpr> {
    match inner {
        Path::Field { name, field } => cell_mut(t, name, field, None),
        Path::Property { name, field, prop } => cell_mut(t, name, field, Some(prop)),
        Path::Access { .. } => Err(EvalError::new(EvalErrorKind::Unimplemented)
            .with_path(inner.clone())
            .with_message("nested AccessPath is rejected")),
    }
}

/// `insertExpr` (§4.3). Writes to `Done`/`Pending` cells carry a raw `Value`; writes
/// to `OptEval` cells re-wrap the scalar as an AST literal. `path` must name the
/// target; `tag` is the field/property overwrite, or (for `AccessPath`) the scalar
/// `TagExpr::Done(Value::FloatV(_))` to splice into the addressed element.
pub fn insert_expr(t: &mut Translation, path: &Path, tag: TagExpr, tape: &Tape) -> Result<()> {
    match path {
        Path::Field { name, field } => {
            t.set_field(name.clone(), field.clone(), FieldEntry::FExpr(tag));
            Ok(())
        }
        Path::Property { name, field, prop } => {
            let entry = t.field_mut(name, field).ok_or_else(|| unresolved(path))?;
            match entry {
                FieldEntry::FGPI(_, props) => {
                    props.insert(prop.clone(), tag);
                    Ok(())
                }
                FieldEntry::FExpr(_) => Err(EvalError::new(EvalErrorKind::TypeMismatch)
                    .with_path(path.clone())
                    .with_message("cannot write a property into a field that is not a shape")),
            }
        }
        Path::Access { inner, index } => {
            let i = match index {
                AccessIndex::One(i) => *i,
                AccessIndex::Two(..) => {
                    return Err(EvalError::new(EvalErrorKind::Unimplemented)
                        .with_path(path.clone())
                        .with_message("two-index AccessPath writes are not supported"));
                }
            };
            let scalar = match &tag {
                TagExpr::Done(Value::FloatV(s)) | TagExpr::Pending(Value::FloatV(s)) => *s,
                _ => {
                    return Err(EvalError::new(EvalErrorKind::TypeMismatch)
                        .with_path(path.clone())
                        .with_message("AccessPath writes require a scalar FloatV value"));
                }
            };
            let cell = access_target(t, inner)?;
            write_access_element(cell, i, scalar, tape, path)
        }
    }
}

fn write_access_element(
    cell: &mut TagExpr,
    i: i64,
    scalar: transeval_common::ScalarId,
    tape: &Tape,
    path: &Path,
) -> Result<()> {
    match cell {
        TagExpr::Done(Value::VectorV(v)) | TagExpr::Pending(Value::VectorV(v)) => {
            let idx = bounds_check(i, v.len(), path)?;
            v[idx] = scalar;
            Ok(())
        }
        TagExpr::OptEval(Expr::Vector(elems)) => {
            let idx = bounds_check(i, elems.len(), path)?;
            elems[idx] = Expr::AFloat(transeval_common::AFloat::Fix(tape.num_of(scalar)));
            Ok(())
        }
        _ => Err(EvalError::new(EvalErrorKind::TypeMismatch)
            .with_path(path.clone())
            .with_message("AccessPath target is neither a Vector literal nor a VectorV value")),
    }
}

fn bounds_check(i: i64, len: usize, path: &Path) -> Result<usize> {
    if i < 0 || i as usize >= len {
        Err(EvalError::new(EvalErrorKind::IndexOutOfBounds).with_path(path.clone()))
    } else {
        Ok(i as usize)
    }
}
