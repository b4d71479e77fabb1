//! Resolve a path to an evaluated value or shape, applying the varying-map override
//! and caching results (§4.5).

use rustc_hash::FxHashMap;
use transeval_common::{ArgVal, EvalError, EvalErrorKind, FieldEntry, Path, Result, TagExpr, Value};
use transeval_common::Translation;

use crate::ctx::EvalContext;
use crate::eval::eval_expr;
use crate::store;
use crate::telemetry::pass_trace;

fn unresolved(p: &Path) -> EvalError {
    EvalError::new(EvalErrorKind::UnresolvedPath).with_path(p.clone())
}

/// Entry point of §4.5. `AccessPath` is rejected here (`Unimplemented`) — callers
/// must reach into the translation through `VectorAccess`/`MatrixAccess` expressions
/// instead (§4.5 step 3).
pub fn resolve_path(p: &Path, t: &mut Translation, ctx: &mut EvalContext) -> Result<ArgVal> {
    if let Some(varying) = ctx.varying {
        if let Some(&scalar) = varying.get(p) {
            pass_trace!(path = %p.canonical(), "resolved from varying map");
            return Ok(ArgVal::Val(Value::FloatV(scalar)));
        }
    }

    match p {
        Path::Access { .. } => Err(EvalError::new(EvalErrorKind::Unimplemented)
            .with_path(p.clone())
            .with_message("AccessPath cannot be resolved directly")),
        Path::Field { name, field } => resolve_field(p, name, field, t, ctx),
        Path::Property { name, field, prop } => resolve_property(p, name, field, prop, t, ctx),
    }
}

fn resolve_field(p: &Path, name: &str, field: &str, t: &mut Translation, ctx: &mut EvalContext) -> Result<ArgVal> {
    let entry = t.field(name, field).cloned().ok_or_else(|| unresolved(p))?;
    match entry {
        FieldEntry::FGPI(ty, props) => resolve_gpi(name, field, &ty, props, t, ctx),
        FieldEntry::FExpr(tag) => resolve_tag(p, tag, t, ctx),
    }
}

fn resolve_property(
    p: &Path,
    name: &str,
    field: &str,
    prop: &str,
    t: &mut Translation,
    ctx: &mut EvalContext,
) -> Result<ArgVal> {
    let entry = t.field(name, field).cloned().ok_or_else(|| unresolved(p))?;
    match entry {
        FieldEntry::FExpr(_) => Err(unresolved(p)),
        FieldEntry::FGPI(_, props) => {
            let tag = props.get(prop).cloned().ok_or_else(|| unresolved(p))?;
            resolve_tag(p, tag, t, ctx)
        }
    }
}

/// Shared `OptEval`/`Done`/`Pending` handling (§4.5 step 2, second bullet) for any
/// path that names a plain cell (field or property, not a shape).
fn resolve_tag(p: &Path, tag: TagExpr, t: &mut Translation, ctx: &mut EvalContext) -> Result<ArgVal> {
    match tag {
        TagExpr::Done(v) | TagExpr::Pending(v) => Ok(ArgVal::Val(v)),
        TagExpr::OptEval(e) => {
            ctx.enter(p)?;
            let result = eval_expr(&e, t, ctx);
            ctx.exit(p);
            let result = result?;
            match &result {
                ArgVal::Val(v) => {
                    store::insert_expr(t, p, TagExpr::Done(v.clone()), ctx.tape)?;
                }
                ArgVal::Gpi(..) => {
                    return Err(EvalError::new(EvalErrorKind::UnexpectedGPI).with_path(p.clone()));
                }
            }
            Ok(result)
        }
    }
}

/// Evaluate every property of a shape (§4.5 step 2, first bullet): `OptEval`
/// properties recurse through the evaluator and memoize by writing `Done` back at
/// the property's own synthetic path; `Done`/`Pending` properties first consult the
/// varying map at that property's path (allowing a fresh override even though the
/// cell itself is already cached), falling back to the cached value.
fn resolve_gpi(
    name: &str,
    field: &str,
    shape_type: &str,
    props: indexmap::IndexMap<String, TagExpr>,
    t: &mut Translation,
    ctx: &mut EvalContext,
) -> Result<ArgVal> {
    let mut evaluated: FxHashMap<String, Value> = FxHashMap::default();
    evaluated.reserve(props.len());

    for (prop_name, tag) in props {
        let prop_path = Path::property(name, field, &prop_name);
        let value = match tag {
            TagExpr::OptEval(e) => {
                ctx.enter(&prop_path)?;
                let result = eval_expr(&e, t, ctx);
                ctx.exit(&prop_path);
                match result? {
                    ArgVal::Val(v) => {
                        store::insert_expr(t, &prop_path, TagExpr::Done(v.clone()), ctx.tape)?;
                        v
                    }
                    ArgVal::Gpi(..) => {
                        return Err(EvalError::new(EvalErrorKind::UnexpectedGPI).with_path(prop_path));
                    }
                }
            }
            TagExpr::Done(v) | TagExpr::Pending(v) => {
                if let Some(varying) = ctx.varying {
                    if let Some(&scalar) = varying.get(&prop_path) {
                        Value::FloatV(scalar)
                    } else {
                        v
                    }
                } else {
                    v
                }
            }
        };
        evaluated.insert(prop_name, value);
    }

    Ok(ArgVal::Gpi(shape_type.to_string(), evaluated))
}
