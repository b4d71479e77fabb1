//! Recursively evaluate the expression AST (§4.4).

use transeval_common::{
    AFloat, ArgVal, BinaryOp, EvalError, EvalErrorKind, Expr, Path, Result, Translation, UnaryOp, Value,
};

use crate::ctx::EvalContext;
use crate::ops;
use crate::resolver::resolve_path;

fn as_value(arg: ArgVal, ctx_desc: &str) -> Result<Value> {
    arg.into_value()
        .ok_or_else(|| EvalError::new(EvalErrorKind::UnexpectedGPI).with_message(ctx_desc.to_string()))
}

fn promote_to_float(tape: &mut crate::tape::Tape, v: Value) -> Result<transeval_common::ScalarId> {
    match v {
        Value::FloatV(s) => Ok(s),
        Value::IntV(i) => Ok(tape.const_of(i as f64)),
        other => Err(EvalError::new(EvalErrorKind::TypeMismatch)
            .with_message(format!("cannot coerce {} to FloatV", other.type_name()))),
    }
}

fn eval_int_index(e: &Expr, t: &mut Translation, ctx: &mut EvalContext) -> Result<i64> {
    let v = as_value(eval_expr(e, t, ctx)?, "index expression")?;
    v.as_int()
        .ok_or_else(|| EvalError::new(EvalErrorKind::TypeMismatch).with_message("index must be IntV"))
}

/// Rewrite an `EPath`/`VectorAccess`/`MatrixAccess` expression into its canonical
/// `AccessPath` shape (§4.4 `CompApp` derivative case). Only literal indices are
/// supported in this rewrite; derivative lookups are expected to be taken against a
/// direct accessor with literal indices, never a computed one.
fn expr_to_path(e: &Expr) -> Result<Path> {
    match e {
        Expr::EPath(p) => Ok(p.clone()),
        Expr::VectorAccess(pe, ie) => {
            let inner = expr_to_path(pe)?;
            let i = literal_int(ie)?;
            Ok(Path::access_one(inner, i))
        }
        Expr::MatrixAccess(pe, ie, je) => {
            let inner = expr_to_path(pe)?;
            let i = literal_int(ie)?;
            let j = literal_int(je)?;
            Ok(Path::access_two(inner, i, j))
        }
        _ => Err(EvalError::new(EvalErrorKind::TypeMismatch)
            .with_message("derivative argument must be an EPath, VectorAccess, or MatrixAccess")),
    }
}

fn literal_int(e: &Expr) -> Result<i64> {
    match e {
        Expr::IntLit(i) => Ok(*i),
        _ => Err(EvalError::new(EvalErrorKind::TypeMismatch)
            .with_message("derivative accessor indices must be integer literals")),
    }
}

/// Evaluate one expression node (§4.4). Evaluation order of sub-expressions is
/// left-to-right and observable, since sub-expressions may write `Done` into the
/// translation (§5 "Ordering").
pub fn eval_expr(expr: &Expr, t: &mut Translation, ctx: &mut EvalContext) -> Result<ArgVal> {
    match expr {
        Expr::IntLit(i) => Ok(ArgVal::Val(Value::IntV(*i))),
        Expr::StringLit(s) => Ok(ArgVal::Val(Value::StrV(s.clone()))),
        Expr::BoolLit(b) => Ok(ArgVal::Val(Value::BoolV(*b))),

        Expr::AFloat(AFloat::Vary) => {
            Err(EvalError::new(EvalErrorKind::UnsubstitutedVarying).with_expr(format!("{expr:?}")))
        }
        Expr::AFloat(AFloat::Fix(x)) => Ok(ArgVal::Val(Value::FloatV(ctx.tape.const_of(*x)))),

        Expr::UOp(op, e) => {
            let v = as_value(eval_expr(e, t, ctx)?, "unary operand")?;
            ops::unary_op(ctx.tape, *op, &v).map(ArgVal::Val)
        }
        Expr::BinOp(op, e1, e2) => {
            let v1 = as_value(eval_expr(e1, t, ctx)?, "left binary operand")?;
            let v2 = as_value(eval_expr(e2, t, ctx)?, "right binary operand")?;
            ops::binary_op(ctx.tape, *op, &v1, &v2).map(ArgVal::Val)
        }

        Expr::Tuple(e1, e2) => {
            let v1 = as_value(eval_expr(e1, t, ctx)?, "tuple element 0")?;
            let v2 = as_value(eval_expr(e2, t, ctx)?, "tuple element 1")?;
            let a = promote_to_float(ctx.tape, v1)?;
            let b = promote_to_float(ctx.tape, v2)?;
            Ok(ArgVal::Val(Value::TupV(a, b)))
        }

        Expr::List(es) => {
            let mut values = Vec::with_capacity(es.len());
            for e in es {
                values.push(as_value(eval_expr(e, t, ctx)?, "list element")?);
            }
            match values.first() {
                None => Ok(ArgVal::Val(Value::ListV(Vec::new()))),
                Some(Value::FloatV(_)) => {
                    let mut scalars = Vec::with_capacity(values.len());
                    for v in values {
                        scalars.push(promote_to_float(ctx.tape, v)?);
                    }
                    Ok(ArgVal::Val(Value::ListV(scalars)))
                }
                Some(Value::VectorV(_)) => {
                    let mut vecs = Vec::with_capacity(values.len());
                    for v in values {
                        match v {
                            Value::VectorV(v) => vecs.push(v),
                            other => {
                                return Err(EvalError::new(EvalErrorKind::UnsupportedListElement).with_message(
                                    format!("expected VectorV, got {}", other.type_name()),
                                ));
                            }
                        }
                    }
                    Ok(ArgVal::Val(Value::LListV(vecs)))
                }
                Some(other) => Err(EvalError::new(EvalErrorKind::UnsupportedListElement)
                    .with_message(format!("unsupported list element type {}", other.type_name()))),
            }
        }

        Expr::Vector(es) => {
            let mut values = Vec::with_capacity(es.len());
            for e in es {
                values.push(as_value(eval_expr(e, t, ctx)?, "vector element")?);
            }
            match values.first() {
                Some(Value::VectorV(_)) => {
                    let mut rows = Vec::with_capacity(values.len());
                    for v in values {
                        match v {
                            Value::VectorV(row) => rows.push(row),
                            other => {
                                return Err(EvalError::new(EvalErrorKind::TypeMismatch).with_message(format!(
                                    "matrix row must be VectorV, got {}",
                                    other.type_name()
                                )));
                            }
                        }
                    }
                    Ok(ArgVal::Val(Value::MatrixV(rows)))
                }
                _ => {
                    let mut scalars = Vec::with_capacity(values.len());
                    for v in values {
                        scalars.push(promote_to_float(ctx.tape, v)?);
                    }
                    Ok(ArgVal::Val(Value::VectorV(scalars)))
                }
            }
        }

        Expr::VectorAccess(pe, ie) => {
            let resolved = as_value(eval_expr(pe, t, ctx)?, "VectorAccess target")?;
            let i = eval_int_index(ie, t, ctx)?;
            match resolved {
                Value::LListV(rows) => {
                    let idx = bounds(i, rows.len())?;
                    Ok(ArgVal::Val(Value::VectorV(rows[idx].clone())))
                }
                Value::VectorV(elems) => {
                    let idx = bounds(i, elems.len())?;
                    Ok(ArgVal::Val(Value::FloatV(elems[idx])))
                }
                other => Err(EvalError::new(EvalErrorKind::TypeMismatch)
                    .with_message(format!("VectorAccess target must be VectorV or LListV, got {}", other.type_name()))),
            }
        }

        Expr::MatrixAccess(pe, ie, je) => {
            let resolved = as_value(eval_expr(pe, t, ctx)?, "MatrixAccess target")?;
            let i = eval_int_index(ie, t, ctx)?;
            let j = eval_int_index(je, t, ctx)?;
            match resolved {
                Value::MatrixV(rows) => {
                    let ri = bounds(i, rows.len())?;
                    let ci = bounds(j, rows[ri].len())?;
                    Ok(ArgVal::Val(Value::FloatV(rows[ri][ci])))
                }
                other => Err(EvalError::new(EvalErrorKind::TypeMismatch)
                    .with_message(format!("MatrixAccess target must be MatrixV, got {}", other.type_name()))),
            }
        }

        Expr::EPath(p) => resolve_path(p, t, ctx),

        Expr::CompApp(name, args) => {
            if crate::dictionary::Dictionary::is_derivative_name(name) {
                if args.len() != 1 {
                    return Err(EvalError::new(EvalErrorKind::InvalidOperand)
                        .with_message(format!("{name} expects exactly one argument")));
                }
                let path = expr_to_path(&args[0])?;
                let path_json = serde_json::to_string(&path)
                    .map_err(|e| EvalError::new(EvalErrorKind::TypeMismatch).with_message(e.to_string()))?;
                let debug = ctx.debug.cloned().unwrap_or_default();
                let v = ctx.dict.call_derivative(name, ctx.tape, &debug, &path_json)?;
                Ok(ArgVal::Val(v))
            } else {
                let mut raw_args = Vec::with_capacity(args.len());
                for a in args {
                    raw_args.push(eval_expr(a, t, ctx)?);
                }
                let v = ctx.dict.call(name, ctx.tape, &raw_args)?;
                Ok(ArgVal::Val(v))
            }
        }

        Expr::Matrix(_) => Err(EvalError::new(EvalErrorKind::Unimplemented)
            .with_message("general Matrix literals are not supported")),
        Expr::ListAccess(..) => {
            Err(EvalError::new(EvalErrorKind::Unimplemented).with_message("ListAccess is not supported"))
        }
    }
}

fn bounds(i: i64, len: usize) -> Result<usize> {
    if i < 0 || i as usize >= len {
        Err(EvalError::new(EvalErrorKind::IndexOutOfBounds)
            .with_message(format!("index {i} out of bounds for length {len}")))
    } else {
        Ok(i as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use crate::dictionary::default_dictionary;
    use crate::tape::Tape;
    use transeval_common::UnaryOp;

    fn ctx<'a>(tape: &'a mut Tape, config: &'a EvalConfig) -> EvalContext<'a> {
        EvalContext {
            tape,
            dict: default_dictionary(),
            varying: None,
            debug: None,
            config,
            visiting: None,
        }
    }

    #[test]
    fn s2_int_plus_afloat() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let expr = Expr::BinOp(
            BinaryOp::BPlus,
            Box::new(Expr::IntLit(2)),
            Box::new(Expr::AFloat(AFloat::Fix(1.5))),
        );
        let out = eval_expr(&expr, &mut t, &mut c).unwrap();
        match out {
            ArgVal::Val(Value::FloatV(id)) => assert_eq!(c.tape.num_of(id), 3.5),
            _ => panic!("expected FloatV"),
        }
    }

    #[test]
    fn s3_nested_vector_is_matrix() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let row = |a: i64, b: i64| Expr::Vector(vec![Expr::IntLit(a), Expr::IntLit(b)]);
        let expr = Expr::Vector(vec![row(1, 2), row(3, 4)]);
        let out = eval_expr(&expr, &mut t, &mut c).unwrap();
        match out {
            ArgVal::Val(Value::MatrixV(rows)) => {
                let got: Vec<Vec<f64>> = rows
                    .iter()
                    .map(|r| r.iter().map(|&id| c.tape.num_of(id)).collect())
                    .collect();
                assert_eq!(got, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
            }
            _ => panic!("expected MatrixV"),
        }
    }

    #[test]
    fn s6_negate_vector() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let expr = Expr::UOp(
            UnaryOp::UMinus,
            Box::new(Expr::Vector(vec![Expr::IntLit(1), Expr::IntLit(-2)])),
        );
        let out = eval_expr(&expr, &mut t, &mut c).unwrap();
        match out {
            ArgVal::Val(Value::VectorV(ids)) => {
                let got: Vec<f64> = ids.iter().map(|&id| c.tape.num_of(id)).collect();
                assert_eq!(got, vec![-1.0, 2.0]);
            }
            _ => panic!("expected VectorV"),
        }
    }

    #[test]
    fn vary_leaf_is_unsubstituted() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let err = eval_expr(&Expr::AFloat(AFloat::Vary), &mut t, &mut c).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnsubstitutedVarying);
    }

    #[test]
    fn empty_list_is_empty_listv() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let out = eval_expr(&Expr::List(vec![]), &mut t, &mut c).unwrap();
        assert_eq!(out, ArgVal::Val(Value::ListV(vec![])));
    }

    #[test]
    fn list_of_ints_is_unsupported_list_element() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let expr = Expr::List(vec![Expr::IntLit(1), Expr::IntLit(2)]);
        let err = eval_expr(&expr, &mut t, &mut c).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnsupportedListElement);
    }

    #[test]
    fn list_of_afloats_is_listv() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let expr = Expr::List(vec![Expr::AFloat(AFloat::Fix(1.0)), Expr::AFloat(AFloat::Fix(2.0))]);
        let out = eval_expr(&expr, &mut t, &mut c).unwrap();
        match out {
            ArgVal::Val(Value::ListV(ids)) => {
                let got: Vec<f64> = ids.iter().map(|&id| c.tape.num_of(id)).collect();
                assert_eq!(got, vec![1.0, 2.0]);
            }
            _ => panic!("expected ListV"),
        }
    }

    #[test]
    fn list_of_vectors_is_llist() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let expr = Expr::List(vec![
            Expr::Vector(vec![Expr::IntLit(1), Expr::IntLit(2)]),
            Expr::Vector(vec![Expr::IntLit(3), Expr::IntLit(4)]),
        ]);
        let out = eval_expr(&expr, &mut t, &mut c).unwrap();
        match out {
            ArgVal::Val(Value::LListV(rows)) => assert_eq!(rows.len(), 2),
            _ => panic!("expected LListV"),
        }
    }

    #[test]
    fn vector_access_bounds() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let vec_expr = Expr::Vector(vec![Expr::IntLit(10), Expr::IntLit(20), Expr::IntLit(30)]);
        let access = |i: i64| Expr::VectorAccess(Box::new(vec_expr.clone()), Box::new(Expr::IntLit(i)));
        assert!(eval_expr(&access(-1), &mut t, &mut c).is_err());
        assert!(eval_expr(&access(3), &mut t, &mut c).is_err());
        assert!(eval_expr(&access(0), &mut t, &mut c).is_ok());
        assert!(eval_expr(&access(2), &mut t, &mut c).is_ok());
    }

    #[test]
    fn s4_matrix_access() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let row = |a: i64, b: i64| Expr::Vector(vec![Expr::IntLit(a), Expr::IntLit(b)]);
        let matrix = Expr::Vector(vec![row(1, 2), row(3, 4)]);
        let expr = Expr::MatrixAccess(Box::new(matrix), Box::new(Expr::IntLit(1)), Box::new(Expr::IntLit(0)));
        let out = eval_expr(&expr, &mut t, &mut c).unwrap();
        match out {
            ArgVal::Val(Value::FloatV(id)) => assert_eq!(c.tape.num_of(id), 3.0),
            _ => panic!("expected FloatV"),
        }
    }

    #[test]
    fn unknown_comp_app_is_unknown_function() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        let expr = Expr::CompApp("doesNotExist".to_string(), vec![]);
        let err = eval_expr(&expr, &mut t, &mut c).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnknownFunction);
    }

    #[test]
    fn matrix_literal_and_list_access_are_unimplemented() {
        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let mut c = ctx(&mut tape, &config);
        let mut t = Translation::new();
        assert_eq!(
            eval_expr(&Expr::Matrix(vec![]), &mut t, &mut c).unwrap_err().kind,
            EvalErrorKind::Unimplemented
        );
        let list_access = Expr::ListAccess(Box::new(Expr::IntLit(0)), Box::new(Expr::IntLit(0)));
        assert_eq!(
            eval_expr(&list_access, &mut t, &mut c).unwrap_err().kind,
            EvalErrorKind::Unimplemented
        );
    }
}
