//! Pass orchestration (§2): the two entry points a caller drives — `eval_shapes`
//! (Prepare → Insert → Evaluate shapes → Sort → Return) and `eval_functions`
//! (objective/constraint argument lists, no varying insertion). Both accept the
//! optimizer's `Params` bundle (§6) so `derivative`/`derivativePreconditioned` calls
//! can surface real gradient components rather than always reading an empty map.

use std::collections::HashSet;

use transeval_common::{ArgVal, Expr, Path, Result, Translation};

use crate::config::EvalConfig;
use crate::ctx::EvalContext;
use crate::dictionary::{DebugInfo, Dictionary};
use crate::eval::eval_expr;
use crate::shape::{eval_shapes as eval_shapes_inner, Shape};
use crate::state::Params;
use crate::tape::Tape;
use crate::telemetry::{pass_debug, pass_trace};
use crate::varying::{self, VaryingMap};

pub struct ShapesInput<'a> {
    pub translation: &'a Translation,
    pub varying_paths: &'a [Path],
    pub varying_values: &'a [f64],
    pub shape_paths: &'a [Path],
    pub shape_ordering: &'a [String],
    /// The optimizer's most recent gradient vectors (§6), consulted by `derivative`/
    /// `derivativePreconditioned` calls reached while evaluating shapes. `None` is
    /// the pre-optimization case (first pass, no gradient history yet).
    pub params: Option<&'a Params>,
}

pub struct ShapesOutput {
    pub shapes: Vec<Shape>,
    pub varying_map: VaryingMap,
}

/// §2's five-step control flow. The caller's `translation` is never mutated — the
/// pass clones it at entry and discards the clone at return (§3.5, §8 property 1).
pub fn eval_shapes(
    input: ShapesInput<'_>,
    tape: &mut Tape,
    dict: &Dictionary,
    config: &EvalConfig,
) -> Result<ShapesOutput> {
    pass_debug!(shapes = input.shape_paths.len(), "starting shape pass");

    // Prepare.
    let varying_map = varying::gen_path_map(input.varying_paths, input.varying_values, tape)?;

    // Insert, into a private clone.
    let mut t = input.translation.clone();
    varying::insert_varyings(&mut t, &varying_map, tape)?;

    // Evaluate shapes, then Sort.
    let debug = input.params.map(DebugInfo::from);
    let mut visiting = config.detect_cycles.then(HashSet::<Path>::new);
    let mut ctx = EvalContext {
        tape,
        dict,
        varying: Some(&varying_map),
        debug: debug.as_ref(),
        config,
        visiting: visiting.as_mut(),
    };
    let shapes = eval_shapes_inner(input.shape_paths, input.shape_ordering, &mut t, &mut ctx)?;

    pass_trace!(shapes = shapes.len(), "shape pass complete");
    Ok(ShapesOutput { shapes, varying_map })
}

/// The second entry point (§2): evaluate the argument lists of objectives/
/// constraints against the same translation and varying map. Does not insert
/// varyings; `params` plays the same role as in `eval_shapes`.
#[allow(clippy::too_many_arguments)]
pub fn eval_functions(
    translation: &Translation,
    varying_paths: &[Path],
    varying_values: &[f64],
    arg_lists: &[Vec<Expr>],
    params: Option<&Params>,
    tape: &mut Tape,
    dict: &Dictionary,
    config: &EvalConfig,
) -> Result<Vec<Vec<ArgVal>>> {
    let varying_map = varying::gen_path_map(varying_paths, varying_values, tape)?;
    let mut t = translation.clone();
    let debug = params.map(DebugInfo::from).unwrap_or_default();
    let mut visiting = config.detect_cycles.then(HashSet::<Path>::new);
    let mut ctx = EvalContext {
        tape,
        dict,
        varying: Some(&varying_map),
        debug: Some(&debug),
        config,
        visiting: visiting.as_mut(),
    };

    let mut out = Vec::with_capacity(arg_lists.len());
    for args in arg_lists {
        let mut tuple = Vec::with_capacity(args.len());
        for e in args {
            tuple.push(eval_expr(e, &mut t, &mut ctx)?);
        }
        out.push(tuple);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::default_dictionary;
    use transeval_common::{AFloat, FieldEntry, TagExpr, Value};

    #[test]
    fn purity_of_a_pass_leaves_caller_translation_untouched() {
        let mut t = Translation::new();
        t.set_field("A", "x", FieldEntry::FExpr(TagExpr::OptEval(Expr::AFloat(AFloat::Fix(3.0)))));
        let before = t.clone();

        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let varying_paths = vec![Path::field("A", "x")];
        let input = ShapesInput {
            translation: &t,
            varying_paths: &varying_paths,
            varying_values: &[7.0],
            shape_paths: &[],
            shape_ordering: &[],
            params: None,
        };
        let _ = eval_shapes(input, &mut tape, default_dictionary(), &config).unwrap();
        assert_eq!(t, before);
    }

    #[test]
    fn s1_varying_override_writes_done_float() {
        let mut t = Translation::new();
        t.set_field("A", "x", FieldEntry::FExpr(TagExpr::OptEval(Expr::AFloat(AFloat::Fix(3.0)))));

        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let varying_paths = vec![Path::field("A", "x")];
        let input = ShapesInput {
            translation: &t,
            varying_paths: &varying_paths,
            varying_values: &[7.0],
            shape_paths: &[],
            shape_ordering: &[],
            params: None,
        };
        let out = eval_shapes(input, &mut tape, default_dictionary(), &config).unwrap();
        let scalar = out.varying_map.get(&Path::field("A", "x")).unwrap();
        assert_eq!(tape.num_of(*scalar), 7.0);
    }

    #[test]
    fn params_gradient_surfaces_through_derivative_call() {
        let mut t = Translation::new();
        let path = Path::field("A", "x");
        let path_json = serde_json::to_string(&path).unwrap();
        let mut gradient = rustc_hash::FxHashMap::default();
        gradient.insert(path_json, 2.5);
        let params = Params { gradient, gradient_preconditioned: rustc_hash::FxHashMap::default() };

        t.set_field(
            "A",
            "y",
            FieldEntry::FExpr(TagExpr::OptEval(Expr::CompApp(
                "derivative".to_string(),
                vec![Expr::EPath(path)],
            ))),
        );

        let mut tape = Tape::new();
        let config = EvalConfig::default();
        let input = ShapesInput {
            translation: &t,
            varying_paths: &[],
            varying_values: &[],
            shape_paths: &[],
            shape_ordering: &[],
            params: Some(&params),
        };
        let _ = eval_shapes(input, &mut tape, default_dictionary(), &config).unwrap();

        let arg_lists = vec![vec![Expr::CompApp("derivative".to_string(), vec![Expr::EPath(Path::field("A", "x"))])]];
        let out = eval_functions(&t, &[], &[], &arg_lists, Some(&params), &mut tape, default_dictionary(), &config)
            .unwrap();
        match &out[0][0] {
            ArgVal::Val(Value::FloatV(id)) => assert_eq!(tape.num_of(*id), 2.5),
            other => panic!("expected FloatV(2.5), got {other:?}"),
        }
    }
}
