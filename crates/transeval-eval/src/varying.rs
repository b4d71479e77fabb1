//! Varying map construction and insertion (§4.7).

use rustc_hash::FxHashMap;
use transeval_common::{EvalError, EvalErrorKind, Path, Result, ScalarId, TagExpr, Translation, Value};

use crate::store;
use crate::tape::Tape;

/// Fast path→value map the resolver consults before the translation (§4.5 step 1).
/// Struct-keyed rather than canonical-string-keyed in memory, per the §9 "Path keys"
/// design note; canonical string form is reserved for the wire boundary (§4.7/§6).
pub type VaryingMap = FxHashMap<Path, ScalarId>;

/// `genPathMap`: build a varying map from aligned `paths`/`values` arrays, wrapping
/// each raw scalar as a differentiable leaf (§2 step 1 "Prepare"). Length mismatch is
/// fatal (§8 property 9); both empty (or both absent, represented by empty slices) is
/// the empty map.
pub fn gen_path_map(paths: &[Path], values: &[f64], tape: &mut Tape) -> Result<VaryingMap> {
    if paths.len() != values.len() {
        return Err(EvalError::new(EvalErrorKind::PathMapLengthMismatch).with_message(format!(
            "{} varying paths but {} varying values",
            paths.len(),
            values.len()
        )));
    }
    let mut map = FxHashMap::default();
    map.reserve(paths.len());
    for (p, &v) in paths.iter().zip(values.iter()) {
        let leaf = tape.leaf(v);
        map.insert(p.clone(), leaf);
    }
    Ok(map)
}

/// §2 step 2 "Insert": write each varying as a `Done` float at its path in the
/// pass-private translation clone.
pub fn insert_varyings(t: &mut Translation, map: &VaryingMap, tape: &Tape) -> Result<()> {
    for (p, &scalar) in map.iter() {
        store::insert_expr(t, p, TagExpr::Done(Value::FloatV(scalar)), tape)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_is_fatal() {
        let mut tape = Tape::new();
        let paths = vec![Path::field("A", "x")];
        let err = gen_path_map(&paths, &[], &mut tape).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::PathMapLengthMismatch);
    }

    #[test]
    fn both_empty_succeeds_with_empty_map() {
        let mut tape = Tape::new();
        let map = gen_path_map(&[], &[], &mut tape).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn insertion_writes_done_float_at_path() {
        use transeval_common::FieldEntry;
        let mut t = Translation::new();
        t.set_field(
            "A",
            "x",
            FieldEntry::FExpr(TagExpr::OptEval(transeval_common::Expr::AFloat(
                transeval_common::AFloat::Fix(3.0),
            ))),
        );
        let mut tape = Tape::new();
        let paths = vec![Path::field("A", "x")];
        let map = gen_path_map(&paths, &[7.0], &mut tape).unwrap();
        insert_varyings(&mut t, &map, &tape).unwrap();
        match t.field("A", "x").unwrap() {
            FieldEntry::FExpr(TagExpr::Done(Value::FloatV(id))) => {
                assert_eq!(tape.num_of(*id), 7.0);
            }
            other => panic!("expected Done(FloatV(7.0)), got {other:?}"),
        }
    }
}
