//! Unary/binary operation semantics over mixed numeric/vector operands (§4.2).
//!
//! The table in §4.2 is deliberately asymmetric — `FloatV * VectorV` is defined but
//! `VectorV * FloatV` is not, `Exp` works on two ints but never on a float — and this
//! module pins that asymmetry rather than normalizing it away (§9 open questions).

use transeval_common::{BinaryOp, EvalError, EvalErrorKind, Result, UnaryOp, Value};

use crate::tape::Tape;

fn type_mismatch(v1: &Value, v2: &Value, op: &str) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch)
        .with_message(format!("{op} not defined for {} and {}", v1.type_name(), v2.type_name()))
}

fn scalar_binary(tape: &mut Tape, op: BinaryOp, a: transeval_common::ScalarId, b: transeval_common::ScalarId) -> Result<Value> {
    match op {
        BinaryOp::BPlus => Ok(Value::FloatV(tape.add(a, b))),
        BinaryOp::BMinus => Ok(Value::FloatV(tape.sub(a, b))),
        BinaryOp::Multiply => Ok(Value::FloatV(tape.mul(a, b))),
        BinaryOp::Divide => Ok(Value::FloatV(tape.div(a, b))),
        BinaryOp::Exp => Err(EvalError::new(EvalErrorKind::Unimplemented)
            .with_message("Exp is not supported on FloatV operands")),
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64, tape: &mut Tape) -> Result<Value> {
    match op {
        BinaryOp::BPlus => Ok(Value::IntV(a + b)),
        BinaryOp::BMinus => Ok(Value::IntV(a - b)),
        BinaryOp::Multiply => Ok(Value::IntV(a * b)),
        BinaryOp::Divide => Ok(Value::FloatV(tape.const_of(a as f64 / b as f64))),
        BinaryOp::Exp => {
            let exp = u32::try_from(b).map_err(|_| {
                EvalError::new(EvalErrorKind::InvalidOperand)
                    .with_message("Exp requires a non-negative integer exponent")
            })?;
            Ok(Value::IntV(a.pow(exp)))
        }
    }
}

/// Evaluate a binary operation per the §4.2 table.
pub fn binary_op(tape: &mut Tape, op: BinaryOp, v1: &Value, v2: &Value) -> Result<Value> {
    use Value::*;
    match (v1, v2) {
        (FloatV(a), FloatV(b)) => scalar_binary(tape, op, *a, *b),
        (FloatV(a), IntV(b)) => {
            let b = tape.const_of(*b as f64);
            scalar_binary(tape, op, *a, b)
        }
        (IntV(a), FloatV(b)) => {
            let a = tape.const_of(*a as f64);
            scalar_binary(tape, op, a, *b)
        }
        (IntV(a), IntV(b)) => int_binary(op, *a, *b, tape),

        (FloatV(s), VectorV(v)) => match op {
            BinaryOp::Multiply => Ok(VectorV(v.iter().map(|&e| tape.mul(*s, e)).collect())),
            _ => Err(type_mismatch(v1, v2, "this operator")),
        },
        (IntV(a), VectorV(v)) => {
            let s = tape.const_of(*a as f64);
            match op {
                BinaryOp::Multiply => Ok(VectorV(v.iter().map(|&e| tape.mul(s, e)).collect())),
                _ => Err(type_mismatch(v1, v2, "this operator")),
            }
        }

        (VectorV(v), FloatV(s)) => match op {
            BinaryOp::Divide => Ok(VectorV(v.iter().map(|&e| tape.div(e, *s)).collect())),
            _ => Err(type_mismatch(v1, v2, "this operator")),
        },
        (VectorV(v), IntV(b)) => {
            let s = tape.const_of(*b as f64);
            match op {
                BinaryOp::Divide => Ok(VectorV(v.iter().map(|&e| tape.div(e, s)).collect())),
                _ => Err(type_mismatch(v1, v2, "this operator")),
            }
        }

        (VectorV(a), VectorV(b)) => {
            if a.len() != b.len() {
                return Err(EvalError::new(EvalErrorKind::TypeMismatch)
                    .with_message("vector operands must have equal length"));
            }
            match op {
                BinaryOp::BPlus => Ok(VectorV(tape.vadd(a, b))),
                BinaryOp::BMinus => Ok(VectorV(tape.vsub(a, b))),
                _ => Err(type_mismatch(v1, v2, "this operator")),
            }
        }

        _ => Err(type_mismatch(v1, v2, "this operator")),
    }
}

/// Evaluate a unary operation. `UPlus` is always `InvalidOperand` (§4.2).
pub fn unary_op(tape: &mut Tape, op: UnaryOp, v: &Value) -> Result<Value> {
    match op {
        UnaryOp::UPlus => Err(EvalError::new(EvalErrorKind::InvalidOperand)
            .with_message("UPlus has no valid operand")),
        UnaryOp::UMinus => match v {
            Value::FloatV(a) => Ok(Value::FloatV(tape.neg(*a))),
            Value::IntV(i) => Ok(Value::IntV(-i)),
            Value::VectorV(vec) => Ok(Value::VectorV(tape.vneg(vec))),
            other => Err(EvalError::new(EvalErrorKind::TypeMismatch)
                .with_message(format!("UMinus not defined for {}", other.type_name()))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transeval_common::BinaryOp::*;

    #[test]
    fn float_plus_int_promotes() {
        let mut tape = Tape::new();
        let f = Value::FloatV(tape.const_of(1.5));
        let i = Value::IntV(2);
        let out = binary_op(&mut tape, BPlus, &f, &i).unwrap();
        match out {
            Value::FloatV(id) => assert_eq!(tape.num_of(id), 3.5),
            _ => panic!("expected FloatV"),
        }
    }

    #[test]
    fn int_divide_int_is_true_division_and_differentiable() {
        let mut tape = Tape::new();
        let a = Value::IntV(7);
        let b = Value::IntV(2);
        let out = binary_op(&mut tape, Divide, &a, &b).unwrap();
        match out {
            Value::FloatV(id) => assert_eq!(tape.num_of(id), 3.5),
            _ => panic!("expected FloatV"),
        }
    }

    #[test]
    fn int_exp_computes_power() {
        let mut tape = Tape::new();
        let out = binary_op(&mut tape, Exp, &Value::IntV(2), &Value::IntV(10)).unwrap();
        assert_eq!(out, Value::IntV(1024));
    }

    #[test]
    fn float_exp_is_unimplemented() {
        let mut tape = Tape::new();
        let a = Value::FloatV(tape.const_of(2.0));
        let b = Value::FloatV(tape.const_of(3.0));
        let err = binary_op(&mut tape, Exp, &a, &b).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::Unimplemented);
    }

    #[test]
    fn vector_times_float_is_type_mismatch_but_float_times_vector_works() {
        let mut tape = Tape::new();
        let v = Value::VectorV(vec![tape.const_of(1.0), tape.const_of(2.0)]);
        let s = Value::FloatV(tape.const_of(3.0));
        assert!(binary_op(&mut tape, Multiply, &v, &s).is_err());
        let out = binary_op(&mut tape, Multiply, &s, &v).unwrap();
        match out {
            Value::VectorV(ids) => {
                let got: Vec<f64> = ids.iter().map(|&id| tape.num_of(id)).collect();
                assert_eq!(got, vec![3.0, 6.0]);
            }
            _ => panic!("expected VectorV"),
        }
    }

    #[test]
    fn vector_plus_vector_is_elementwise_but_multiply_is_type_mismatch() {
        let mut tape = Tape::new();
        let a = Value::VectorV(vec![tape.const_of(1.0), tape.const_of(2.0)]);
        let b = Value::VectorV(vec![tape.const_of(3.0), tape.const_of(4.0)]);
        let sum = binary_op(&mut tape, BPlus, &a, &b).unwrap();
        match sum {
            Value::VectorV(ids) => {
                let got: Vec<f64> = ids.iter().map(|&id| tape.num_of(id)).collect();
                assert_eq!(got, vec![4.0, 6.0]);
            }
            _ => panic!("expected VectorV"),
        }
        assert!(binary_op(&mut tape, Multiply, &a, &b).is_err());
    }

    #[test]
    fn uplus_is_always_invalid() {
        let mut tape = Tape::new();
        let v = Value::IntV(1);
        let err = unary_op(&mut tape, UnaryOp::UPlus, &v).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::InvalidOperand);
    }

    #[test]
    fn uminus_negates_vector_pointwise() {
        let mut tape = Tape::new();
        let v = Value::VectorV(vec![tape.const_of(1.0), tape.const_of(-2.0)]);
        let out = unary_op(&mut tape, UnaryOp::UMinus, &v).unwrap();
        match out {
            Value::VectorV(ids) => {
                let got: Vec<f64> = ids.iter().map(|&id| tape.num_of(id)).collect();
                assert_eq!(got, vec![-1.0, 2.0]);
            }
            _ => panic!("expected VectorV"),
        }
    }
}
