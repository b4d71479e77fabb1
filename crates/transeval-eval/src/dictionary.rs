//! The computation dictionary (§4.11, §6): a name → callable registry for style
//! functions, mirroring the teacher crate's `function_registry` module — a process-
//! wide, `Sync` registry populated at start-up rather than per pass (§5).

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use transeval_common::{ArgVal, EvalError, EvalErrorKind, Result, Value};

use crate::tape::Tape;

/// Gradient components surfaced to `derivative`/`derivativePreconditioned` calls
/// (§4.4, §6 "params bundle containing the most recent gradient vectors"). Keyed by
/// the canonical-path-as-JSON string the evaluator rewrites accessors into.
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub gradient: FxHashMap<String, f64>,
    pub gradient_preconditioned: FxHashMap<String, f64>,
}

/// Every function reachable from `CompApp` except the two reserved derivative names
/// (those go through [`DerivativeFn`] instead, since their signature differs — they
/// consume `(DebugInfo, path-as-string)` rather than unwrapped `ArgVal`s, per §4.4).
pub trait StyleFunction: Send + Sync {
    fn call(&self, tape: &mut Tape, args: &[ArgVal]) -> Result<Value>;

    /// Declared arity, if fixed; `None` means variadic. Checked before `call`.
    fn arity(&self) -> Option<usize> {
        None
    }
}

pub trait DerivativeFn: Send + Sync {
    fn call(&self, tape: &mut Tape, debug: &DebugInfo, path_json: &str) -> Result<Value>;
}

fn unknown_function(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::UnknownFunction).with_message(name.to_string())
}

fn arity_mismatch(name: &str, want: usize, got: usize) -> EvalError {
    EvalError::new(EvalErrorKind::InvalidOperand)
        .with_message(format!("{name} expects {want} argument(s), got {got}"))
}

/// Name → callable registry. Construct one per application (or use
/// [`default_dictionary`]); registration is expected at start-up, matching §5's note
/// that this is the one process-wide exception to the evaluator's otherwise per-pass
/// resource model.
pub struct Dictionary {
    functions: DashMap<String, Arc<dyn StyleFunction>>,
    derivatives: DashMap<String, Arc<dyn DerivativeFn>>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            functions: DashMap::new(),
            derivatives: DashMap::new(),
        }
    }

    pub fn register(&self, name: impl Into<String>, f: Arc<dyn StyleFunction>) {
        self.functions.insert(name.into(), f);
    }

    pub fn register_derivative(&self, name: impl Into<String>, f: Arc<dyn DerivativeFn>) {
        self.derivatives.insert(name.into(), f);
    }

    pub fn call(&self, name: &str, tape: &mut Tape, args: &[ArgVal]) -> Result<Value> {
        let f = self.functions.get(name).ok_or_else(|| unknown_function(name))?;
        if let Some(want) = f.arity() {
            if want != args.len() {
                return Err(arity_mismatch(name, want, args.len()));
            }
        }
        f.call(tape, args)
    }

    pub fn call_derivative(
        &self,
        name: &str,
        tape: &mut Tape,
        debug: &DebugInfo,
        path_json: &str,
    ) -> Result<Value> {
        let f = self.derivatives.get(name).ok_or_else(|| unknown_function(name))?;
        f.call(tape, debug, path_json)
    }

    pub fn is_derivative_name(name: &str) -> bool {
        name == "derivative" || name == "derivativePreconditioned"
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `debug.gradient[path_json]`, defaulting to `0.0` for paths the optimizer has
/// not yet produced a gradient component for (a fresh varying with no history).
struct Derivative;
impl DerivativeFn for Derivative {
    fn call(&self, tape: &mut Tape, debug: &DebugInfo, path_json: &str) -> Result<Value> {
        let x = debug.gradient.get(path_json).copied().unwrap_or(0.0);
        Ok(Value::FloatV(tape.const_of(x)))
    }
}

struct DerivativePreconditioned;
impl DerivativeFn for DerivativePreconditioned {
    fn call(&self, tape: &mut Tape, debug: &DebugInfo, path_json: &str) -> Result<Value> {
        let x = debug.gradient_preconditioned.get(path_json).copied().unwrap_or(0.0);
        Ok(Value::FloatV(tape.const_of(x)))
    }
}

/// `absVal` over a single `FloatV`/`IntV` argument — an illustrative reference style
/// function exercising the autodiff surface end to end.
struct AbsVal;
impl StyleFunction for AbsVal {
    fn call(&self, tape: &mut Tape, args: &[ArgVal]) -> Result<Value> {
        let v = args[0].as_value().ok_or_else(|| {
            EvalError::new(EvalErrorKind::TypeMismatch).with_message("absVal expects a value, not a GPI")
        })?;
        match v {
            Value::FloatV(s) => Ok(Value::FloatV(tape.abs_val(*s))),
            Value::IntV(i) => Ok(Value::IntV(i.abs())),
            other => Err(EvalError::new(EvalErrorKind::TypeMismatch)
                .with_message(format!("absVal not defined for {}", other.type_name()))),
        }
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

/// `vectorSum` folds a `VectorV` into a scalar with `tape.add` — exercises the vector
/// autodiff surface the way a real style function (e.g. a perimeter computation)
/// would.
struct VectorSum;
impl StyleFunction for VectorSum {
    fn call(&self, tape: &mut Tape, args: &[ArgVal]) -> Result<Value> {
        let v = args[0].as_value().ok_or_else(|| {
            EvalError::new(EvalErrorKind::TypeMismatch).with_message("vectorSum expects a value, not a GPI")
        })?;
        let elems = v.as_vector().ok_or_else(|| {
            EvalError::new(EvalErrorKind::TypeMismatch).with_message("vectorSum expects a VectorV")
        })?;
        let mut acc = match elems.first() {
            Some(&first) => first,
            None => return Ok(Value::FloatV(tape.const_of(0.0))),
        };
        for &e in &elems[1..] {
            acc = tape.add(acc, e);
        }
        Ok(Value::FloatV(acc))
    }

    fn arity(&self) -> Option<usize> {
        Some(1)
    }
}

/// A process-wide default registry seeded with the reserved derivative names and a
/// couple of reference style functions, so this crate's own tests do not depend on an
/// external computation dictionary. Production registrations are expected to come
/// from the upstream style-function layer (§1 "Out of scope").
pub fn default_dictionary() -> &'static Dictionary {
    static DICT: Lazy<Dictionary> = Lazy::new(|| {
        let dict = Dictionary::new();
        dict.register_derivative("derivative", Arc::new(Derivative));
        dict.register_derivative("derivativePreconditioned", Arc::new(DerivativePreconditioned));
        dict.register("absVal", Arc::new(AbsVal));
        dict.register("vectorSum", Arc::new(VectorSum));
        dict
    });
    &DICT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_function_errors() {
        let dict = Dictionary::new();
        let mut tape = Tape::new();
        let err = dict.call("nope", &mut tape, &[]).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::UnknownFunction);
    }

    #[test]
    fn abs_val_handles_negative_float() {
        let dict = default_dictionary();
        let mut tape = Tape::new();
        let s = tape.const_of(-4.0);
        let out = dict.call("absVal", &mut tape, &[ArgVal::Val(Value::FloatV(s))]).unwrap();
        match out {
            Value::FloatV(id) => assert_eq!(tape.num_of(id), 4.0),
            _ => panic!("expected FloatV"),
        }
    }

    #[test]
    fn vector_sum_folds_elements() {
        let dict = default_dictionary();
        let mut tape = Tape::new();
        let ids: Vec<_> = [1.0, 2.0, 3.0].iter().map(|&x| tape.const_of(x)).collect();
        let out = dict
            .call("vectorSum", &mut tape, &[ArgVal::Val(Value::VectorV(ids))])
            .unwrap();
        match out {
            Value::FloatV(id) => assert_eq!(tape.num_of(id), 6.0),
            _ => panic!("expected FloatV"),
        }
    }

    #[test]
    fn derivative_defaults_to_zero_for_unknown_path() {
        let dict = default_dictionary();
        let mut tape = Tape::new();
        let debug = DebugInfo::default();
        let out = dict.call_derivative("derivative", &mut tape, &debug, "\"nope\"").unwrap();
        match out {
            Value::FloatV(id) => assert_eq!(tape.num_of(id), 0.0),
            _ => panic!("expected FloatV"),
        }
    }
}
