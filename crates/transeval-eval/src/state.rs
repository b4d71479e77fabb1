//! Varying map & state adapter: the decode/encode boundary crossing the optimizer
//! backend (§4.7, §6).
//!
//! Wire keys are `rng`, `varyingState`, `transr`, `paramsr`, `shapesr`; the in-memory
//! state additionally carries `varyingValues`, `translation`, `originalTranslation`,
//! `shapes`, `params`, `varyingMap`, `pendingMap`, and `rng`. `varyingPaths` is
//! supplied out of band by the optimizer at each call (§6) and is never persisted in
//! either shape.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use transeval_common::{EvalError, EvalErrorKind, Path, Result, Translation, Value};

use crate::shape::{RenderValue, Shape};
use crate::tape::Tape;
use crate::varying::{self, VaryingMap};

/// The gradient vectors the optimizer most recently computed, keyed by the
/// canonical-path-as-JSON string the evaluator uses for derivative lookups (§4.4,
/// §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub gradient: FxHashMap<String, f64>,
    #[serde(default, rename = "gradientPreconditioned")]
    pub gradient_preconditioned: FxHashMap<String, f64>,
}

impl From<&Params> for crate::dictionary::DebugInfo {
    fn from(p: &Params) -> Self {
        Self {
            gradient: p.gradient.clone(),
            gradient_preconditioned: p.gradient_preconditioned.clone(),
        }
    }
}

/// A wire-serializable projection of a [`Shape`] (no autodiff handles cross the
/// boundary — only the already-projected [`RenderValue`]s do).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireShape {
    #[serde(rename = "shapeType")]
    pub shape_type: String,
    pub properties: FxHashMap<String, RenderValue>,
}

impl From<&Shape> for WireShape {
    fn from(s: &Shape) -> Self {
        Self {
            shape_type: s.shape_type.clone(),
            properties: s.properties.clone(),
        }
    }
}

impl From<WireShape> for Shape {
    fn from(w: WireShape) -> Self {
        Self {
            shape_type: w.shape_type,
            properties: w.properties,
        }
    }
}

/// The versioned envelope crossing the optimizer boundary. Every optional field
/// carries `#[serde(default)]` so older documents still decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireState {
    pub rng: String,
    #[serde(rename = "varyingState", default)]
    pub varying_state: Vec<f64>,
    pub transr: Translation,
    #[serde(default)]
    pub paramsr: Params,
    #[serde(default)]
    pub shapesr: Vec<WireShape>,
}

/// The in-memory state a pass reads from and returns an updated copy of.
pub struct RunState {
    pub varying_values: Vec<f64>,
    pub translation: Translation,
    pub original_translation: Translation,
    pub shapes: Vec<Shape>,
    pub params: Params,
    pub varying_map: VaryingMap,
    pub pending_map: FxHashMap<Path, Value>,
    pub rng: SmallRng,
    rng_seed: String,
}

/// Deterministically seed the pass PRNG from the stored seed string (§4.7).
pub fn seed_rng(seed: &str) -> SmallRng {
    // FNV-1a: small, dependency-free, and deterministic across platforms/runs, which
    // is the only property this needs — it is not used for anything
    // security-sensitive.
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in seed.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    SmallRng::seed_from_u64(hash)
}

/// Decode a wire envelope into `RunState`, wrapping `varyingState` into a proper
/// [`VaryingMap`] against the paths the optimizer supplies out of band, and keeping
/// an immutable snapshot of the translation as `original_translation` (§4.7).
pub fn decode(wire: WireState, varying_paths: &[Path], tape: &mut Tape) -> Result<RunState> {
    let varying_map = varying::gen_path_map(varying_paths, &wire.varying_state, tape)?;
    let original_translation = wire.transr.clone();
    let shapes = wire.shapesr.into_iter().map(Shape::from).collect();
    Ok(RunState {
        varying_values: wire.varying_state,
        translation: wire.transr,
        original_translation,
        shapes,
        params: wire.paramsr,
        varying_map,
        pending_map: FxHashMap::default(),
        rng: seed_rng(&wire.rng),
        rng_seed: wire.rng,
    })
}

/// Encode a `RunState` back across the boundary: arrays unwrapped, derived fields
/// (`originalTranslation`, `varyingMap`, `pendingMap`) stripped.
pub fn encode(state: &RunState) -> WireState {
    WireState {
        rng: state.rng_seed.clone(),
        varying_state: state.varying_values.clone(),
        transr: state.translation.clone(),
        paramsr: state.params.clone(),
        shapesr: state.shapes.iter().map(WireShape::from).collect(),
    }
}

pub fn parse_wire_json(json: &str) -> Result<WireState> {
    serde_json::from_str(json)
        .map_err(|e| EvalError::new(EvalErrorKind::TypeMismatch).with_message(format!("invalid wire state: {e}")))
}

pub fn to_wire_json(state: &WireState) -> Result<String> {
    serde_json::to_string(state)
        .map_err(|e| EvalError::new(EvalErrorKind::TypeMismatch).with_message(format!("cannot encode wire state: {e}")))
}
