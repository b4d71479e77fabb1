//! Tree-walking, memoizing, autodiff-producing evaluator for diagram translations.
//!
//! This crate is the evaluator core described by the design: it walks a symbolic
//! translation produced by an upstream style compiler, resolves paths into values
//! with per-pass memoization, and produces both fully materialized shapes (for
//! rendering) and differentiable argument tuples (for the optimizer). The autodiff
//! arena ([`tape`]) and the computation dictionary ([`dictionary`]) are reference
//! implementations of what the design treats as external collaborators — real
//! deployments may swap in their own `Tape`-compatible arena or dictionary registry.

pub mod config;
pub mod ctx;
pub mod dictionary;
pub mod eval;
pub mod ops;
pub mod pass;
pub mod resolver;
pub mod shape;
pub mod state;
pub mod store;
pub mod tape;
mod telemetry;
pub mod varying;

pub use config::EvalConfig;
pub use ctx::EvalContext;
pub use dictionary::{default_dictionary, DebugInfo, Dictionary, DerivativeFn, StyleFunction};
pub use pass::{eval_functions, eval_shapes, ShapesInput, ShapesOutput};
pub use shape::{RenderValue, Shape};
pub use state::{decode, encode, parse_wire_json, to_wire_json, seed_rng, Params, RunState, WireShape, WireState};
pub use tape::Tape;
pub use varying::VaryingMap;
