//! The opaque autodiff handle.
//!
//! Per the design note "arena-backed autodiff": the evaluator only ever carries
//! *indices* into an external differentiable computation graph, never the graph
//! nodes themselves. `ScalarId` is that index. The arena that resolves a `ScalarId`
//! to a concrete forward value and provides the arithmetic primitives (`add`, `mul`,
//! …) lives in `transeval-eval::tape` — this crate only needs the `Copy` handle so
//! that `Value` and the translation can be cloned cheaply.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScalarId(pub u32);

impl ScalarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
