//! Pass-level evaluator configuration (§4.9).

/// Knobs that affect a single evaluation pass. Constructed once per caller and
/// threaded through every `agent()`-style entry point as `&EvalConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    /// Resolve §4.5.1's optional cycle guard, off by default to match the spec's
    /// literal "unchecked DAG" behaviour. Turning this on trades a `CyclicPath` error
    /// for what would otherwise be a stack overflow on a malformed translation.
    pub detect_cycles: bool,
    /// Only consulted by test helpers that compare autodiff scalars by value; the
    /// evaluator itself never rounds.
    pub float_epsilon: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            detect_cycles: false,
            float_epsilon: 1e-9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_literal_behavior() {
        let cfg = EvalConfig::default();
        assert!(!cfg.detect_cycles);
    }
}
