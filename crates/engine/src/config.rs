//! Engine-wide configuration (Design Note 3): no process-wide statics, no
//! global RNG. A [`Machine`][crate::machine::Machine] is built from one of
//! these and owns everything it needs from then on.

/// Configuration for one loaded simulation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether the structural fuzzer (C6) runs at all. When `false`,
    /// `?`-weighted literals evaluate to their literal value unchanged.
    pub fuzz_enabled: bool,
    /// Seeds the per-`Machine` `rand::rngs::StdRng`. Two machines built
    /// with the same seed and the same program produce identical
    /// transition and fuzzing choices.
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fuzz_enabled: true,
            rng_seed: 0,
        }
    }
}
