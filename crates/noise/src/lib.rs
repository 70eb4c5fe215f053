//! Noise Engine: seeded permutation table, simplex noise and fractal composites.
//!
//! # Invariants
//! - Every sample is a pure function of (seed, coordinates).
//! - `simplex2`, `simplex3`, `fbm2` and `fbm3` stay within `[-1, 1]`;
//!   `ridged2` stays within `[0, 1]`.
//! - Reseeding rebuilds the whole permutation table; there is no partial reseed.

mod field;
mod fractal;
mod permutation;
mod simplex;

pub use field::NoiseField;
pub use permutation::PermutationTable;

pub fn crate_info() -> &'static str {
    "cityforge-noise v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("noise"));
    }
}
