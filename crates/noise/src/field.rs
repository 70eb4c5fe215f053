use cityforge_common::WorldSeed;

use crate::permutation::PermutationTable;

// Offsets added before sampling so terrain, districts, moisture, buildings
// and roads read unrelated regions of the same field.
const HILL_OFFSET: f64 = 5_000.0;
const DISTRICT_OFFSET: f64 = 10_000.0;
const MOISTURE_OFFSET: f64 = 20_000.0;
const BUILDING_OFFSET: f64 = 30_000.0;
const ROAD_OFFSET: f64 = 40_000.37;

/// Base rolling terrain amplitude in world units.
const TERRAIN_BASE_AMPLITUDE: f64 = 12.0;
/// Ridged hill amplitude in world units.
const TERRAIN_HILL_AMPLITUDE: f64 = 18.0;

/// Frequency used when sampling road jitter. Deliberately irrational-looking
/// so grid-aligned road positions never land on simplex lattice points,
/// where the noise is exactly zero.
const ROAD_SAMPLE_SCALE: f64 = 0.013_7;
const BUILDING_SAMPLE_SCALE: f64 = 0.047;
/// Stretch applied to the raw building sample before mapping to `[0, 1]`.
/// Fitted so that about 15% of samples land at or below 0.15.
const BUILDING_SPREAD: f64 = 1.36;

/// Seeded noise source. Cheap to clone; holds only the permutation table.
#[derive(Debug, Clone)]
pub struct NoiseField {
    seed: WorldSeed,
    pub(crate) perm: PermutationTable,
}

impl NoiseField {
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            perm: PermutationTable::from_seed(seed),
        }
    }

    /// Rebuild the permutation table from scratch for `seed`.
    pub fn set_seed(&mut self, seed: WorldSeed) {
        tracing::debug!(seed, "rebuilding permutation table");
        self.seed = seed;
        self.perm = PermutationTable::from_seed(seed);
    }

    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    pub fn permutation(&self) -> &PermutationTable {
        &self.perm
    }

    /// Ground height in world units at `(x, z)`: rolling fBm plus ridged hills.
    /// Range is `[-TERRAIN_BASE_AMPLITUDE, TERRAIN_BASE_AMPLITUDE + TERRAIN_HILL_AMPLITUDE]`.
    pub fn terrain_height(&self, x: f64, z: f64) -> f64 {
        let base = self.fbm2(x, z, 5, 0.5, 2.0, 0.0015);
        let hills = self.ridged2(x + HILL_OFFSET, z + HILL_OFFSET, 4, 0.5, 2.0, 0.0008);
        base * TERRAIN_BASE_AMPLITUDE + hills * TERRAIN_HILL_AMPLITUDE
    }

    /// Low-frequency field in `[-1, 1]` used for district-scale variation.
    pub fn district_noise(&self, x: f64, z: f64) -> f64 {
        self.fbm2(x + DISTRICT_OFFSET, z + DISTRICT_OFFSET, 3, 0.5, 2.0, 0.002)
    }

    /// Moisture field in `[-1, 1]`. Sampled through the 3D field on a fixed
    /// slice so it shares no lattice with the 2D helpers.
    pub fn moisture_noise(&self, x: f64, z: f64) -> f64 {
        self.fbm3(x, MOISTURE_OFFSET, z, 4, 0.5, 2.0, 0.002)
    }

    /// Building density in `[0, 1]`. Plots sampling above the buildable
    /// threshold may carry a building; the default threshold of 0.15 leaves
    /// roughly 85% of samples above it.
    pub fn building_noise(&self, x: f64, z: f64) -> f64 {
        let n = self.simplex2(
            (x + BUILDING_OFFSET) * BUILDING_SAMPLE_SCALE,
            (z + BUILDING_OFFSET) * BUILDING_SAMPLE_SCALE,
        );
        (0.5 + 0.5 * BUILDING_SPREAD * n).clamp(0.0, 1.0)
    }

    /// Road jitter field in `[-1, 1]`.
    pub fn road_noise(&self, x: f64, z: f64) -> f64 {
        self.simplex2(
            x * ROAD_SAMPLE_SCALE + ROAD_OFFSET,
            z * ROAD_SAMPLE_SCALE + ROAD_OFFSET,
        )
    }
}
