#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic procedural hazard generation for The Floor is Lava.
//!
//! The generator layers seeded gradient noise into a boolean hazard mask and
//! then roughens it with two stochastic passes: short branches growing out of
//! existing hazard, and loose circular pools scattered across the grid. Both
//! passes draw from a single seeded stream, so a given configuration, grid
//! size, and seed always reproduce the same mask bit for bit.

pub mod noise;

use floor_is_lava_core::{GridCoord, GridDimensions, HazardMask};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::noise::PerlinNoise;

// Blend of the coarse base layer with a finer fixed-setting detail layer.
const BASE_WEIGHT: f64 = 0.8;
const DETAIL_WEIGHT: f64 = 0.2;
const DETAIL_FREQUENCY_SCALE: f64 = 2.5;
const DETAIL_OCTAVES: u32 = 2;
const DETAIL_PERSISTENCE: f64 = 0.5;

/// Tuning knobs controlling every adjustable aspect of hazard generation.
///
/// Defaults are the tuned values of the original map: roughly 20% coverage
/// with clumped features, light branching, and sparse ragged pools.
#[derive(Clone, Copy, Debug)]
pub struct GenerationConfig {
    /// Spatial scale of the base noise layer; raising it shrinks features.
    pub frequency: f64,
    /// Noise value above which a cell becomes hazardous; raising it thins
    /// overall coverage.
    pub threshold: f64,
    /// Amplitude falloff per octave in (0, 1]; raising it adds detail
    /// inside clumps.
    pub persistence: f64,
    /// Number of fractal octaves summed for the base layer.
    pub octaves: u32,
    /// Chance that a hazardous cell extends into one random neighbor.
    pub branch_probability: f64,
    /// One pool is seeded per this many grid cells.
    pub pool_divisor: usize,
    /// Chance that each cell inside a pool radius is actually marked.
    pub pool_fill_probability: f64,
    /// Smallest pool footprint in cells; half of it acts as the radius.
    pub pool_radius_min: u32,
    /// Largest pool footprint in cells; half of it acts as the radius.
    pub pool_radius_max: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            frequency: 0.035,
            threshold: 0.60,
            persistence: 0.7,
            octaves: 5,
            branch_probability: 0.2,
            pool_divisor: 500,
            pool_fill_probability: 0.3,
            pool_radius_min: 3,
            pool_radius_max: 8,
        }
    }
}

/// Builds hazard masks from layered noise plus seeded post-processing.
#[derive(Clone, Debug, Default)]
pub struct HazardGenerator {
    config: GenerationConfig,
}

impl HazardGenerator {
    /// Creates a generator using the supplied configuration.
    #[must_use]
    pub const fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Configuration driving this generator.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates a hazard mask covering the provided dimensions.
    ///
    /// The mask only ever grows across the generation passes: the noise
    /// threshold decides the base layer, and branching and pooling add
    /// cells without removing any. A zero-area grid yields an empty mask.
    #[must_use]
    pub fn generate(&self, dimensions: GridDimensions, seed: u64) -> HazardMask {
        let mut mask = HazardMask::new(dimensions);
        if dimensions.cell_count() == 0 {
            return mask;
        }

        let field = PerlinNoise::new(seed);
        self.threshold_pass(&mut mask, &field);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.branch_pass(&mut mask, &mut rng);
        self.pool_pass(&mut mask, &mut rng);

        mask
    }

    fn threshold_pass(&self, mask: &mut HazardMask, field: &PerlinNoise) {
        let dimensions = mask.dimensions();

        for y in 0..dimensions.height() as i32 {
            for x in 0..dimensions.width() as i32 {
                let nx = f64::from(x) * self.config.frequency;
                let ny = f64::from(y) * self.config.frequency;

                let base = field.octave(nx, ny, self.config.octaves, self.config.persistence);
                let detail = field.octave(
                    nx * DETAIL_FREQUENCY_SCALE,
                    ny * DETAIL_FREQUENCY_SCALE,
                    DETAIL_OCTAVES,
                    DETAIL_PERSISTENCE,
                );
                let value = base * BASE_WEIGHT + detail * DETAIL_WEIGHT;

                if value > self.config.threshold {
                    let _ = mask.mark(GridCoord::new(x, y));
                }
            }
        }
    }

    /// Extends hazard one cell outward from a snapshot of the base layer.
    ///
    /// The snapshot is taken before any branch commits, so branches never
    /// chain within the pass.
    fn branch_pass(&self, mask: &mut HazardMask, rng: &mut ChaCha8Rng) {
        let probability = self.config.branch_probability.clamp(0.0, 1.0);
        let snapshot: Vec<GridCoord> = mask.iter_hazards().collect();

        for cell in snapshot {
            if rng.gen_bool(probability) {
                let neighbors = cell.neighbors();
                let neighbor = neighbors[rng.gen_range(0..neighbors.len())];
                let _ = mask.mark(neighbor);
            }
        }
    }

    /// Scatters loose circular clusters across the grid.
    ///
    /// Each candidate cell inside a pool radius is marked only with the
    /// fill probability, which leaves organic ragged edges rather than
    /// hard disks.
    fn pool_pass(&self, mask: &mut HazardMask, rng: &mut ChaCha8Rng) {
        let dimensions = mask.dimensions();
        let pool_count = dimensions.cell_count() / self.config.pool_divisor.max(1);
        let fill = self.config.pool_fill_probability.clamp(0.0, 1.0);
        let radius_lo = self.config.pool_radius_min.min(self.config.pool_radius_max);
        let radius_hi = self.config.pool_radius_min.max(self.config.pool_radius_max);

        for _ in 0..pool_count {
            let center_x = rng.gen_range(0..dimensions.width()) as i32;
            let center_y = rng.gen_range(0..dimensions.height()) as i32;
            let center = GridCoord::new(center_x, center_y);
            let radius = rng.gen_range(radius_lo..=radius_hi) as i32;
            let half = radius / 2;

            for dy in -half..=half {
                for dx in -half..=half {
                    if dx * dx + dy * dy > radius * radius / 4 {
                        continue;
                    }

                    let cell = center.offset(dx, dy);
                    if dimensions.contains(cell) && rng.gen_bool(fill) {
                        let _ = mask.mark(cell);
                    }
                }
            }
        }
    }
}
