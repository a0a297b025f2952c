//! Seeded coherent-noise field that feeds hazard generation.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TABLE_SIZE: usize = 256;

/// Classic permutation-table gradient noise over continuous coordinates.
///
/// Sampling is a pure function of the coordinates and the seed: the only
/// randomness lives in [`PerlinNoise::reseed`], which shuffles the
/// permutation table with a seeded stream. Negative coordinates wrap into
/// the table via floor-and-mask indexing.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    // 256 shuffled values duplicated to 512 entries for wrap-free indexing.
    permutation: [usize; TABLE_SIZE * 2],
}

impl PerlinNoise {
    /// Creates a noise field whose permutation table derives from the seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut field = Self {
            permutation: [0; TABLE_SIZE * 2],
        };
        field.reseed(seed);
        field
    }

    /// Deterministically rebuilds the permutation table from the seed.
    pub fn reseed(&mut self, seed: u64) {
        for (value, slot) in self.permutation.iter_mut().take(TABLE_SIZE).enumerate() {
            *slot = value;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.permutation[..TABLE_SIZE].shuffle(&mut rng);
        self.permutation.copy_within(..TABLE_SIZE, TABLE_SIZE);
    }

    /// Raw 3D gradient noise in the range [-1, 1].
    #[must_use]
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;

        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.permutation;
        let a = p[xi] + yi;
        let aa = p[a] + zi;
        let ab = p[a + 1] + zi;
        let b = p[xi + 1] + yi;
        let ba = p[b] + zi;
        let bb = p[b + 1] + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(
                    u,
                    grad(p[ab], x, y - 1.0, z),
                    grad(p[bb], x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    /// Raw 2D gradient noise in the range [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.sample3(x, y, 0.0)
    }

    /// 2D gradient noise remapped into the range [0, 1].
    #[must_use]
    pub fn normalized(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 1.0) / 2.0
    }

    /// Normalized fractal sum of `octaves` noise layers in the range [0, 1].
    ///
    /// Each octave doubles the sampling frequency and scales its amplitude
    /// by `persistence`; the accumulated value is divided by the total
    /// amplitude so the result stays normalized.
    #[must_use]
    pub fn octave(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        if octaves == 0 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.normalized(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        total / max_value
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 != 0 { -u } else { u };
    let v = if h & 2 != 0 { -v } else { v };
    u + v
}

#[cfg(test)]
mod tests {
    use super::{fade, PerlinNoise};

    #[test]
    fn identical_seeds_produce_identical_samples() {
        let first = PerlinNoise::new(0xCAFE);
        let second = PerlinNoise::new(0xCAFE);

        for step in 0..64 {
            let x = step as f64 * 0.173 - 4.0;
            let y = step as f64 * 0.091 - 2.0;
            assert_eq!(first.sample(x, y), second.sample(x, y));
        }
    }

    #[test]
    fn reseed_restores_previous_output() {
        let mut field = PerlinNoise::new(7);
        let before = field.sample(1.5, 2.25);

        field.reseed(99);
        field.reseed(7);
        assert_eq!(field.sample(1.5, 2.25), before);
    }

    #[test]
    fn different_seeds_diverge_somewhere() {
        let first = PerlinNoise::new(1);
        let second = PerlinNoise::new(2);

        let diverges = (0..256).any(|step| {
            let x = step as f64 * 0.37;
            first.sample(x, x * 0.5) != second.sample(x, x * 0.5)
        });
        assert!(diverges, "distinct seeds should disagree somewhere");
    }

    #[test]
    fn normalized_samples_stay_in_unit_interval() {
        let field = PerlinNoise::new(42);

        for step in 0..256 {
            let x = step as f64 * 0.211 - 20.0;
            let y = step as f64 * 0.149 - 11.0;
            let value = field.normalized(x, y);
            assert!((0.0..=1.0).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn octave_samples_stay_in_unit_interval() {
        let field = PerlinNoise::new(42);

        for step in 0..128 {
            let x = step as f64 * 0.31;
            let y = step as f64 * 0.17;
            let value = field.octave(x, y, 5, 0.7);
            assert!((0.0..=1.0).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn negative_coordinates_are_valid_inputs() {
        let field = PerlinNoise::new(3);
        let value = field.normalized(-137.4, -92.8);
        assert!((0.0..=1.0).contains(&value));
    }

    #[test]
    fn fade_curve_pins_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }
}
