//! Seedable pseudo-random number generator (xorshift64) with the small
//! distribution helpers gameplay code reaches for.

/// Seedable pseudo-random number generator (xorshift64).
/// Deterministic for a given seed, so frames replay identically.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[0, upper_bound)`; 0 when the bound is 0.
    pub fn next_int(&mut self, upper_bound: u32) -> u32 {
        if upper_bound == 0 {
            return 0;
        }
        (self.next_u64() % upper_bound as u64) as u32
    }

    /// Mean of `precision` uniform samples: a bell curve over `[0, 1)`.
    /// Higher precision narrows the curve at the cost of more samples.
    pub fn gaussian(&mut self, precision: u32) -> f32 {
        let n = precision.max(1);
        let sum: f64 = (0..n).map(|_| self.next_f64()).sum();
        (sum / n as f64) as f32
    }

    /// Integer in `[min, max]`, clustered around the middle.
    pub fn bounded_gaussian(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = ordered(min, max);
        let g = self.gaussian(6) as f64;
        scale(lo, hi, g)
    }

    /// Integer in `[min, max]`, both inclusive.
    pub fn int_between(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = ordered(min, max);
        let u = self.next_f64();
        scale(lo, hi, u)
    }

    /// Either `1.0` or `-1.0`.
    pub fn random_sign(&mut self) -> f32 {
        if self.next_f64() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Map `t` in `[0, 1)` onto the integers `lo..=hi`.
fn scale(lo: i32, hi: i32, t: f64) -> i32 {
    let span = hi as f64 - lo as f64 + 1.0;
    let value = (lo as f64 + t * span).floor() as i32;
    value.min(hi)
}
