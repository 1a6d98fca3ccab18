//! Seedable random number generation.
//!
//! Map generation, item placement and the pursuer's steering jitter each draw
//! from their own [`PcgRng`] stream derived from a single session seed, so a
//! replay only has to record that seed.

/// Source of pseudo-random numbers threaded explicitly through generation and AI.
///
/// Implementations must be deterministic: the same initial state always yields
/// the same sequence.
pub trait RngSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform float in `[0, 1)` built from the top 24 bits of [`next_u32`](Self::next_u32).
    fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform integer in `[0, bound)`; returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        ((self.next_f32() * bound as f32) as u32).min(bound - 1)
    }

    /// Uniform integer in `[min, max]`; returns `min` when the range is empty.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        min + self.below(max - min + 1)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Symmetric offset in `[-amplitude, amplitude)`.
    fn jitter(&mut self, amplitude: f32) -> f32 {
        (self.next_f32() - 0.5) * 2.0 * amplitude
    }
}

impl<R: RngSource + ?Sized> RngSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// PCG-XSH-RR generator: 64-bit LCG state, 32-bit permuted output.
///
/// See <https://www.pcg-random.org/>.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generator for one independent stream of a session seed.
    pub fn for_stream(seed: u64, stream: SeedStream) -> Self {
        Self::new(derive_seed(seed, stream))
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

/// Independent consumers of randomness within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[repr(u32)]
pub enum SeedStream {
    Map = 1,
    Items = 2,
    Pursuer = 3,
    Input = 4,
}

/// Mixes a session seed with a stream tag into a well-distributed 64-bit seed.
pub fn derive_seed(seed: u64, stream: SeedStream) -> u64 {
    let mut hash = seed;
    hash ^= (stream as u64).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= seed.rotate_left(17).wrapping_mul(0x517cc1b727220a95);
    hash ^= (stream as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PcgRng::new(42);
        let mut b = PcgRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn floats_and_bounds_stay_in_range() {
        let mut rng = PcgRng::new(7);
        for _ in 0..10_000 {
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f));
            assert!(rng.below(5) < 5);
            let r = rng.range_inclusive(8, 12);
            assert!((8..=12).contains(&r));
            let j = rng.jitter(0.25);
            assert!((-0.25..0.25).contains(&j));
        }
        assert_eq!(rng.below(0), 0);
        assert_eq!(rng.range_inclusive(3, 3), 3);
    }

    #[test]
    fn range_inclusive_reaches_both_ends() {
        let mut rng = PcgRng::new(99);
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            seen[(rng.range_inclusive(8, 12) - 8) as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn streams_diverge() {
        let map = derive_seed(1234, SeedStream::Map);
        let items = derive_seed(1234, SeedStream::Items);
        let pursuer = derive_seed(1234, SeedStream::Pursuer);
        assert_ne!(map, items);
        assert_ne!(items, pursuer);
        assert_eq!(map, derive_seed(1234, SeedStream::Map));
    }
}
