//! Seeded pseudo-random stream for reproducible point placement.
//!
//! [`Mulberry32`] is a tiny 32-bit state generator. The same seed always
//! yields the same sequence, which is what makes a cloud reproducible: the
//! seed shown in the panel fully determines every point position.

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32 generator. Owned by a single generation pass; reseeding means
/// constructing a fresh instance.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Create a generator from a 32-bit seed. A zero seed is remapped to 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Advance the state and return the next mixed 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_raw() as f64 / TWO_POW_32
    }
}

/// Coerce an arbitrary number into a 32-bit seed.
///
/// Truncates toward zero and wraps modulo 2^32, so negative and fractional
/// inputs are normalized rather than rejected. Non-finite values map to 0
/// (which the generator in turn remaps to 1).
pub fn coerce_seed(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc() % TWO_POW_32;
    let wrapped = if wrapped < 0.0 { wrapped + TWO_POW_32 } else { wrapped };
    wrapped as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence_for_seed_42() {
        let mut rng = Mulberry32::new(42);
        let expected = [
            0.6011037519201636,
            0.44829055899754167,
            0.8524657934904099,
            0.6697340414393693,
            0.17481389874592423,
        ];
        for value in expected {
            assert_eq!(rng.next_f64(), value);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Mulberry32::new(123_456);
        let mut b = Mulberry32::new(123_456);
        for _ in 0..2000 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
    }

    #[test]
    fn test_output_in_unit_interval() {
        let mut rng = Mulberry32::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_zero_seed_is_remapped() {
        let mut zero = Mulberry32::new(0);
        let mut one = Mulberry32::new(1);
        for _ in 0..16 {
            assert_eq!(zero.next_raw(), one.next_raw());
        }
    }

    #[test]
    fn test_nearby_seeds_diverge() {
        let first: Vec<u32> = (1..=64u32).map(|seed| Mulberry32::new(seed).next_raw()).collect();
        let mut unique = first.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn test_no_short_cycle() {
        let mut rng = Mulberry32::new(99);
        let start: Vec<u32> = (0..4).map(|_| rng.next_raw()).collect();
        let mut window: Vec<u32> = start.clone();
        for _ in 0..100_000 {
            window.remove(0);
            window.push(rng.next_raw());
            assert_ne!(window, start);
        }
    }

    #[test]
    fn test_coerce_seed() {
        assert_eq!(coerce_seed(42.9), 42);
        assert_eq!(coerce_seed(-1.0), u32::MAX);
        assert_eq!(coerce_seed(-0.7), 0);
        assert_eq!(coerce_seed(4_294_967_296.0 + 5.0), 5);
        assert_eq!(coerce_seed(f64::NAN), 0);
        assert_eq!(coerce_seed(f64::INFINITY), 0);
    }
}
