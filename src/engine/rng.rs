use rand::Rng;

/// Uniform source in `[0, 1)` consumed by the placement engine.
///
/// The source is injected at construction time so tests can substitute a
/// fixed sequence and seeded runs stay bit-for-bit reproducible.
pub type RandomSource = Box<dyn FnMut() -> f64 + Send>;

const LCG_MULTIPLIER: u64 = 9301;
const LCG_INCREMENT: u64 = 49297;
const LCG_MODULUS: u64 = 233280;

/// Fold a seed string into a 32-bit signed hash, one character at a time
/// with wraparound: `hash = (hash * 31 - hash) + char_code`.
fn hash_seed(seed: &str) -> i32 {
    let mut hash: i32 = 0;
    for ch in seed.chars() {
        hash = hash
            .wrapping_mul(31)
            .wrapping_sub(hash)
            .wrapping_add(ch as i32);
    }
    hash
}

/// Deterministic generator derived from a seed string.
///
/// Each draw advances a linear-congruential state and yields
/// `state / modulus`, clamped so the result never reaches 1.0.
pub fn seeded_source(seed: &str) -> RandomSource {
    // The LCG state must be positive and non-zero
    let mut state = u64::from(hash_seed(seed).unsigned_abs()).max(1);
    Box::new(move || {
        state = (state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        (state as f64 / LCG_MODULUS as f64).min(0.999999)
    })
}

/// Non-deterministic generator backed by the thread-local rng.
pub fn thread_source() -> RandomSource {
    Box::new(|| rand::rng().random::<f64>())
}
