use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// Deterministic RNG for the random opening reply.
///
/// Derives a per-position seed from the engine seed and the current Zobrist
/// hash, so the same seed and the same position always produce the same
/// reply, independent of wall-clock or process state.
#[inline]
pub fn rng_for_reply(seed: u64, position_hash: u64) -> impl Rng {
    Pcg64::seed_from_u64(seed ^ position_hash)
}
