//! Seeded generation context.
//!
//! Every column (and every struct field) draws from its own `StdRng`, seeded
//! from the top-level seed and the column's path through the spec tree. Two
//! columns never share a stream, so the output of one column does not depend
//! on which other columns exist or the order they are generated in.

use rand::rngs::StdRng;
use rand::SeedableRng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const GOLDEN_RATIO: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed shared by every stream of one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationContext {
    seed: u64,
}

impl GenerationContext {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed of the stream for the column at `path` (outermost name first).
    pub fn stream_seed(&self, path: &[&str]) -> u64 {
        splitmix64(self.seed ^ path_hash(path).wrapping_mul(GOLDEN_RATIO))
    }

    /// Fresh RNG for the column at `path`.
    pub fn rng_for(&self, path: &[&str]) -> StdRng {
        StdRng::seed_from_u64(self.stream_seed(path))
    }
}

/// FNV-1a over the path segments, with a separator byte so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
fn path_hash(path: &[&str]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for segment in path {
        for byte in segment.bytes().chain(std::iter::once(0xff)) {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_RATIO);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
