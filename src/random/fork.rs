//! Deterministic derivation of independent random streams.
//!
//! A child stream is keyed by the parent's full generator state (key, stream id
//! and word position) and placed on ChaCha stream `branch`. For one parent
//! state, distinct branch indices therefore select distinct streams, and the
//! parent generator is only read, never advanced.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use xxhash_rust::xxh3::{xxh3_64_with_seed, xxh3_128_with_seed};

const KEY_SEED_LO: u64 = 0x243f_6a88_85a3_08d3;
const KEY_SEED_HI: u64 = 0x1319_8a2e_0370_7344;
const ITEM_SEED: u64 = 0xa409_3822_299f_31d0;

pub(crate) fn fork_rng(parent: &ChaCha8Rng, branch: u32) -> ChaCha8Rng {
    let mut material = [0u8; 56];
    material[..32].copy_from_slice(&parent.get_seed());
    material[32..40].copy_from_slice(&parent.get_stream().to_le_bytes());
    material[40..56].copy_from_slice(&parent.get_word_pos().to_le_bytes());

    let lo = xxh3_128_with_seed(&material, KEY_SEED_LO).to_le_bytes();
    let hi = xxh3_128_with_seed(&material, KEY_SEED_HI).to_le_bytes();
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(&lo);
    key[16..].copy_from_slice(&hi);

    let mut child = ChaCha8Rng::from_seed(key);
    child.set_stream(u64::from(branch));
    child
}

/// Seed for item `index` of a batch run with `base_seed`.
///
/// Depends only on `(base_seed, index)`, so batch results do not depend on
/// which worker thread processed an item.
pub fn derive_item_seed(base_seed: u64, index: u64) -> u64 {
    let mut material = [0u8; 16];
    material[..8].copy_from_slice(&base_seed.to_le_bytes());
    material[8..].copy_from_slice(&index.to_le_bytes());
    xxh3_64_with_seed(&material, ITEM_SEED)
}

#[cfg(test)]
#[path = "../../tests/unit/random/fork.rs"]
mod tests;
