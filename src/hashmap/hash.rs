use std::hash::{Hash, Hasher};
use cityhasher::CityHasher;

pub const HASH_SEED: u64 = 0x87c37b91114253d5;

#[inline]
pub fn sys_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = CityHasher::with_seed(HASH_SEED);
    key.hash(&mut hasher);
    hasher.finish()
}
