//! Faster (but not DoS-resistant) hashmaps
use hash_hasher::HashBuildHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hash, Hasher};

/// Act like a streaming farmhash
///
/// Farmhash isn't a streaming hash, so every write hashes its bytes seeded with the state left by
/// the previous write. `str` keys write their bytes and then a terminator byte, so both writes
/// have to contribute or every string lands in the same bucket.
pub struct FarmHashLie(u64);

impl Default for FarmHashLie {
    #[inline]
    fn default() -> FarmHashLie { FarmHashLie(0) }
}

impl Hasher for FarmHashLie {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = farmhash::hash64_with_seed(bytes, self.0);
    }
}

pub type Farm = BuildHasherDefault<FarmHashLie>;
pub type FarmMap<X, Y> = HashMap<X, Y, Farm>;

pub type FarmSet<X> = HashSet<X, Farm>;

pub fn new_farm<X: Hash + Eq, Y>() -> FarmMap<X, Y> {
    Default::default()
}

pub fn new_farm_set<X: Hash + Eq>() -> FarmSet<X> {
    Default::default()
}

/// For keys that are already as good as a hash (packed node ids)
pub type PlainMap<X, Y> = HashMap<X, Y, HashBuildHasher>;

pub fn new_plain<X: Hash + Eq, Y>() -> PlainMap<X, Y> {
    Default::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_do_not_all_collide() {
        let hash = |s: &str| {
            let mut h = FarmHashLie::default();
            s.hash(&mut h);
            h.finish()
        };
        assert_ne!(hash("worker"), hash("workers"));
        assert_eq!(hash("worker"), hash("worker"));
    }

    #[test]
    fn farm_map_behaves_like_a_map() {
        let mut m = new_farm::<String, usize>();
        m.insert("wage".to_string(), 1);
        m.insert("job".to_string(), 2);
        assert_eq!(m.get("wage"), Some(&1));
        assert_eq!(m.get("job"), Some(&2));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn farm_set_dedups() {
        let mut s: FarmSet<String> = new_farm_set();
        assert!(s.insert("minimum wage".to_string()));
        assert!(!s.insert("minimum wage".to_string()));
        assert!(s.insert("wage".to_string()));
        assert_eq!(s.len(), 2);
    }
}
