//! Hash maps keyed by runtime-issued ids.
//!
//! Ids are small sequential integers, so the Fx hasher is used unless the
//! `std-hash` feature asks for the standard SipHash map.

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::FxHashMap as HashMap;
}

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;
}

/// Map from a runtime id (task, callback or listener id) to `V`.
pub type IdMap<V> = map::HashMap<u64, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_map_inserts_and_removes_by_id() {
        let mut map: IdMap<&str> = IdMap::default();
        map.insert(7, "fetch");
        map.insert(8, "refresh");

        assert_eq!(map.remove(&7), Some("fetch"));
        assert_eq!(map.get(&8), Some(&"refresh"));
        assert!(!map.contains_key(&7));
    }

    #[cfg(not(feature = "std-hash"))]
    #[test]
    fn default_map_uses_fx_hasher() {
        let map: IdMap<()> = IdMap::default();
        let _: &rustc_hash::FxBuildHasher = map.hasher();
    }

    #[cfg(feature = "std-hash")]
    #[test]
    fn std_hash_feature_uses_random_state() {
        let map: IdMap<()> = IdMap::default();
        let _: &std::collections::hash_map::RandomState = map.hasher();
    }
}
