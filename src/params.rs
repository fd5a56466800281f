//! Geometry of the difference index.

/// log2 of the hash table slot count: the smallest power of two keeping
/// the load factor below 0.5, so linear probe runs stay short.
pub fn table_bits(n_keys: usize) -> u32 {
    let slots = (2 * n_keys.max(1)).next_power_of_two();
    slots.trailing_zeros().max(16)
}

/// log2 of the Bloom filter size in bits. 16+ filter bits per key with two
/// probes keeps the false positive rate around a percent or less.
pub fn filter_bits(n_keys: usize) -> u32 {
    (table_bits(n_keys) + 4).clamp(20, 32)
}

#[test]
fn test_index_geometry() {
    assert_eq!(table_bits(0), 16);
    assert_eq!(table_bits(40_000), 17);
    assert_eq!(filter_bits(40_000), 21);
    for n in [1usize, 1000, 1 << 20, 1 << 26] {
        let k = table_bits(n);
        assert!(1usize << k >= 2 * n, "load factor above 0.5 for {n} keys");
        assert!(filter_bits(n) >= k);
        assert!(filter_bits(n) <= 32);
    }
}
