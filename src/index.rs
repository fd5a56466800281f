//! Two-stage membership index over compressed candidate differences.
//!
//! Stage one is a Bloom filter with two probe bits per key; stage two an
//! open-addressed hash table with linear probing, where slot value 0 marks
//! an empty slot. Slots store 32-bit truncations of the 64-bit keys, so a
//! positive lookup is only a hint: callers must confirm every hit against
//! the exact 128-bit differences. Negative answers are authoritative.
//!
//! Both structures are plain contiguous arrays sized by [`crate::params`];
//! during the scan they are shared read-only across worker threads.

use crate::params;

/// Extra slots past the power-of-two range so that a probe run starting
/// near the top always ends on a sentinel.
const PROBE_TAIL: usize = 16;

/// Stand-in slot value for keys whose low 32 bits are zero, which would
/// otherwise be indistinguishable from the empty sentinel. The substitution
/// can only manufacture a false positive, never mask a key.
const ZERO_KEY: u32 = 0x8000_0001;

// SplitMix64 finalizer. Both filter probes and the table slot are derived
// from this single mix.
#[inline]
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

#[inline]
fn slot_key(x: u64) -> u32 {
    match x as u32 {
        0 => ZERO_KEY,
        k => k,
    }
}

pub struct DifferenceIndex {
    filter: Box<[u64]>,
    filter_mask: u64,
    table: Box<[u32]>,
    table_mask: u64,
    entries: usize,
}

impl DifferenceIndex {
    /// An index sized for the given number of keys.
    pub fn for_keys(n_keys: usize) -> Self {
        Self::with_geometry(params::filter_bits(n_keys), params::table_bits(n_keys))
    }

    /// An index with 2^filter_log2 filter bits and 2^table_log2 table slots.
    pub fn with_geometry(filter_log2: u32, table_log2: u32) -> Self {
        assert!((6..=32).contains(&filter_log2));
        assert!(table_log2 <= 32);
        DifferenceIndex {
            filter: vec![0u64; 1 << (filter_log2 - 6)].into_boxed_slice(),
            filter_mask: (1u64 << filter_log2) - 1,
            table: vec![0u32; (1 << table_log2) + PROBE_TAIL].into_boxed_slice(),
            table_mask: (1u64 << table_log2) - 1,
            entries: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    #[inline]
    fn filter_probes(&self, h: u64) -> (usize, usize) {
        ((h & self.filter_mask) as usize, ((h >> 32) & self.filter_mask) as usize)
    }

    pub fn insert(&mut self, x: u64) {
        assert!(x != 0, "zero keys are reserved for empty slots");
        let h = mix64(x);
        let (b1, b2) = self.filter_probes(h);
        self.filter[b1 >> 6] |= 1u64 << (b1 & 63);
        self.filter[b2 >> 6] |= 1u64 << (b2 & 63);

        let mut s = (mix64(h) & self.table_mask) as usize;
        loop {
            // Keep a sentinel 0 after the last occupied slot; failing here
            // means the table was sized for fewer keys than were inserted.
            assert!(s + 1 < self.table.len(), "difference index overflow");
            if self.table[s] == 0 {
                break;
            }
            s += 1;
        }
        self.table[s] = slot_key(x);
        self.entries += 1;
    }

    /// May return a truncation false positive; never a false negative.
    #[inline]
    pub fn contains(&self, x: u64) -> bool {
        let h = mix64(x);
        let (b1, b2) = self.filter_probes(h);
        if self.filter[b1 >> 6] & (1u64 << (b1 & 63)) == 0
            || self.filter[b2 >> 6] & (1u64 << (b2 & 63)) == 0
        {
            return false;
        }
        let key = slot_key(x);
        let mut s = (mix64(h) & self.table_mask) as usize;
        loop {
            let v = self.table[s];
            if v == key {
                return true;
            }
            if v == 0 {
                return false;
            }
            s += 1;
        }
    }
}
