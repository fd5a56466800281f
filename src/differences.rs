// Copyright 2022,2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Enumeration of candidate fourth-power differences d^4 - c^4.
//!
//! Candidates (d, c) are lifted from the good residue pairs modulo M and
//! run through a cascade of cheap congruence filters before the 128-bit
//! difference is computed:
//! the mod 4096 condition for odd c (Morgan), the prime-power valuation
//! bitmap at d - c and d + c, the sum-of-two-fourth-powers tests modulo
//! 2^8, 3^6, 7^3, 11^2, 13^2 and 29^2, and finally the valuation of the
//! difference at 5 itself.
//!
//! Iterating good pairs in the outer loop keeps the per-pair tables hot
//! while the quotient indices stream through.

use crate::arith::{self, pow4_mod};
use crate::residues::{good_pairs, QuarticFilter};
use crate::valuation::bad_valuations;
use crate::{BoundTooLarge, Preferences, Verbosity, M, MAX_BOUND};

/// A difference d^4 - c^4 surviving all congruence filters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CandidateDifference {
    pub diff: u128,
    pub c: u32,
    pub d: u32,
}

impl CandidateDifference {
    /// Index key: the difference is divisible by 5^4 by construction, and
    /// the quotient's low 64 bits are what the scan can recompute cheaply.
    pub fn key(&self) -> u64 {
        (self.diff / 625) as u64
    }
}

/// Prime powers whose sum-of-two-fourth-powers image is a proper subset
/// of the residues, ordered by rejection power.
const FILTER_MODULI: [u32; 6] = [256, 729, 343, 121, 169, 841];

/// All (d^4 - c^4, c, d) with 0 < c < d <= d_max surviving the filters.
pub fn compute_differences(
    d_max: u32,
    prefs: &Preferences,
) -> Result<Vec<CandidateDifference>, BoundTooLarge> {
    if d_max > MAX_BOUND {
        return Err(BoundTooLarge(d_max));
    }
    let pairs = good_pairs();
    if prefs.verbose(Verbosity::Info) {
        eprintln!(
            "Found {} good pairs ({:.4}%)",
            pairs.len(),
            100.0 * pairs.len() as f64 / (M as f64 * M as f64)
        );
    }
    let is_bad = bad_valuations(2 * d_max);
    let pow4_4096 = pow4_mod(4096);
    let filters: Vec<QuarticFilter> = FILTER_MODULI.iter().map(|&m| QuarticFilter::new(m)).collect();

    let mut differences = vec![];
    let imax = d_max / M;
    for &(k, l) in &pairs {
        for iq in 0..=imax {
            let d = M * iq + k;
            if d > d_max {
                break;
            }
            let d4 = arith::pow4(d as u64);
            let pd4096 = pow4_4096[(d & 4095) as usize];
            for jq in 0..=iq {
                let c = M * jq + l;
                if c >= d {
                    break;
                }
                if c == 0 {
                    continue;
                }
                // For odd c, d^4 = c^4 mod 2^12 (Morgan).
                if c & 1 == 1 && pow4_4096[(c & 4095) as usize] != pd4096 {
                    continue;
                }
                if is_bad.get_unchecked((d - c) as usize)
                    || is_bad.get_unchecked((d + c) as usize)
                {
                    continue;
                }
                if !filters.iter().all(|f| f.admits(d, c)) {
                    continue;
                }
                let diff = d4 - arith::pow4(c as u64);
                // 5^4 | diff already; an exponent of 5 that is not a
                // multiple of 4 means no solution.
                if diff % 3125 == 0 && diff % 390625 != 0 {
                    continue;
                }
                differences.push(CandidateDifference { diff, c, d });
            }
        }
    }
    if prefs.verbose(Verbosity::Info) {
        eprintln!(
            "Found {} candidate differences ({:.6}%)",
            differences.len(),
            100.0 * differences.len() as f64 / (d_max as f64 * d_max as f64)
        );
    }
    Ok(differences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::pow4;
    use crate::Q;

    fn silent() -> Preferences {
        Preferences {
            verbosity: Verbosity::Silent,
            ..Preferences::default()
        }
    }

    #[test]
    fn test_bound_too_large() {
        assert_eq!(
            compute_differences(MAX_BOUND + 1, &silent()),
            Err(BoundTooLarge(MAX_BOUND + 1))
        );
    }

    #[test]
    fn test_small_bounds_empty() {
        for d_max in [1, 2, 3, 100] {
            let diffs = compute_differences(d_max, &silent()).unwrap();
            assert!(diffs.is_empty(), "d_max={d_max}");
        }
    }

    #[test]
    fn test_invariants() {
        let d_max = 100_000;
        let diffs = compute_differences(d_max, &silent()).unwrap();
        assert!(!diffs.is_empty());
        for cd in &diffs {
            assert!(0 < cd.c && cd.c < cd.d && cd.d <= d_max);
            assert_eq!(cd.diff, pow4(cd.d as u64) - pow4(cd.c as u64));
            assert_eq!(cd.diff % 625, 0);
            assert_eq!(cd.key(), (cd.diff / 625) as u64);
        }
        // (c, d) pairs are unique, so differences are too.
        let mut seen: Vec<(u32, u32)> = diffs.iter().map(|cd| (cd.c, cd.d)).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), diffs.len());

        // Deterministic output.
        assert_eq!(diffs, compute_differences(d_max, &silent()).unwrap());
    }

    // Sum-of-two-fourth-powers membership per filter modulus, brute forced.
    fn oracle_sums() -> Vec<Vec<bool>> {
        FILTER_MODULI
            .iter()
            .map(|&m| {
                let mut sums = vec![false; m as usize];
                for i in 0..m as u64 {
                    for j in 0..m as u64 {
                        sums[((pow4(i) + pow4(j)) % m as u128) as usize] = true;
                    }
                }
                sums
            })
            .collect()
    }

    // Filter cascade recomputed from scratch, without the lifted loops or
    // the precomputed tables.
    fn survives_slow(c: u32, d: u32, sums: &[Vec<bool>]) -> bool {
        // Residue conditions modulo M.
        if d % 8 != 1 || d % 5 == 0 {
            return false;
        }
        if pow4(d as u64) % Q as u128 != pow4(c as u64) % Q as u128 {
            return false;
        }
        if !matches!(c % 8, 0 | 1 | 7) {
            return false;
        }
        if d % 3 == 0 && c % 3 == 0 {
            return false;
        }
        // Morgan condition.
        if c % 2 == 1 && pow4(d as u64) % 4096 != pow4(c as u64) % 4096 {
            return false;
        }
        // Prime valuations of d - c and d + c.
        for n in [d - c, d + c] {
            let mut n = n as u64;
            let mut p = 2u64;
            while p * p <= n {
                if n % p == 0 {
                    let mut v = 0;
                    while n % p == 0 {
                        v += 1;
                        n /= p;
                    }
                    if p % 2 == 1 && p % 8 != 1 && v % 4 != 0 {
                        return false;
                    }
                }
                p += 1;
            }
            if n > 1 && n % 2 == 1 && n % 8 != 1 {
                return false;
            }
        }
        // Sum-of-two-fourth-powers images.
        let diff = pow4(d as u64) - pow4(c as u64);
        for (idx, m) in FILTER_MODULI.iter().enumerate() {
            if !sums[idx][(diff % *m as u128) as usize] {
                return false;
            }
        }
        !(diff % 3125 == 0 && diff % 390625 != 0)
    }

    #[test]
    fn test_exhaustive_small_bound() {
        // Below M the lifted enumeration degenerates to the good pairs
        // themselves; cross-check against a from-scratch oracle.
        let d_max = 1000;
        let diffs = compute_differences(d_max, &silent()).unwrap();
        let set: Vec<(u32, u32)> = diffs.iter().map(|cd| (cd.c, cd.d)).collect();
        let sums = oracle_sums();
        for d in 2..=d_max {
            for c in 1..d {
                assert_eq!(
                    set.contains(&(c, d)),
                    survives_slow(c, d, &sums),
                    "c={c} d={d}"
                );
            }
        }
    }
}
