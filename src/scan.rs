// Copyright 2022,2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Scan of pairwise sums a^4 + b^4 against the difference index.
//!
//! Both a and b are divisible by 5, so a = 5i, b = 5j with j <= i and
//! i^4 + j^4 = (a^4 + b^4) / 5^4, which is exactly the compressed key
//! stored in the index. Keys are compared modulo 2^64; every index hit is
//! confirmed against the exact 128-bit difference list.
//!
//! Ward's classification restricts (a, b, c) mod 8 to permutations of
//! (0, 0, 1) and (0, 0, 7); translated to (i, j) = (a/5, b/5) this leaves
//! five residue pairs mod 8 (which in particular never have i and j both
//! odd). Rows of the (i, j) triangle are independent: workers share the
//! index and candidate list read-only and only synchronize on the
//! solution sink and the stop flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use rayon::prelude::*;

use crate::arith::pow4;
use crate::differences::CandidateDifference;
use crate::index::DifferenceIndex;
use crate::{Preferences, Verbosity};

/// A verified solution a^4 + b^4 + c^4 = d^4.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Solution {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

impl Solution {
    pub fn verify(&self) -> bool {
        pow4(self.a as u64) + pow4(self.b as u64) + pow4(self.c as u64) == pow4(self.d as u64)
    }

    pub fn is_primitive(&self) -> bool {
        let g = num_integer::gcd(num_integer::gcd(self.a, self.b), num_integer::gcd(self.c, self.d));
        g == 1
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut lhs = [self.a, self.b, self.c];
        lhs.sort_unstable();
        write!(f, "{}^4 + {}^4 + {}^4 = {}^4", lhs[0], lhs[1], lhs[2], self.d)
    }
}

// Residues j mod 8 that can pair with a given i mod 8.
fn partner_residues(i_mod8: usize) -> &'static [usize] {
    match i_mod8 {
        0 => &[0, 3, 5],
        3 | 5 => &[0],
        _ => &[],
    }
}

struct Scan<'a> {
    index: &'a DifferenceIndex,
    differences: &'a [CandidateDifference],
    // i^4 truncated to 64 bits; key comparisons happen modulo 2^64.
    pow4w: Vec<u64>,
    prefs: &'a Preferences,
    done: AtomicBool,
    solutions: Mutex<Vec<Solution>>,
}

impl Scan<'_> {
    fn row(&self, i: usize) {
        if self.done.load(Ordering::Relaxed) || self.prefs.abort() {
            return;
        }
        let pi = self.pow4w[i];
        for &r in partner_residues(i % 8) {
            let mut j = if r == 0 { 8 } else { r };
            while j <= i {
                let sum = pi.wrapping_add(self.pow4w[j]);
                if self.index.contains(sum) {
                    self.confirm(i, j);
                }
                j += 8;
            }
        }
    }

    // An index hit: recompute the sum exactly and look it up in the
    // candidate list. Index false positives die here.
    fn confirm(&self, i: usize, j: usize) {
        let (a, b) = (5 * i as u32, 5 * j as u32);
        let sum = pow4(a as u64) + pow4(b as u64);
        for cd in self.differences {
            if cd.diff == sum {
                let sol = Solution {
                    a,
                    b,
                    c: cd.c,
                    d: cd.d,
                };
                debug_assert!(sol.verify());
                if self.prefs.verbose(Verbosity::Verbose) {
                    eprintln!("Confirmed {sol}");
                }
                self.solutions.lock().unwrap().push(sol);
                // Stop the search; rows already running finish their work.
                self.done.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// Scans all a = 5i, b = 5j with j <= i <= d_max/5 in the admissible
/// residue classes and returns the solutions found. The search stops
/// after the first hit, but reports every solution observed before the
/// workers wind down.
pub fn scan_pairwise_sums(
    d_max: u32,
    index: &DifferenceIndex,
    differences: &[CandidateDifference],
    prefs: &Preferences,
    tpool: Option<&rayon::ThreadPool>,
) -> Vec<Solution> {
    let imax = (d_max / 5) as usize;
    let pow4w = (0..=imax as u64)
        .map(|i| {
            let sq = i.wrapping_mul(i);
            sq.wrapping_mul(sq)
        })
        .collect();
    let scan = Scan {
        index,
        differences,
        pow4w,
        prefs,
        done: AtomicBool::new(false),
        solutions: Mutex::new(vec![]),
    };
    if let Some(pool) = tpool {
        pool.install(|| {
            (1..=imax).into_par_iter().for_each(|i| scan.row(i));
        });
    } else {
        for i in 1..=imax {
            if scan.done.load(Ordering::Relaxed) || prefs.abort() {
                break;
            }
            scan.row(i);
        }
    }
    let mut solutions = scan.solutions.into_inner().unwrap();
    solutions.sort_unstable_by_key(|s| (s.d, s.a));
    solutions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_differences;

    fn silent() -> Preferences {
        Preferences {
            verbosity: Verbosity::Silent,
            ..Preferences::default()
        }
    }

    #[test]
    fn test_partner_residues() {
        // (i mod 8, j mod 8) classes compatible with Ward's mod 8
        // classification of (a, b) = (5i, 5j).
        let classes = [(0, 0), (5, 0), (0, 5), (3, 0), (0, 3)];
        for i in 0..8usize {
            for j in 0..8usize {
                let allowed = partner_residues(i).contains(&j);
                assert_eq!(allowed, classes.contains(&(i, j)), "i={i} j={j}");
                // Both a and b odd would give a^4 + b^4 = 2 mod 4.
                assert!(!(allowed && i % 2 == 1 && j % 2 == 1));
            }
        }
    }

    #[test]
    fn test_solution_display() {
        // The three summands print in ascending order.
        let sol = Solution {
            a: 414560,
            b: 95800,
            c: 217519,
            d: 422481,
        };
        assert!(sol.verify());
        assert!(sol.is_primitive());
        assert_eq!(
            sol.to_string(),
            "95800^4 + 217519^4 + 414560^4 = 422481^4"
        );
        assert!(!Solution {
            a: 1,
            b: 2,
            c: 3,
            d: 4,
        }
        .verify());
    }

    #[test]
    fn test_no_solution_below_20000() {
        let prefs = silent();
        let diffs = compute_differences(20_000, &prefs).unwrap();
        let mut index = DifferenceIndex::for_keys(diffs.len());
        for cd in &diffs {
            index.insert(cd.key());
        }
        let sols = scan_pairwise_sums(20_000, &index, &diffs, &prefs, None);
        assert!(sols.is_empty());
    }

    #[test]
    fn test_finds_frye_solution() {
        // The smallest solution, found by Frye following Elkies' curve
        // analysis. 82912^4 does not fit in 64 bits, so this also
        // exercises the truncated key arithmetic.
        let prefs = silent();
        let diffs = compute_differences(500_000, &prefs).unwrap();
        assert!(
            diffs.iter().any(|cd| cd.d == 422481 && cd.c == 217519),
            "the Frye difference must survive every filter"
        );

        let mut index = DifferenceIndex::for_keys(diffs.len());
        for cd in &diffs {
            index.insert(cd.key());
        }
        let sols = scan_pairwise_sums(500_000, &index, &diffs, &prefs, None);
        assert_eq!(sols.len(), 1);
        assert!(sols[0].verify());
        assert_eq!(
            sols[0].to_string(),
            "95800^4 + 217519^4 + 414560^4 = 422481^4"
        );
    }
}
