// Copyright 2022,2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Residue classes of (d, c) compatible with a^4 + b^4 + c^4 = d^4.
//!
//! In a primitive solution, classical congruence analysis modulo small
//! prime powers pins down the residues of d and c rather tightly:
//! d = 1 mod 8 and c mod 8 lies in {0, 1, 7} (Ward), d is prime to 5 and
//! two of a, b, c are divisible by 5, whence d^4 = c^4 mod 5^4.
//! Sieving pairs (d mod M, c mod M) with M = 24 * 625 keeps about 0.02%
//! of the M^2 grid; candidates (d, c) are later lifted from these classes.
//!
//! Bibliography:
//!
//! Morgan Ward, Euler's problem on sums of three fourth powers,
//! Duke Math. J. 15 (1948), 827-837

use bitvec_simd::BitVec;

use crate::arith::{pow4_mod, sum2_pow4_mod, Divider31};
use crate::{M, Q};

/// Ordered pairs (i, j) in [0, M)^2 such that d = i, c = j (mod M)
/// is possible in a primitive solution.
pub fn good_pairs() -> Vec<(u32, u32)> {
    let pow4_q = pow4_mod(Q);
    let mut pairs = vec![];
    // d = 1 mod 8 in any primitive solution.
    for i in (1..M).step_by(8) {
        // d^4 = c^4 mod 5^4 forces d prime to 5.
        if i % 5 == 0 {
            continue;
        }
        for j in 0..M {
            if pow4_q[(i % Q) as usize] != pow4_q[(j % Q) as usize] {
                continue;
            }
            // c mod 8 is 0, 1 or 7.
            if !matches!(j % 8, 0 | 1 | 7) {
                continue;
            }
            // 3 | d and 3 | c would force 3 | a and 3 | b as well.
            if i % 3 == 0 && j % 3 == 0 {
                continue;
            }
            pairs.push((i, j));
        }
    }
    pairs
}

/// Residue filter for one modulus: rejects (d, c) unless d^4 - c^4 mod m
/// is a sum of two fourth powers mod m.
#[derive(Clone)]
pub struct QuarticFilter {
    div: Divider31,
    pow4: Vec<u32>,
    sums: BitVec,
}

impl QuarticFilter {
    pub fn new(m: u32) -> Self {
        QuarticFilter {
            div: Divider31::new(m),
            pow4: pow4_mod(m),
            sums: sum2_pow4_mod(m),
        }
    }

    #[inline]
    pub fn admits(&self, d: u32, c: u32) -> bool {
        let pd = self.pow4[self.div.modu31(d) as usize];
        let pc = self.pow4[self.div.modu31(c) as usize];
        let delta = if pd >= pc { pd - pc } else { pd + self.div.p - pc };
        self.sums.get_unchecked(delta as usize)
    }
}
