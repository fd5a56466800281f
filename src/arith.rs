// Copyright 2022,2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Modular arithmetic building blocks for the quartic search.
//!
//! All moduli passed to the table builders are small prime powers
//! (at most 15000), so m*m fits comfortably in 64 bits.

use bitvec_simd::BitVec;

/// The exact fourth power of x as a 128-bit integer.
/// This does not overflow for x < 2^32.
#[inline]
pub fn pow4(x: u64) -> u128 {
    let sq = (x as u128) * (x as u128);
    sq * sq
}

/// Table of x^4 mod m for x in [0, m).
pub fn pow4_mod(m: u32) -> Vec<u32> {
    let m = m as u64;
    (0..m)
        .map(|x| {
            let sq = (x * x) % m;
            ((sq * sq) % m) as u32
        })
        .collect()
}

/// Bit s is set iff some i^4 + j^4 is congruent to s modulo m.
///
/// For most prime powers the image is a proper subset of [0, m),
/// which is what makes the residue filters effective.
pub fn sum2_pow4_mod(m: u32) -> BitVec {
    let pow4 = pow4_mod(m);
    let mut sums = BitVec::zeros(m as usize);
    for &pi in &pow4 {
        for &pj in &pow4 {
            let mut s = pi + pj;
            if s >= m {
                s -= m;
            }
            sums.set(s as usize, true);
        }
    }
    sums
}

/// A divider for 31-bit integers via Barrett reduction.
/// It uses a 32-bit mantissa.
#[derive(Clone, Copy, Debug)]
pub struct Divider31 {
    pub p: u32,
    m31: u32,
    s31: u32,
}

impl Divider31 {
    // Compute m and s such that x/p = (x*m) >> s.
    //
    // https://gmplib.org/~tege/divcnst-pldi94.pdf
    pub const fn new(p: u32) -> Self {
        let m64 = (1u64 << 63) / p as u64;
        let sz = 64 - u64::leading_zeros(m64);
        let m31 = (m64 >> (sz - 32)) as u32 + 1; // 32 bits
        let s31 = 63 + 32 - sz; // m31 >> s31 = m63 >> 63
        Divider31 { p, m31, s31 }
    }

    #[inline]
    pub fn modu31(&self, n: u32) -> u32 {
        let nm = (n as u64) * (self.m31 as u64);
        let q = (nm >> self.s31) as u32;
        n - q * self.p
    }
}
