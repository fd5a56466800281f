// Copyright 2022,2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Sieve-accelerated search for nontrivial solutions of
//! a^4 + b^4 + c^4 = d^4 with 0 < a, b, c < d.
//!
//! The search runs in three sequential stages:
//! enumeration of candidate differences d^4 - c^4 surviving a cascade of
//! congruence filters ([`differences`]), construction of a compact membership
//! index over the compressed differences ([`index`]), and a data-parallel scan
//! of pairwise sums a^4 + b^4 against that index ([`scan`]).
//!
//! Bibliography:
//!
//! Morgan Ward, Euler's problem on sums of three fourth powers,
//! Duke Math. J. 15 (1948), 827-837
//!
//! Noam Elkies, On A^4 + B^4 + C^4 = D^4,
//! Math. Comp. 51 (1988), 825-835
//!
//! Roger Frye found the smallest solution 95800^4 + 217519^4 + 414560^4
//! = 422481^4 by exhaustive search on a Connection Machine.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod arith;
pub mod differences;
pub mod index;
pub mod params;
pub mod residues;
pub mod scan;
pub mod valuation;

pub use differences::{compute_differences, CandidateDifference};
pub use index::DifferenceIndex;
pub use scan::{scan_pairwise_sums, Solution};

/// In a primitive solution two of a, b, c are divisible by 5, forcing
/// d^4 = c^4 mod 5^4. Residue classes of (d, c) are sieved modulo M.
pub const Q: u32 = 625;
pub const M: u32 = 24 * Q;

/// Largest supported search bound: c and d are 32-bit side indices and the
/// valuation sieve covers [2, 2*D].
pub const MAX_BOUND: u32 = u32::MAX / 2;

/// The requested search bound exceeds [`MAX_BOUND`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BoundTooLarge(pub u32);

impl fmt::Display for BoundTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "search bound {} exceeds supported maximum {}",
            self.0, MAX_BOUND
        )
    }
}

impl std::error::Error for BoundTooLarge {}

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Verbosity {
    Silent,
    Info,
    Verbose,
    Debug,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Info
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silent" => Ok(Verbosity::Silent),
            "info" => Ok(Verbosity::Info),
            "verbose" => Ok(Verbosity::Verbose),
            "debug" => Ok(Verbosity::Debug),
            _ => Err(format!("invalid verbosity level {s}")),
        }
    }
}

/// Runtime preferences shared by the search stages.
#[derive(Clone, Default)]
pub struct Preferences {
    pub threads: Option<usize>,
    pub verbosity: Verbosity,
    /// Can be set from another thread to interrupt the search.
    pub abort_flag: Arc<AtomicBool>,
}

impl Preferences {
    pub fn verbose(&self, v: Verbosity) -> bool {
        self.verbosity >= v
    }

    pub fn abort(&self) -> bool {
        self.abort_flag.load(Ordering::Relaxed)
    }
}
