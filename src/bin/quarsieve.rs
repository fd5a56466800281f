//! Search driver for a^4 + b^4 + c^4 = d^4.
//!
//! Runs the three stages in order: candidate differences, index
//! construction, pairwise-sum scan. Progress and timing go to stdout,
//! diagnostics to stderr.

use std::str::FromStr;
use std::time::Instant;

use quarsieve::{
    compute_differences, scan_pairwise_sums, DifferenceIndex, Preferences, Verbosity, MAX_BOUND,
};

/// Covers the smallest solution d = 422481 with a comfortable margin.
const DEFAULT_BOUND: u32 = 500_000;

fn main() {
    let arg = arguments::parse(std::env::args()).unwrap();
    if arg.get::<bool>("help").is_some() {
        eprintln!("Usage: quarsieve [OPTIONS]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --help                    show this help");
        eprintln!("  --bound D:                search d up to D (default {DEFAULT_BOUND})");
        eprintln!("  --threads N:              enable up to N computation threads");
        eprintln!("  --verbose silent|info|verbose|debug");
        return;
    }
    let bound = arg.get::<u32>("bound").unwrap_or(DEFAULT_BOUND);
    let threads = arg.get::<usize>("threads");
    let v = arg.get::<String>("verbose").unwrap_or("info".into());
    if bound > MAX_BOUND {
        panic!("Search bound {bound} exceeds supported maximum {MAX_BOUND}");
    }
    let mut prefs = Preferences::default();
    prefs.threads = threads;
    prefs.verbosity = Verbosity::from_str(&v).unwrap();

    // Scan on all logical cores unless --threads says otherwise
    // (rayon also honours RAYON_NUM_THREADS).
    let tpool: Option<rayon::ThreadPool> = match prefs.threads {
        Some(1) => None,
        t => {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(t) = t {
                if prefs.verbose(Verbosity::Verbose) {
                    eprintln!("Using a pool of {t} threads");
                }
                builder = builder.num_threads(t);
            }
            Some(builder.build().expect("cannot create thread pool"))
        }
    };

    println!("Searching up to D = {bound}");
    let mut watch = Stopwatch::new();

    let differences = match compute_differences(bound, &prefs) {
        Ok(d) => d,
        Err(e) => panic!("{e}"),
    };
    watch.log_task("Compute differences");

    let mut index = DifferenceIndex::for_keys(differences.len());
    for cd in &differences {
        index.insert(cd.key());
    }
    watch.log_task("Populate filter and hash map");

    let solutions = scan_pairwise_sums(bound, &index, &differences, &prefs, tpool.as_ref());
    watch.log_task("Check pairwise sums");

    for sol in &solutions {
        println!();
        println!("Solution found: {sol}");
    }
}

/// Per-stage and cumulative wall-clock reporting.
struct Stopwatch {
    start: Instant,
    last: Instant,
}

impl Stopwatch {
    fn new() -> Self {
        let now = Instant::now();
        Stopwatch {
            start: now,
            last: now,
        }
    }

    fn log_task(&mut self, task: &str) {
        let now = Instant::now();
        println!();
        println!("=== {task} ===");
        println!("Time: {:.3}s", (now - self.last).as_secs_f64());
        println!("Total: {:.3}s", (now - self.start).as_secs_f64());
        self.last = now;
    }
}
