use brunch::Bench;
use quarsieve::arith::{pow4_mod, sum2_pow4_mod};
use quarsieve::residues::good_pairs;
use quarsieve::valuation::bad_valuations;
use quarsieve::DifferenceIndex;

brunch::benches! {
    Bench::new("pow4_mod(4096)")
    .run_seeded(4096, pow4_mod),
    Bench::new("sum2_pow4_mod(841)")
    .run_seeded(841, sum2_pow4_mod),
    Bench::new("bad_valuations(1M)")
    .run_seeded(1_000_000, bad_valuations),
    Bench::new("good_pairs() mod 15000")
    .run(good_pairs),
    {
        let mut index = DifferenceIndex::for_keys(1 << 20);
        for k in 1..=1u64 << 20 {
            index.insert(k.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1);
        }
        Bench::new("index.contains (miss)")
        .run_seeded(12345u64, move |x| index.contains(x))
    },
}
