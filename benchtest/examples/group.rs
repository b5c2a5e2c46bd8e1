//! Measure a small group of units and print the table.
//!
//! Run with: cargo run -p benchtest --example group

use benchtest::prelude::*;
use benchtest::{BenchtestConfig, SpinnerProgress, init_tracing};
use std::collections::BTreeMap;

fn build_map(n: u64) -> BTreeMap<u64, u64> {
    (0..n).map(|i| (i, i * i)).collect()
}

fn main() -> anyhow::Result<()> {
    init_tracing(false);

    let config = BenchtestConfig::discover().unwrap_or_default();
    let spinner = SpinnerProgress::new();
    let mut cx = RunContext::from_config(&config)?.with_progress(spinner.clone());

    let mut group = Group::new("Collections");
    group
        .unit("btree 1k #", |_| {
            std::hint::black_box(build_map(1_000));
        })
        .unit("btree 10k #", |_| {
            std::hint::black_box(build_map(10_000));
        })
        .unit("vec sort 10k #", |_| {
            let mut v: Vec<u64> = (0..10_000u64).rev().collect();
            v.sort_unstable();
            std::hint::black_box(v);
        })
        .unit("fails sometimes #", |cycle| {
            if cycle.number() % 3 == 0 {
                return Err(OperationError::failed("every third cycle"));
            }
            std::hint::black_box(build_map(100));
            Ok(())
        })
        .unit("not measured", |_| ());

    let result = group.run(&mut cx);
    spinner.finish();
    result?;
    Ok(())
}
