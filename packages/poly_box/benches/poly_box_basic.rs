//! Basic benchmarks for the `poly_box` crate.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use criterion::{Criterion, criterion_group, criterion_main};
use poly_box::{PolyBox, define_poly_base};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

define_poly_base!(trait ItemBase for dyn Item);

trait Item: ItemBase {
    fn value(&self) -> usize;
}

#[derive(Clone)]
struct Small(usize);

#[derive(Clone)]
struct Large([usize; 64]);

impl Item for Small {
    fn value(&self) -> usize {
        self.0
    }
}

impl Item for Large {
    fn value(&self) -> usize {
        self.0.iter().sum()
    }
}

const TEST_VALUE: usize = 1024;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly_box_basic");

    group.bench_function("clone_small", |b| {
        let handle = PolyBox::<dyn Item>::from_box(Box::new(Small(TEST_VALUE)));

        b.iter(|| black_box(handle.clone()));
    });

    group.bench_function("clone_large", |b| {
        let handle = PolyBox::<dyn Item>::from_box(Box::new(Large([TEST_VALUE; 64])));

        b.iter(|| black_box(handle.clone()));
    });

    group.bench_function("take_large", |b| {
        b.iter_custom(|iters| {
            let mut handles = iter::repeat_with(|| {
                PolyBox::<dyn Item>::from_box(Box::new(Large([TEST_VALUE; 64])))
            })
            .take(usize::try_from(iters).unwrap())
            .collect::<Vec<_>>();

            let start = Instant::now();

            for handle in &mut handles {
                drop(black_box(handle.take()));
            }

            start.elapsed()
        });
    });

    group.bench_function("downcast_ref", |b| {
        let handle = PolyBox::<dyn Item>::from_box(Box::new(Small(TEST_VALUE)));

        b.iter(|| black_box(black_box(&handle).downcast_ref::<Small>().map(Item::value)));
    });

    group.finish();
}
