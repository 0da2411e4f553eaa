// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use cargo_alloc_model::prelude::*;
use cargo_alloc_solver::prelude::*;
use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;

/// Hub network: `spokes` direct sectors into a hub plus every two-sector
/// connection between distinct spokes, up to `connections`.
fn build_registry(spokes: usize, connections: usize, seed: u64) -> PathRegistry {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = PathRegistryBuilder::new();

    for i in 0..spokes {
        b.add_direct(DirectRecord::new(
            format!("S{i}-HUB"),
            rng.random_range(1.0..12.0),
            rng.random_range(20.0..120.0),
            rng.random_range(50.0..200.0),
        ));
    }

    let mut added = 0;
    'outer: for i in 0..spokes {
        for j in 0..spokes {
            if i == j {
                continue;
            }
            if added == connections {
                break 'outer;
            }
            let first = IndirectLegFields::new(format!("S{i}-HUB"));
            let mut second = IndirectLegFields::new(format!("HUB-S{j}"))
                .with_capacity(rng.random_range(40.0..160.0));
            if rng.random_bool(0.3) {
                second = second.with_master_cap(rng.random_range(20.0..80.0));
            }
            b.add_indirect(IndirectRecord::new(
                format!("S{i}-S{j}"),
                rng.random_range(0.5..9.0),
                rng.random_range(5.0..60.0),
                [first, second],
            ));
            added += 1;
        }
    }

    b.build()
}

fn bench_model_assembly(c: &mut Criterion) {
    let registry = build_registry(40, 600, 11);
    let assembler = ConstraintAssembler::default();

    c.bench_function("derive_and_assemble_40x600", |b| {
        b.iter(|| {
            let snapshot = CapacityDeriver::new().derive(black_box(&registry));
            let model = assembler.assemble(&registry, &snapshot);
            black_box(model.num_constraints())
        })
    });
}

fn bench_post_processing(c: &mut Criterion) {
    let registry = build_registry(40, 600, 11);
    let snapshot = CapacityDeriver::new().derive(&registry);
    let model = ConstraintAssembler::default().assemble(&registry, &snapshot);
    let solution = GoodLpSolver::new().solve(&model).expect("benchmark network is feasible");
    let post = AllocationPostProcessor::default();

    c.bench_function("post_process_40x600", |b| {
        b.iter(|| {
            let report = post.process(&registry, &snapshot, black_box(&solution));
            black_box(report.leg_details.len())
        })
    });
}

criterion_group!(benches, bench_model_assembly, bench_post_processing);
criterion_main!(benches);
