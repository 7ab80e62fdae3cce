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

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dugout_bnb::{
    bnb::BnbSolver,
    monitor::no_op::NoOperationMonitor,
    relaxation::RelaxationBounder,
};
use dugout_model::{
    config::SquadConfig,
    model::{Model, ModelBuilder},
    player::{Player, Position, Price},
};
use fixedbitset::FixedBitSet;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

const TEAMS: [&str; 20] = [
    "ARS", "AVL", "BOU", "BRE", "BHA", "CHE", "CRY", "EVE", "FUL", "IPS", "LEI", "LIV", "MCI",
    "MUN", "NEW", "NFO", "SOU", "TOT", "WHU", "WOL",
];

/// A pool with the usual position mix, prices in 4.0..=13.0 and points
/// loosely correlated with price.
fn random_model(num_players: usize, seed: u64) -> Model {
    let mut rng = StdRng::seed_from_u64(seed);
    let players = (0..num_players).map(|i| {
        let position = match i % 10 {
            0 => Position::Goalkeeper,
            1..=3 => Position::Defender,
            4..=7 => Position::Midfielder,
            _ => Position::Forward,
        };
        let price = rng.random_range(40..=130);
        let points = price as f64 / 10.0 * rng.random_range(0.6..1.4);
        Player::new(
            i as u32 + 1,
            TEAMS[rng.random_range(0..TEAMS.len())],
            position,
            Price::from_tenths(price),
            (points * 10.0).round() / 10.0,
        )
    });
    let mut builder = ModelBuilder::new(SquadConfig::default());
    builder.add_players(players);
    builder.build().expect("benchmark pool is valid")
}

fn bench_root_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("root_relaxation");
    for &n in &[100usize, 300, 600] {
        let model = random_model(n, 7);
        let empty = FixedBitSet::with_capacity(model.num_variables());
        let mut bounder = RelaxationBounder::default();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| {
                black_box(bounder.solve(
                    model.objective(),
                    model.constraints(),
                    &empty,
                    &empty,
                ))
            })
        });
    }
    group.finish();
}

fn bench_full_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_solve");
    group.sample_size(10);
    for &n in &[60usize, 120, 200] {
        let model = random_model(n, 11);
        let solver = BnbSolver::new();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| black_box(solver.solve(model, NoOperationMonitor::new())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_root_relaxation, bench_full_solve);
criterion_main!(benches);
