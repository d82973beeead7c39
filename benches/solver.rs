//! Benchmarks for the snake cube solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use snake_cube::grid::{format_solution, Symmetry};
use snake_cube::{ChainSpec, Puzzle, SolveOptions};

fn classic() -> Puzzle {
    Puzzle::from_preset("classic").unwrap()
}

/// Benchmark the complete classic 3x3x3 search from the reduced seeds.
fn bench_solve(c: &mut Criterion) {
    let puzzle = classic();
    let seeds = puzzle.default_seeds();
    let sequential = SolveOptions::default();
    let parallel = SolveOptions {
        parallel: true,
        ..SolveOptions::default()
    };

    let mut group = c.benchmark_group("classic");
    group.bench_function("solve", |b| {
        b.iter(|| puzzle.solve(black_box(&seeds), &sequential))
    });
    group.bench_function("solve_parallel", |b| {
        b.iter(|| puzzle.solve(black_box(&seeds), &parallel))
    });
    group.finish();
}

/// Benchmark the exhaustive two-cube search from every seed.
fn bench_solve_two_cube(c: &mut Criterion) {
    let puzzle = Puzzle::new(ChainSpec::new(vec![2; 7]).unwrap(), 2).unwrap();
    let seeds = snake_cube::seeds::all(2);

    c.bench_function("two_cube_all_seeds", |b| {
        b.iter(|| puzzle.solve(black_box(&seeds), &SolveOptions::default()))
    });
}

/// Benchmark computing the canonical key for a solution.
fn bench_canonical_key(c: &mut Criterion) {
    let puzzle = classic();
    let report = puzzle
        .solve(&puzzle.default_seeds(), &SolveOptions::default())
        .unwrap();
    let solution = &report.solutions[0];
    let symmetry = Symmetry::new(puzzle.side());

    c.bench_function("canonical_key_with_reflection", |b| {
        b.iter(|| symmetry.canonical_key(black_box(solution)))
    });
}

/// Benchmark formatting a solution for display.
fn bench_format_solution(c: &mut Criterion) {
    let puzzle = classic();
    let report = puzzle
        .solve(&puzzle.default_seeds(), &SolveOptions::default())
        .unwrap();
    let solution = &report.solutions[0];

    c.bench_function("format_solution", |b| {
        b.iter(|| format_solution(black_box(solution), puzzle.side()))
    });
}

criterion_group!(
    benches,
    bench_solve,
    bench_solve_two_cube,
    bench_canonical_key,
    bench_format_solution
);
criterion_main!(benches);
