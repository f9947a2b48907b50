use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maze::{full_grid, Carver, Point, Solver, SolverState};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn carve_and_solve(side: usize, seed: u64) -> SolverState {
    let mut maze = full_grid(side, side).unwrap();
    let origin = Point { col: 0, row: 0 };
    let goal = Point {
        col: side - 1,
        row: side - 1,
    };

    let mut carver = Carver::with_rng(&maze, origin, StdRng::seed_from_u64(seed)).unwrap();
    carver.finish(&mut maze);

    let solver = Solver::new(&maze, origin, goal).unwrap();
    solver.finish(&maze).unwrap().0
}

fn bench_side(c: &mut Criterion, side: usize) {
    c.bench_function(&format!("carve_solve_{}x{}", side, side), |b| {
        b.iter(|| {
            let state = carve_and_solve(black_box(side), 7);
            assert!(matches!(state, SolverState::PathFound(_)));
        })
    });
}

pub fn maze_small(c: &mut Criterion) {
    bench_side(c, 10);
}

pub fn maze_medium(c: &mut Criterion) {
    bench_side(c, 30);
}

pub fn maze_large(c: &mut Criterion) {
    bench_side(c, 80);
}

criterion_group!(benches, maze_small, maze_medium, maze_large);
criterion_main!(benches);
