//! Benchmarks for cube state edits and encoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cubepaint::facelets::FACELET_MAP;
use cubepaint::{encode, Color, CubeState, Face, Position};

/// A cube with one corner twisted in place.
fn twisted_corner() -> CubeState {
    let corner = Position::new(1, 1, 1).expect("valid corner");
    CubeState::initial()
        .with_facelet_set(corner, Face::PosY, Color::Red)
        .with_facelet_set(corner, Face::PosX, Color::Green)
        .with_facelet_set(corner, Face::PosZ, Color::White)
}

/// Benchmark encoding the solved cube.
fn bench_encode_solved(c: &mut Criterion) {
    let state = CubeState::initial();
    c.bench_function("encode_solved", |b| b.iter(|| encode(black_box(&state))));
}

/// Benchmark encoding a cube that fails validation late (at the color counts).
fn bench_encode_invalid(c: &mut Criterion) {
    let state = CubeState::initial().with_facelet_set(
        Position::new(-1, -1, -1).expect("valid corner"),
        Face::NegZ,
        Color::Red,
    );
    c.bench_function("encode_wrong_count", |b| {
        b.iter(|| encode(black_box(&state)))
    });
}

/// Benchmark painting every facelet once, copying the state each time.
fn bench_paint_all(c: &mut Criterion) {
    let state = twisted_corner();
    c.bench_function("paint_all_facelets", |b| {
        b.iter(|| {
            FACELET_MAP.iter().fold(state.clone(), |state, record| {
                state.with_facelet_set(record.position, record.face, Color::Blue)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_encode_solved,
    bench_encode_invalid,
    bench_paint_all
);
criterion_main!(benches);
