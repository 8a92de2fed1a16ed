//! Level update benchmarks.
//!
//! Measures one `Level::update` against the 16.67 ms frame budget as the
//! number of enemies (and therefore projectiles and narrow-phase pairs)
//! grows, plus the cost of hashing a snapshot.
//!
//! Run with: `cargo bench --bench level_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vesper_engine::prelude::*;

const DT: f64 = 1.0 / 60.0;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const KINDS: [EnemyKind; 5] = [
    EnemyKind::Archer,
    EnemyKind::Demon,
    EnemyKind::Minotaur,
    EnemyKind::Sorcerer,
    EnemyKind::Tower,
];

/// A walled arena with `enemies` enemies on a grid around the player. The
/// player cannot die, so the level keeps running for the whole benchmark.
fn arena(enemies: usize) -> Level {
    let mut layout = LevelLayout::new("bench", GameMode::TopDown, Vec2::new(512.0, 512.0))
        .with_static(StaticKind::Wall, 0.0, 0.0, 1024.0, 16.0)
        .with_static(StaticKind::Wall, 0.0, 1008.0, 1024.0, 16.0)
        .with_static(StaticKind::Wall, 0.0, 0.0, 16.0, 1024.0)
        .with_static(StaticKind::Wall, 1008.0, 0.0, 16.0, 1024.0);
    for i in 0..enemies {
        let x = 48.0 + (i % 16) as f64 * 60.0;
        let y = 48.0 + (i / 16) as f64 * 60.0;
        layout = layout.with_enemy(KINDS[i % KINDS.len()], x, y);
    }

    let mut config = EngineConfig {
        max_projectiles: 256,
        ..EngineConfig::default()
    };
    config.player.max_health = 1.0e12;

    let mut level = Level::new(layout, config).expect("bench layout is valid");
    level.load().expect("fresh level loads");
    level
}

fn intents(frame: u64) -> ControlIntents {
    let angle = frame as f64 * 0.05;
    ControlIntents::moving(Vec2::from_angle(angle)).with_fire()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_update_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_update");

    for &count in &[10usize, 50, 100, 200] {
        let mut level = arena(count);
        // Warm up so projectiles are in flight.
        for _ in 0..120 {
            let frame = level.frame();
            level.update(DT, &intents(frame));
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &_count| {
            b.iter(|| {
                let frame = level.frame();
                black_box(level.update(DT, &intents(frame)));
            });
        });
    }

    group.finish();
}

fn bench_state_hash(c: &mut Criterion) {
    let mut level = arena(100);
    for _ in 0..120 {
        let frame = level.frame();
        level.update(DT, &intents(frame));
    }
    c.bench_function("state_hash_100_enemies", |b| {
        b.iter(|| black_box(level.state_hash()));
    });
}

// ---------------------------------------------------------------------------
// Criterion groups and main
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_update_scaling, bench_state_hash);
criterion_main!(benches);
