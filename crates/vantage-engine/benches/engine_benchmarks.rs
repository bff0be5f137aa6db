use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::Vec3;
use vantage_config::Config;
use vantage_engine::PhysicsEngine;

fn scene(count: usize) -> (Vec<Vec3>, Vec<f32>) {
    let positions = (0..count)
        .map(|i| {
            let a = i as f32 * 0.61;
            let r = 4.0 + (i % 97) as f32;
            Vec3::new(a.cos() * r, (i % 7) as f32, a.sin() * r)
        })
        .collect();
    let radii = (0..count).map(|i| 0.5 + (i % 4) as f32 * 0.5).collect();
    (positions, radii)
}

fn bench_full_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_frame");
    for count in [100, 1_000, 10_000] {
        let (positions, radii) = scene(count);
        let mut engine = PhysicsEngine::new(Config::default());
        engine.initialize(Vec3::new(0.0, 3.0, 40.0), Vec3::ZERO);
        let mut frame = 0u32;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |bencher, _| {
            bencher.iter(|| {
                frame = frame.wrapping_add(1);
                let t = frame as f32 / 60.0;
                let desired = Vec3::new(t.cos() * 30.0, 3.0, t.sin() * 30.0);
                black_box(engine.update(1.0 / 60.0, desired, &positions, &radii))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_frame);
criterion_main!(benches);
