use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gallery_xr::catalog;
use gallery_xr::gallery::Gallery;
use gallery_xr::math::Ray;
use gallery_xr::nearest_hit;
use gallery_xr::sim::{controller_pose, RecordingScene, SimulatedRuntime};
use gallery_xr::{GalleryConfig, Registry, XrConfig, XrManager};
use glam::Vec3;
use std::f32::consts::TAU;

/// Benchmark: full per-frame pass with the bundled gallery and two controllers
fn bench_manager_update(c: &mut Criterion) {
    let mut manager = XrManager::new(XrConfig::default());
    let mut runtime = SimulatedRuntime::new(true);
    let mut scene = RecordingScene::default();
    manager.initialize(&mut runtime, &mut scene).unwrap();

    let artworks = catalog::bundled().unwrap();
    let _gallery = Gallery::mount(manager.registry(), GalleryConfig::default(), &artworks).unwrap();

    let eye = Vec3::new(0.0, 5.0, 0.0);
    runtime.connect(0, controller_pose(eye, 0.3, 0.0));
    runtime.connect(1, controller_pose(eye, 0.3 + TAU / 2.0, 0.0));

    let mut yaw = 0.0f32;
    c.bench_function("manager_update_16_panels", |b| {
        b.iter(|| {
            yaw = (yaw + 0.01) % TAU;
            runtime.set_pose(0, controller_pose(eye, yaw, 0.0));
            black_box(manager.update(&runtime, &mut scene).len())
        })
    });
}

/// Benchmark: nearest-hit search over growing candidate sets
fn bench_nearest_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_hit");

    for walls in [1usize, 4, 16] {
        let registry = Registry::new();
        let config = GalleryConfig {
            panels_per_wall: walls * 4,
            ..GalleryConfig::default()
        };
        let artworks: Vec<_> = catalog::bundled()
            .unwrap()
            .into_iter()
            .cycle()
            .take(walls * 16)
            .collect();
        let _gallery = Gallery::mount(&registry, config, &artworks).unwrap();
        let candidates = registry.list();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.2, 0.0, -1.0));

        group.bench_with_input(BenchmarkId::from_parameter(candidates.len()), &candidates, |b, candidates| {
            b.iter(|| black_box(nearest_hit(black_box(&ray), candidates, None)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_manager_update, bench_nearest_hit);
criterion_main!(benches);
