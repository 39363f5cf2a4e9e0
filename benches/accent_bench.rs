//! Benchmarks for accent-picker

use accent_picker::prelude::*;
use accent_picker::sample::{stratified_sample, SampleConfig};
use accent_picker::weight::build_weight_map;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn generate_test_image(width: usize, height: usize) -> Vec<Rgb> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            // Create a pattern with distinct regions
            let r = ((x * 255) / width) as u8;
            let g = ((y * 255) / height) as u8;
            let b = (((x + y) * 128) / (width + height)) as u8;
            pixels.push(Rgb::new(r, g, b));
        }
    }
    pixels
}

fn bench_weight_and_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight_and_sampling");

    for size in [128, 256, 512].iter() {
        let pixels = generate_test_image(*size, *size);
        let hsvs: Vec<Hsv> = pixels.iter().map(|p| p.to_hsv()).collect();

        group.bench_with_input(BenchmarkId::new("weight_map", size), size, |b, &size| {
            b.iter(|| build_weight_map(black_box(&pixels), black_box(&hsvs), size, size))
        });

        let map = build_weight_map(&pixels, &hsvs, *size, *size);
        group.bench_with_input(BenchmarkId::new("stratified_sample", size), size, |b, _| {
            b.iter(|| {
                let mut rng = StdRng::seed_from_u64(42);
                stratified_sample(
                    black_box(&pixels),
                    black_box(&hsvs),
                    black_box(&map),
                    &SampleConfig::default(),
                    &mut rng,
                )
            })
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(10);

    for size in [128, 256, 512].iter() {
        let pixels = generate_test_image(*size, *size);
        let config = AccentConfig {
            seed: Some(42),
            ..Default::default()
        };

        group.bench_with_input(BenchmarkId::new("pick_accent", size), size, |b, &size| {
            b.iter(|| pick_accent(black_box(&pixels), size, size, black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_weight_and_sampling, bench_full_pipeline);
criterion_main!(benches);
