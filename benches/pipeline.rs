//! Benchmarks for the sprite pipeline.

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

use sprites::cache::uniqueness_hash;
use sprites::render::composite;
use sprites::{Image, Layout, LayoutEngine, SpriteOptions};

fn placeholder_images(count: usize) -> Vec<Image> {
    (0..count)
        .map(|i| {
            let mut image = Image::load(
                &PathBuf::from(format!("/nonexistent/sprite-{}.png", i)),
                format!("icons/sprite-{}.png", i),
            )
            .unwrap();
            image.width = 8 + (i % 5) as u32 * 4;
            image.height = 8 + (i % 3) as u32 * 8;
            image
        })
        .collect()
}

// -- Layout benchmarks --

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    let small = placeholder_images(12);
    let large = placeholder_images(500);

    for layout in [Layout::Vertical, Layout::Horizontal, Layout::Diagonal] {
        let engine = LayoutEngine::new(layout, 2);
        group.bench_function(format!("arrange_{}_small", layout.keyword()), |b| {
            b.iter(|| engine.arrange(black_box(&small)))
        });
        group.bench_function(format!("arrange_{}_large", layout.keyword()), |b| {
            b.iter(|| engine.arrange(black_box(&large)))
        });
    }

    group.finish();
}

// -- Hashing benchmarks --

fn bench_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashing");

    let images = placeholder_images(100);
    let options = SpriteOptions::new()
        .with("layout", "vertical")
        .with("spacing", 2u32)
        .with("icons_sprite_3_position", "50%");

    group.bench_function("uniqueness_hash_100", |b| {
        b.iter(|| uniqueness_hash(Layout::Vertical, black_box(&images), black_box(&options)))
    });

    group.finish();
}

// -- Compositing benchmarks --

fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");

    let dir = tempfile::tempdir().unwrap();
    let images: Vec<Image> = (0..16)
        .map(|i| {
            let path = dir.path().join(format!("tile-{}.png", i));
            RgbaImage::from_pixel(16, 16, Rgba([i as u8 * 16, 0, 0, 255]))
                .save(&path)
                .unwrap();
            Image::load(&path, format!("tiles/tile-{}.png", i)).unwrap()
        })
        .collect();
    let arrangement = LayoutEngine::new(Layout::Vertical, 0).arrange(&images);

    group.bench_function("composite_16_tiles", |b| {
        b.iter(|| composite(black_box(&images), black_box(&arrangement)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_layout, bench_hashing, bench_composite);
criterion_main!(benches);
