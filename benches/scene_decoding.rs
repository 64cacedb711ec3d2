// SPDX-License-Identifier: MPL-2.0
use asset_lens::domain::asset::{classify, count_by_category, Asset};
use asset_lens::domain::format::DecoderKind;
use asset_lens::scene::decode;
use asset_lens::ui::viewer::dispatch::prepare_model;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fmt::Write;
use std::hint::black_box;

/// Binary STL with `count` identical facets.
fn binary_stl(count: u32) -> Vec<u8> {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&count.to_le_bytes());
    for _ in 0..count {
        let facet: [[f32; 3]; 4] = [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        for value in facet.iter().flatten() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&[0, 0]);
    }
    bytes
}

/// OBJ grid of `side * side` quads split into triangles.
fn obj_grid(side: u32) -> String {
    let mut source = String::new();
    for y in 0..=side {
        for x in 0..=side {
            let _ = writeln!(source, "v {x} {y} 0");
        }
    }
    let stride = side + 1;
    for y in 0..side {
        for x in 0..side {
            let a = y * stride + x + 1;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            let _ = writeln!(source, "f {a} {b} {d}");
            let _ = writeln!(source, "f {a} {d} {c}");
        }
    }
    source
}

fn decoding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_decoding");

    for count in [1_000u32, 50_000] {
        let stl = binary_stl(count);
        group.bench_with_input(BenchmarkId::new("stl_binary", count), &stl, |b, bytes| {
            b.iter(|| decode(DecoderKind::RawGeometry, black_box(bytes)));
        });
    }

    let obj = obj_grid(100);
    group.bench_function("obj_grid_100", |b| {
        b.iter(|| decode(DecoderKind::MeshOnly, black_box(obj.as_bytes())));
    });

    let stl = binary_stl(50_000);
    group.bench_function("prepare_stl_50000", |b| {
        b.iter(|| prepare_model(DecoderKind::RawGeometry, black_box(&stl)));
    });

    group.finish();
}

fn classify_benchmark(c: &mut Criterion) {
    let assets: Vec<Asset> = (0..10_000)
        .map(|i| {
            let category = match i % 4 {
                0 => "uploads/models",
                1 => "uploads/textures",
                2 => "animations",
                _ => "a/b/sounds",
            };
            Asset::new(i.to_string(), format!("asset{i}.glb"), category)
        })
        .collect();

    c.bench_function("classify_path", |b| {
        b.iter(|| classify(black_box("users/42/uploads/2024/textures")));
    });
    c.bench_function("count_by_category_10000", |b| {
        b.iter(|| count_by_category(black_box(&assets)));
    });
}

criterion_group!(benches, decoding_benchmark, classify_benchmark);
criterion_main!(benches);
