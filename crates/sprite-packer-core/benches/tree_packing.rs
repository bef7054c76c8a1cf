use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sprite_packer_core::prelude::*;

fn generate_items(count: usize, min_size: u32, max_size: u32) -> Vec<LayoutItem> {
    use rand::{Rng, SeedableRng, rngs::StdRng};
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            LayoutItem::new(format!("sprite_{}", i), w, h)
        })
        .collect()
}

fn bench_single_container(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_single_container");

    for count in [50, 200, 800] {
        let items = generate_items(count, 8, 48);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("AreaAsc", count), &items, |b, items| {
            b.iter(|| {
                let pack = pack_container(2048, items.clone(), &SortOrder::AreaAsc);
                black_box(pack)
            });
        });
        group.bench_with_input(BenchmarkId::new("AreaDesc", count), &items, |b, items| {
            b.iter(|| {
                let pack = pack_container(2048, items.clone(), &SortOrder::AreaDesc);
                black_box(pack)
            });
        });
    }

    group.finish();
}

fn bench_group_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_group_loop");

    for size in [ContainerSize::S256, ContainerSize::S1024] {
        let items = generate_items(500, 4, 96);
        let cfg = PackerConfig::builder()
            .container_size(size)
            .max_containers(200)
            .build();
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("pack_layout", size.pixels()),
            &items,
            |b, items| {
                b.iter(|| black_box(pack_layout("Bench", items.clone(), &cfg)));
            },
        );
    }

    group.finish();
}

fn bench_raw_inserts(c: &mut Criterion) {
    c.bench_function("tree_insert_uniform_16", |b| {
        b.iter(|| {
            let mut packer = TreePacker::new(1024);
            while packer.insert(16, 16).is_some() {}
            black_box(packer.node_count())
        });
    });
}

criterion_group!(
    benches,
    bench_single_container,
    bench_group_loop,
    bench_raw_inserts
);
criterion_main!(benches);
