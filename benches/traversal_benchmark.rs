//! Traversal and path-search benchmarks using Criterion.
//!
//! Run with: cargo bench --bench traversal_benchmark
//! View results: open target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vireo::{Direction, Graph, TypeId, Vertex};

/// Helper: a directed chain v0 -> v1 -> ... of the given length.
fn chain_graph(length: usize) -> (Graph, TypeId, Vec<Vertex>) {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person").unwrap();
    let next = g.new_edge_type("next", true).unwrap();

    let vertices: Vec<Vertex> = (0..length).map(|_| g.new_vertex(person).unwrap()).collect();
    for pair in vertices.windows(2) {
        g.new_edge(next, pair[0], pair[1]).unwrap();
    }
    (g, next, vertices)
}

/// Helper: one hub connected out to `spokes` peers.
fn star_graph(spokes: usize, directed: bool) -> (Graph, TypeId, Vertex) {
    let mut g = Graph::new();
    let person = g.new_vertex_type("person").unwrap();
    let knows = g.new_edge_type("knows", directed).unwrap();

    let hub = g.new_vertex(person).unwrap();
    for _ in 0..spokes {
        let spoke = g.new_vertex(person).unwrap();
        g.new_edge(knows, hub, spoke).unwrap();
    }
    (g, knows, hub)
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbors");
    for spokes in [10, 100, 1_000] {
        let (g, knows, hub) = star_graph(spokes, true);
        group.bench_with_input(BenchmarkId::new("indexed", spokes), &spokes, |b, _| {
            b.iter(|| black_box(g.neighbors(hub, knows, Direction::Out).unwrap()))
        });

        let (g, knows, hub) = star_graph(spokes, false);
        group.bench_with_input(BenchmarkId::new("edge_scan", spokes), &spokes, |b, _| {
            b.iter(|| black_box(g.neighbors(hub, knows, Direction::Both).unwrap()))
        });
    }
    group.finish();
}

fn bench_degree(c: &mut Criterion) {
    let (g, knows, hub) = star_graph(1_000, true);
    c.bench_function("degree/indexed_1000", |b| {
        b.iter(|| black_box(g.degree(hub, knows, Direction::Both).unwrap()))
    });
}

fn bench_shortest_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_paths");
    for length in [10, 50, 200] {
        let (g, next, vertices) = chain_graph(length);
        let from = vertices[0];
        let to = *vertices.last().unwrap();
        group.bench_with_input(BenchmarkId::new("chain", length), &length, |b, &len| {
            b.iter(|| black_box(g.shortest_paths(from, to, next, len, false).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_neighbors, bench_degree, bench_shortest_paths);
criterion_main!(benches);
