//! Uniquifier pass benchmarks.
//!
//! Builds an instanced scene (many parents sharing one model subtree) and
//! measures a full pass, a pass over a wide fan-in (one model under many
//! parents), plus a re-run over the already unique result.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use graft::{Geometry, NodeHandle, SceneGraph, Uniquifier};
use std::hint::black_box;

/// `instances` groups under the root, each listing one shared model with
/// `parts` geodes of one drawable each.
fn instanced_scene(instances: usize, parts: usize) -> (SceneGraph, NodeHandle) {
    let mut graph = SceneGraph::new();
    let root = graph.create_group("root");
    let model = graph.create_group("model");

    for i in 0..parts {
        let key = graph.add_geometry(Geometry::new(&format!("part{i}")));
        let geode = graph.create_geode(&format!("part{i}"));
        let leaf = graph.create_drawable(&format!("part{i}_mesh"), key);
        graph.add_child(geode, leaf).unwrap();
        graph.add_child(model, geode).unwrap();
    }
    for i in 0..instances {
        let instance = graph.create_group(&format!("instance{i}"));
        graph.add_child(root, instance).unwrap();
        graph.add_child(instance, model).unwrap();
    }
    (graph, root)
}

fn bench_uniquify(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniquifier");

    group.bench_function("pass_256x16", |b| {
        b.iter_batched(
            || instanced_scene(256, 16),
            |(mut graph, root)| {
                let report = Uniquifier::default().run(&mut graph, root).unwrap();
                black_box(report)
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("pass_fan_in_16384", |b| {
        b.iter_batched(
            || instanced_scene(16_384, 1),
            |(mut graph, root)| {
                let report = Uniquifier::default().run(&mut graph, root).unwrap();
                black_box(report)
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("rerun_256x16", |b| {
        let (mut graph, root) = instanced_scene(256, 16);
        let mut uniquifier = Uniquifier::default();
        uniquifier.run(&mut graph, root).unwrap();
        b.iter(|| black_box(uniquifier.run(&mut graph, root).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_uniquify);
criterion_main!(benches);
