//! Instancing demo
//!
//! Builds a small parking lot where every car shares one wheel model, gives a
//! single wheel its own transform through `uniquify_path`, then removes all
//! remaining sharing with a `Uniquifier` pass.
//!
//! Run with `RUST_LOG=debug cargo run --example instancing` to see the pass logs.

use anyhow::Result;
use glam::{Affine3A, Vec3};
use graft::prelude::*;
use graft::{Node, find_shared_nodes};

fn main() -> Result<()> {
    env_logger::init();

    let mut graph = SceneGraph::new();
    let wheel_mesh = graph.add_geometry(Geometry::new("wheel"));

    let lot = graph.create_group("ParkingLot");
    let wheel = graph.create_geode("Wheel");
    let mesh = graph.create_drawable("WheelMesh", wheel_mesh);
    graph.add_child(wheel, mesh)?;

    let mut cars = Vec::new();
    for i in 0..3 {
        let offset = Affine3A::from_translation(Vec3::new(i as f32 * 4.0, 0.0, 0.0));
        let car = graph.add_node(Node::group(&format!("Car{i}")).with_transform(offset));
        graph.add_child(lot, car)?;
        graph.add_child(car, wheel)?;
        cars.push(car);
    }
    log::info!(
        "{} nodes, shared: {:?}",
        graph.len(),
        find_shared_nodes(&graph, lot, TraversalMode::AllChildren)?
    );

    // Flatten the tyre of the middle car only.
    let path = NodePath::from(vec![lot, cars[1], wheel]);
    let path = uniquify_path(&mut graph, &path)?;
    if let Some(flat) = path.last().and_then(|h| graph.get_node_mut(h)) {
        flat.transform = Affine3A::from_scale(Vec3::new(1.0, 0.6, 1.0));
        flat.name = "FlatWheel".to_string();
    }
    log::info!("flat wheel world matrix: {:?}", path.local_to_world(&graph));

    // The original middle car is detached now; release it.
    if let Some(&old_car) = cars.get(1)
        && graph.parents(old_car)?.is_empty()
    {
        let released = graph.release(old_car)?;
        log::info!("released {released} detached node(s)");
    }

    let report = Uniquifier::default().run(&mut graph, lot)?;
    log::info!(
        "pass: {} visited, {} shared, {} copies; {} nodes, {} geometries",
        report.visited,
        report.shared,
        report.copies,
        graph.len(),
        graph.geometry_count()
    );

    Ok(())
}
