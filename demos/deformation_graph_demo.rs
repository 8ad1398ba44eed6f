//! Deformation graph demo for deformscope
//!
//! This demo walks through the visualizer lifecycle:
//! - Sampling a point cloud on a cylinder surface
//! - Building a deformation graph over a subset of its points
//! - Adding, updating and removing the renderables
//! - Reporting what the scene would draw

use std::f32::consts::TAU;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use deformscope_core::{
    ColoredPointCloud, DeformationGraph, Drawable, GraphMap, NodeId, Point, Point3f, Rgba, Vector3f,
};
use deformscope_visualization::{SceneNode, Visualizer, VisualizerConfig};
use tracing::info;

/// Build a deformable cylinder and push it through the visualizer
#[derive(Parser, Debug)]
#[command(name = "deformation_graph_demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the default visualizer settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Points sampled around each ring
    #[arg(long, default_value_t = 64)]
    ring_points: usize,

    /// Number of rings along the cylinder
    #[arg(long, default_value_t = 32)]
    rings: usize,

    /// Every n-th point of every n-th ring becomes a graph node
    #[arg(long, default_value_t = 8)]
    node_stride: usize,
}

fn sample_cylinder(ring_points: usize, rings: usize) -> ColoredPointCloud {
    let mut cloud = ColoredPointCloud::with_capacity(ring_points * rings);
    for ring in 0..rings {
        let z = ring as f32 * 0.5;
        for i in 0..ring_points {
            let theta = TAU * i as f32 / ring_points as f32;
            let normal = Vector3f::new(theta.cos(), theta.sin(), 0.0);
            let shade = (255.0 * ring as f32 / rings.max(1) as f32) as u8;
            cloud.push(Point::new(
                Point3f::new(5.0 * normal.x, 5.0 * normal.y, z),
                normal,
                Rgba::opaque(shade, 128, 255 - shade),
            ));
        }
    }
    cloud
}

/// Place graph nodes on a regular sub-grid and connect grid neighbors
fn build_graph(
    cloud: &mut ColoredPointCloud,
    ring_points: usize,
    rings: usize,
    stride: usize,
) -> anyhow::Result<()> {
    let stride = stride.max(1);
    let mut graph = DeformationGraph::new();
    let mut map = GraphMap::new();
    let mut grid: Vec<Vec<NodeId>> = Vec::new();

    for ring in (0..rings).step_by(stride) {
        let mut row = Vec::new();
        for i in (0..ring_points).step_by(stride) {
            let node = graph.add_node();
            map.insert(node, ring * ring_points + i);
            row.push(node);
        }
        grid.push(row);
    }

    for (r, row) in grid.iter().enumerate() {
        for (c, &node) in row.iter().enumerate() {
            // Close each ring once it has enough nodes to form a loop
            let next_in_ring = if row.len() > 2 {
                Some((c + 1) % row.len())
            } else {
                Some(c + 1).filter(|&n| n < row.len())
            };
            if let Some(n) = next_in_ring {
                graph.add_edge(node, row[n])?;
            }
            if let Some(next) = grid.get(r + 1) {
                graph.add_edge(node, next[c])?;
            }
        }
    }

    info!(nodes = graph.node_count(), edges = graph.edge_count(), "built deformation graph");
    cloud.set_deformation(graph, map);
    Ok(())
}

fn report(label: &str, visualizer: &Visualizer) {
    let root = visualizer.scene_root();
    let stats = root
        .children()
        .iter()
        .map(|child| child.stats())
        .fold((0, 0, 0), |acc, s| (acc.0 + s.vertices, acc.1 + s.spheres, acc.2 + s.cylinders));
    let (min, max) = root.bounding_box();
    info!(
        children = root.num_children(),
        vertices = stats.0,
        spheres = stats.1,
        cylinders = stats.2,
        "{label}: bounds {:?} .. {:?}",
        min.coords.as_slice(),
        max.coords.as_slice(),
    );
}

fn describe(node: &SceneNode) -> String {
    match node.as_group() {
        Some(group) => format!(
            "{} [{}]",
            group.name(),
            group
                .children()
                .iter()
                .map(|c| format!("{}: {}", c.name(), c.stats().geodes))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => node.name().to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            VisualizerConfig::from_toml_str(&text)?
        }
        None => VisualizerConfig::default(),
    };
    info!(?config, "visualizer settings");

    let mut cloud = sample_cylinder(args.ring_points, args.rings);
    build_graph(&mut cloud, args.ring_points, args.rings, args.node_stride)?;

    let mut visualizer = Visualizer::with_config(config);
    visualizer.close_light();
    visualizer.add_point_cloud(&cloud);
    let graph = visualizer.add_graph(&cloud)?;
    info!("graph renderable: {}", describe(&graph));
    report("initial", &visualizer);

    // Bend the cylinder and rebuild both renderables
    for point in cloud.iter_mut() {
        let bend = 0.02 * point.position.z * point.position.z;
        point.position.x += bend;
    }
    visualizer.update_point_cloud(&cloud);
    visualizer.update_graph(&cloud)?;
    report("bent", &visualizer);

    visualizer.remove_graph(&cloud);
    report("graph removed", &visualizer);

    visualizer.remove_point_cloud(&cloud);
    report("cloud removed", &visualizer);

    Ok(())
}
