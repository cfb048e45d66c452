//! Example: Generate a Voronoi diagram
//!
//! Demonstrates the basic usage of the generation pipeline.
//! Run with `RUST_LOG=rust_voronoi_plane=debug` to see sweep statistics.

use rust_voronoi_plane::generation::jittered_grid_sites;
use rust_voronoi_plane::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Voronoi Diagram Generation Example");
    println!("==================================\n");

    let config = DiagramConfigBuilder::new()
        .bounds(0.0, 200.0, 0.0, 100.0)
        .unwrap()
        .ray_extent_factor(3.0)
        .unwrap()
        .seed(42)
        .build()
        .unwrap();
    let bounds = config.bounds.unwrap();

    println!("Configuration:");
    println!(
        "  Bounds: x [{}, {}], y [{}, {}]",
        bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    );
    println!("  Ray Extent: {:.1}", config.resolve_ray_extent(&bounds));
    println!("  Duplicate Policy: {:?}", config.duplicate_policy);
    println!();

    // A jittered grid keeps cells evenly sized
    let sites = jittered_grid_sites(20, 10, &bounds, 0.4, 7);
    println!("Generating diagram for {} sites...", sites.len());
    let diagram = VoronoiDiagram::generate(&sites, config).expect("Failed to generate diagram");
    println!(
        "Generated {} cells, {} edges, {} vertices\n",
        diagram.cell_count(),
        diagram.edge_count(),
        diagram.vertex_count()
    );

    let total_neighbors: usize = (0..diagram.cell_count())
        .map(|id| diagram.cell_neighbors(id).len())
        .sum();
    let avg_neighbors = total_neighbors as f64 / diagram.cell_count() as f64;
    let total_length: f64 = diagram.edges().iter().map(|e| e.length()).sum();

    println!("Statistics:");
    println!("  Average neighbors per cell: {:.2}", avg_neighbors);
    println!("  Total edge length: {:.2}", total_length);
    println!();

    println!("Sample cells:");
    for cell in diagram.cells().iter().take(5) {
        let site = cell.site;
        println!(
            "  Cell {}: site=({:.2}, {:.2}), half-edges={}, neighbors={:?}",
            cell.id(),
            site.x,
            site.y,
            cell.half_edge_count(),
            diagram.cell_neighbors(cell.id())
        );
    }

    let ring = diagram.find_cells_within_hops(105, 2);
    println!("\nCells within 2 hops of cell 105: {}", ring.len());

    println!("\nGeneration complete!");
}
