//! Example: Point location
//!
//! Builds a diagram over random sites and looks up the cell under a few
//! query points with the KD-tree index.

use rust_voronoi_plane::generation::random_sites;
use rust_voronoi_plane::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let bounds = BoundingBox::new(-50.0, 50.0, -50.0, 50.0).unwrap();
    let config = DiagramConfigBuilder::new()
        .bounding_box(bounds)
        .unwrap()
        .build()
        .unwrap();

    let sites = random_sites(1000, &bounds, 1234);
    let diagram = VoronoiDiagram::generate(&sites, config).expect("Failed to generate diagram");
    println!("Built diagram with {} cells\n", diagram.cell_count());

    let queries = [
        DVec2::new(0.0, 0.0),
        DVec2::new(-49.0, 49.0),
        DVec2::new(25.5, -10.25),
        DVec2::new(80.0, 0.0),
    ];

    for query in queries {
        match diagram.find_cell_at(query) {
            Some(id) => {
                let site = diagram.sites()[id];
                println!(
                    "  ({:>6.2}, {:>6.2}) -> cell {:>4} at ({:.2}, {:.2}), {} neighbors",
                    query.x,
                    query.y,
                    id,
                    site.x,
                    site.y,
                    diagram.cell_neighbors(id).len()
                );
            }
            None => println!("  ({:.2}, {:.2}) -> no cell", query.x, query.y),
        }
    }
}
