//! Mesh ingestion feeding the panel-pair cache
//!
//! Two translated copies of the same plate produce panel pairs with
//! identical relative geometry, so the second plate should be served
//! almost entirely from cache.

use quadra_cache::{PanelPairCache, PanelPairRecord};
use quadra_core::Vec3;
use quadra_mesh::{canonical_pair, SurfaceMesh};
use std::io::Cursor;
use std::path::Path;

fn plate_document(z: f64) -> String {
    format!(
        "$Nodes\n4\n1 0 0 {z}\n2 1 0 {z}\n3 0 1 {z}\n4 1 1 {z}\n$EndNodes\n\
         $Elements\n2\n1 2 2 0 1 1 2 3\n2 2 2 0 1 2 4 3\n$EndElements\n"
    )
}

fn integrate(a: &[Vec3; 3], b: &[Vec3; 3], _ncv: usize) -> PanelPairRecord {
    let mut record = PanelPairRecord::zeroed();
    record.x_minus_xp_rm3 = [
        b[0][0] - a[0][0],
        b[0][1] - a[0][1],
        b[0][2] - a[0][2],
    ];
    record
}

fn process_plate(mesh: &SurfaceMesh, cache: &PanelPairCache) {
    for a in &mesh.panels {
        for b in &mesh.panels {
            let pair = canonical_pair(mesh, a, b);
            cache.get_or_compute(&pair.panel_a, &pair.panel_b, pair.shared_vertices, integrate);
        }
    }
}

#[test]
fn translated_plate_reuses_every_pair() {
    let first = SurfaceMesh::from_reader(Cursor::new(plate_document(0.0)), Path::new("p0.msh"))
        .expect("plate should parse");
    let second = SurfaceMesh::from_reader(Cursor::new(plate_document(2.0)), Path::new("p2.msh"))
        .expect("plate should parse");

    let cache = PanelPairCache::new();
    process_plate(&first, &cache);
    let after_first = cache.stats();
    assert_eq!(after_first.hits + after_first.misses, 4);

    process_plate(&second, &cache);
    let after_second = cache.stats();

    // The translation is exactly representable, so every pair of the second
    // plate reproduces a fingerprint from the first byte for byte.
    assert_eq!(after_second.misses, after_first.misses);
    assert_eq!(after_second.hits, after_first.hits + 4);
    assert_eq!(cache.len(), after_first.misses as usize);
}
