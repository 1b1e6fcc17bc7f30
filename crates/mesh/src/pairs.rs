//! Canonical vertex ordering for panel pairs
//!
//! Cache keys are built from vertex coordinates in a fixed order, so two
//! panel pairs with the same relative geometry must present their vertices
//! identically. The canonical order puts vertices the panels share first
//! (pairwise aligned between the two panels) and breaks every remaining tie
//! by lexicographic coordinate comparison, which makes the result depend
//! only on the geometry and not on how the mesh happened to number or
//! rotate each triangle.

use crate::gmsh::SurfaceMesh;
use quadra_core::{Panel, Vec3};

/// A panel pair with canonically ordered corner coordinates, ready to be
/// handed to the integral cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalPair {
    pub panel_a: [Vec3; 3],
    pub panel_b: [Vec3; 3],
    /// Number of vertices the two panels have in common
    pub shared_vertices: usize,
}

/// Order an ordered pair of panels canonically.
pub fn canonical_pair(mesh: &SurfaceMesh, a: &Panel, b: &Panel) -> CanonicalPair {
    let lex = |lhs: &Vec3, rhs: &Vec3| lhs.partial_cmp(rhs).unwrap_or(std::cmp::Ordering::Equal);

    // Vertices shared by index, ordered lexicographically by coordinate so
    // the pairing does not depend on either panel's internal rotation.
    let mut shared: Vec<(usize, usize)> = Vec::new();
    for (i, &via) in a.vertex_indices.iter().enumerate() {
        for (j, &vib) in b.vertex_indices.iter().enumerate() {
            if via == vib {
                shared.push((i, j));
            }
        }
    }
    shared.sort_by(|x, y| {
        lex(
            &mesh.vertices[a.vertex_indices[x.0]],
            &mesh.vertices[a.vertex_indices[y.0]],
        )
    });

    let order_for = |panel: &Panel, shared_positions: Vec<usize>| -> [Vec3; 3] {
        let mut rest: Vec<usize> = (0..3).filter(|p| !shared_positions.contains(p)).collect();
        rest.sort_by(|&x, &y| {
            lex(
                &mesh.vertices[panel.vertex_indices[x]],
                &mesh.vertices[panel.vertex_indices[y]],
            )
        });
        let mut corners = [[0.0; 3]; 3];
        for (slot, position) in corners
            .iter_mut()
            .zip(shared_positions.iter().chain(rest.iter()))
        {
            *slot = mesh.vertices[panel.vertex_indices[*position]];
        }
        corners
    };

    let shared_vertices = shared.len();
    let panel_a = order_for(a, shared.iter().map(|&(i, _)| i).collect());
    let panel_b = order_for(b, shared.iter().map(|&(_, j)| j).collect());

    CanonicalPair {
        panel_a,
        panel_b,
        shared_vertices,
    }
}
