//! Surface-mesh ingestion for quadra
//!
//! Reads triangulated surface meshes from ASCII GMSH files and prepares
//! panel pairs for the integral cache: [`gmsh`] parses mesh files into
//! vertices and panels, [`pairs`] puts a panel pair's vertices into the
//! canonical order the cache keys require.

pub mod gmsh;
pub mod pairs;

pub use gmsh::SurfaceMesh;
pub use pairs::{canonical_pair, CanonicalPair};
