//! Procedural mesh generation for artifact primitives.
//!
//! Builds indexed triangle geometry from registry primitives and converts it
//! into Bevy meshes: shaded triangle lists, edge line lists for wireframes, and
//! point lists for the ambient particle and star fields.

/// Parametric constructions for frusta, cuboids, sphere segments, torus knots
/// and subdivided polyhedra.
pub mod procedural;

pub use procedural::{Geometry, point_cloud_mesh};
