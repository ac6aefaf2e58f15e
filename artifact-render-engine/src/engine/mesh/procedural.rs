use std::collections::{BTreeSet, HashMap};
use std::f32::consts::{PI, TAU};

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::engine::shapes::{PolyhedronKind, Primitive};

/// Indexed triangle geometry generated from a [`Primitive`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn from_primitive(primitive: &Primitive) -> Self {
        match *primitive {
            Primitive::Frustum {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
            } => frustum(
                radius_top,
                radius_bottom,
                height,
                radial_segments,
                height_segments,
                open_ended,
            ),
            Primitive::Cone {
                radius,
                height,
                radial_segments,
                height_segments,
            } => frustum(0.0, radius, height, radial_segments, height_segments, false),
            Primitive::Cuboid {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
            Primitive::SphereSegment {
                radius,
                width_segments,
                height_segments,
                phi_start,
                phi_length,
                theta_start,
                theta_length,
            } => sphere_segment(
                radius,
                width_segments,
                height_segments,
                phi_start,
                phi_length,
                theta_start,
                theta_length,
            ),
            Primitive::TorusKnot {
                radius,
                tube,
                tubular_segments,
                radial_segments,
                p,
                q,
            } => torus_knot(radius, tube, tubular_segments, radial_segments, p, q),
            Primitive::Polyhedron {
                kind,
                radius,
                detail,
            } => polyhedron(kind, radius, detail),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique undirected triangle edges, i.e. what a wireframe draws.
    pub fn edges(&self) -> Vec<[u32; 2]> {
        let mut edges = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if a != b {
                    edges.insert([a.min(b), a.max(b)]);
                }
            }
        }
        edges.into_iter().collect()
    }

    /// Axis-aligned size of the geometry.
    pub fn extents(&self) -> Vec3 {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            let p = Vec3::from(*p);
            min = min.min(p);
            max = max.max(p);
        }
        if self.positions.is_empty() {
            Vec3::ZERO
        } else {
            max - min
        }
    }

    /// Shaded triangle mesh.
    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone());
        mesh.insert_indices(Indices::U32(self.indices.clone()));
        mesh
    }

    /// Edge-only line mesh. Avoids relying on polygon-mode line support, which
    /// WebGPU does not offer.
    pub fn to_wireframe_mesh(&self) -> Mesh {
        let indices: Vec<u32> = self.edges().into_iter().flatten().collect();

        let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions.clone());
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.normalize_or_zero().to_array());
        index
    }
}

/// Unlit point sprite mesh for particle and star fields.
pub fn point_cloud_mesh(points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh
}

fn frustum(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
    open_ended: bool,
) -> Geometry {
    let radial = radial_segments.max(3);
    let rows = height_segments.max(1);
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    let mut geometry = Geometry::default();

    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial {
            let (sin, cos) = (x as f32 / radial as f32 * TAU).sin_cos();
            geometry.push_vertex(
                Vec3::new(radius * sin, -v * height + half_height, radius * cos),
                Vec3::new(sin, slope, cos),
            );
        }
    }

    let stride = radial + 1;
    for x in 0..radial {
        for y in 0..rows {
            let a = y * stride + x;
            let b = (y + 1) * stride + x;
            let c = (y + 1) * stride + x + 1;
            let d = y * stride + x + 1;
            geometry.indices.extend([a, b, d, b, c, d]);
        }
    }

    if !open_ended {
        if radius_top > 0.0 {
            push_cap(&mut geometry, radius_top, half_height, radial, true);
        }
        if radius_bottom > 0.0 {
            push_cap(&mut geometry, radius_bottom, -half_height, radial, false);
        }
    }

    geometry
}

fn push_cap(geometry: &mut Geometry, radius: f32, y: f32, radial: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = geometry.push_vertex(Vec3::new(0.0, y, 0.0), normal);

    let first = center + 1;
    for x in 0..=radial {
        let (sin, cos) = (x as f32 / radial as f32 * TAU).sin_cos();
        geometry.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
    }

    for x in 0..radial {
        let (i, j) = (first + x, first + x + 1);
        if top {
            geometry.indices.extend([center, i, j]);
        } else {
            geometry.indices.extend([center, j, i]);
        }
    }
}

fn cuboid(width: f32, height: f32, depth: f32) -> Geometry {
    let half = Vec3::new(width, height, depth) / 2.0;
    // (normal, u, v) with u × v = normal so corner order stays counter-clockwise
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut geometry = Geometry::default();
    for (normal, u, v) in faces {
        let base = geometry.positions.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            geometry.push_vertex((normal + u * su + v * sv) * half, normal);
        }
        geometry
            .indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    geometry
}

fn sphere_segment(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    phi_start: f32,
    phi_length: f32,
    theta_start: f32,
    theta_length: f32,
) -> Geometry {
    let columns = width_segments.max(3);
    let rows = height_segments.max(2);
    let theta_end = (theta_start + theta_length).min(PI);

    let mut geometry = Geometry::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(rows as usize + 1);

    for iy in 0..=rows {
        let theta = theta_start + iy as f32 / rows as f32 * theta_length;
        let mut row = Vec::with_capacity(columns as usize + 1);
        for ix in 0..=columns {
            let phi = phi_start + ix as f32 / columns as f32 * phi_length;
            let position = Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            row.push(geometry.push_vertex(position, position));
        }
        grid.push(row);
    }

    for iy in 0..rows as usize {
        for ix in 0..columns as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // Skip the degenerate triangles that collapse onto a pole
            if iy != 0 || theta_start > 0.0 {
                geometry.indices.extend([a, b, d]);
            }
            if iy != rows as usize - 1 || theta_end < PI {
                geometry.indices.extend([b, c, d]);
            }
        }
    }

    geometry
}

fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Geometry {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);

    let mut geometry = Geometry::default();

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = knot_curve(u, p, q, radius);
        let p2 = knot_curve(u + 0.01, p, q, radius);

        // Frenet-like frame around the curve
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1);
        let normal = binormal.cross(tangent).normalize_or_zero();
        let binormal = binormal.normalize_or_zero();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let vertex = p1 + normal * cx + binormal * cy;
            geometry.push_vertex(vertex, vertex - p1);
        }
    }

    let stride = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            geometry.indices.extend([a, b, d, b, c, d]);
        }
    }

    geometry
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let (su, cu) = u.sin_cos();
    let qu = q / p * u;
    let cs = qu.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu.sin() * 0.5,
    )
}

fn polyhedron(kind: PolyhedronKind, radius: f32, detail: u32) -> Geometry {
    let (vertices, faces) = match kind {
        PolyhedronKind::Octahedron => (OCTAHEDRON_VERTICES.to_vec(), OCTAHEDRON_FACES.to_vec()),
        PolyhedronKind::Icosahedron => {
            let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
            let vertices = vec![
                [-1.0, t, 0.0],
                [1.0, t, 0.0],
                [-1.0, -t, 0.0],
                [1.0, -t, 0.0],
                [0.0, -1.0, t],
                [0.0, 1.0, t],
                [0.0, -1.0, -t],
                [0.0, 1.0, -t],
                [t, 0.0, -1.0],
                [t, 0.0, 1.0],
                [-t, 0.0, -1.0],
                [-t, 0.0, 1.0],
            ];
            (vertices, ICOSAHEDRON_FACES.to_vec())
        }
    };

    let cols = detail as usize + 1;
    let mut geometry = Geometry::default();
    let mut welded: HashMap<[i32; 3], u32> = HashMap::new();

    for face in faces {
        let a = Vec3::from(vertices[face[0]]);
        let b = Vec3::from(vertices[face[1]]);
        let c = Vec3::from(vertices[face[2]]);

        // Triangular lattice over the face, row i shrinking towards c
        let mut lattice: Vec<Vec<Vec3>> = Vec::with_capacity(cols + 1);
        for i in 0..=cols {
            let aj = a.lerp(c, i as f32 / cols as f32);
            let bj = b.lerp(c, i as f32 / cols as f32);
            let rows = cols - i;
            let row = (0..=rows)
                .map(|j| {
                    if rows == 0 {
                        aj
                    } else {
                        aj.lerp(bj, j as f32 / rows as f32)
                    }
                })
                .collect();
            lattice.push(row);
        }

        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                let corners = if j % 2 == 0 {
                    [lattice[i][k + 1], lattice[i + 1][k], lattice[i][k]]
                } else {
                    [lattice[i][k + 1], lattice[i + 1][k + 1], lattice[i + 1][k]]
                };
                for corner in corners {
                    let projected = corner.normalize() * radius;
                    let key = (projected * 1.0e4).round().as_ivec3().to_array();
                    let index = match welded.get(&key) {
                        Some(index) => *index,
                        None => {
                            let index = geometry.push_vertex(projected, projected);
                            welded.insert(key, index);
                            index
                        }
                    };
                    geometry.indices.push(index);
                }
            }
        }
    }

    geometry
}

const OCTAHEDRON_VERTICES: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [0, 4, 3],
    [0, 3, 5],
    [0, 5, 2],
    [1, 2, 5],
    [1, 5, 3],
    [1, 3, 4],
    [1, 4, 2],
];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];
