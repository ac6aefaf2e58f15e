use std::f32::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

/// Shape families known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Bust,
    Statue,
    Slab,
    Dome,
    Horse,
    Figure,
    Default,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        Self::Bust,
        Self::Statue,
        Self::Slab,
        Self::Dome,
        Self::Horse,
        Self::Figure,
        Self::Default,
    ];

    /// Match a catalog tag. Anything unrecognised maps to `Default`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bust" => Self::Bust,
            "statue" => Self::Statue,
            "slab" => Self::Slab,
            "dome" => Self::Dome,
            "horse" => Self::Horse,
            "figure" => Self::Figure,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bust => "bust",
            Self::Statue => "statue",
            Self::Slab => "slab",
            Self::Dome => "dome",
            Self::Horse => "horse",
            Self::Figure => "figure",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolyhedronKind {
    Octahedron,
    Icosahedron,
}

/// Parametric primitive with enough detail to build a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    /// Truncated cone; equal radii give a cylinder.
    Frustum {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
        open_ended: bool,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
    Cuboid {
        width: f32,
        height: f32,
        depth: f32,
    },
    /// Partial UV sphere; `theta` is measured from the +Y pole.
    SphereSegment {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        phi_start: f32,
        phi_length: f32,
        theta_start: f32,
        theta_length: f32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
    /// Platonic solid subdivided `detail` times and projected onto its circumsphere.
    Polyhedron {
        kind: PolyhedronKind,
        radius: f32,
        detail: u32,
    },
}

/// Constant geometry description for one shape family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    pub primitive: Primitive,
}

/// Stateless tag resolver.
pub struct ShapeRegistry;

impl ShapeRegistry {
    /// Resolve a shape tag. Total: unknown tags yield the default descriptor.
    pub fn resolve(tag: &str) -> ShapeDescriptor {
        Self::descriptor(ShapeKind::from_tag(tag))
    }

    pub fn descriptor(kind: ShapeKind) -> ShapeDescriptor {
        let primitive = match kind {
            // Tapered column reading as head and shoulders
            ShapeKind::Bust => Primitive::Frustum {
                radius_top: 0.5,
                radius_bottom: 0.75,
                height: 1.6,
                radial_segments: 14,
                height_segments: 5,
                open_ended: false,
            },
            // Tall and narrow
            ShapeKind::Statue => Primitive::Cone {
                radius: 0.58,
                height: 2.1,
                radial_segments: 9,
                height_segments: 5,
            },
            // Wide and flat
            ShapeKind::Slab => Primitive::Cuboid {
                width: 1.9,
                height: 1.25,
                depth: 0.14,
            },
            ShapeKind::Dome => Primitive::SphereSegment {
                radius: 0.95,
                width_segments: 20,
                height_segments: 10,
                phi_start: 0.0,
                phi_length: TAU,
                theta_start: 0.0,
                theta_length: FRAC_PI_2,
            },
            // Knotted, evokes a coiled animal form
            ShapeKind::Horse => Primitive::TorusKnot {
                radius: 0.55,
                tube: 0.18,
                tubular_segments: 80,
                radial_segments: 18,
                p: 2,
                q: 3,
            },
            ShapeKind::Figure => Primitive::Polyhedron {
                kind: PolyhedronKind::Octahedron,
                radius: 0.75,
                detail: 3,
            },
            ShapeKind::Default => Primitive::Polyhedron {
                kind: PolyhedronKind::Icosahedron,
                radius: 0.8,
                detail: 2,
            },
        };

        ShapeDescriptor { kind, primitive }
    }

    /// All seven registry entries.
    pub fn entries() -> [ShapeDescriptor; 7] {
        ShapeKind::ALL.map(Self::descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve_to_their_kind() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeRegistry::resolve(kind.as_str()).kind, kind);
        }
    }

    #[test]
    fn tag_matching_ignores_case_and_padding() {
        assert_eq!(ShapeRegistry::resolve("  Statue ").kind, ShapeKind::Statue);
    }

    #[test]
    fn unknown_tags_fall_back_to_default() {
        let default = ShapeRegistry::descriptor(ShapeKind::Default);
        for tag in ["", "mask", "unknown-tag", "bust-2", "🏺"] {
            assert_eq!(ShapeRegistry::resolve(tag), default);
        }
    }

    #[test]
    fn entries_are_pairwise_distinct() {
        let entries = ShapeRegistry::entries();
        for (i, a) in entries.iter().enumerate() {
            for b in entries.iter().skip(i + 1) {
                assert_ne!(a.primitive, b.primitive, "{:?} vs {:?}", a.kind, b.kind);
            }
        }
    }
}
