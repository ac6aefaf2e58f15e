use std::time::Duration;

use bevy::prelude::*;
use constants::palette::{
    AMBIENT_WARM, GOLD, HOLOGRAM_BLUE, HOLOGRAM_CYAN, KEY_WARM, OVERLAY_BRONZE, RIM_COOL,
    STAR_WHITE,
};
use constants::render_settings::{
    ARTIFACT_BOB_AMPLITUDE, ARTIFACT_BOB_FREQUENCY, ARTIFACT_ROTATION_RATE, CAMERA_FOV_DEGREES,
    COMPACT_CAMERA_DISTANCE, COMPACT_PARTICLE_COUNT, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE,
    OVERLAY_OPACITY, PARTICLE_OPACITY, PARTICLE_ORBIT_RATE, PARTICLE_SIZE, PARTICLE_SPREAD,
    SCANLINE_HEIGHT, SCANLINE_HEIGHT_SEGMENTS, SCANLINE_OPACITY, SCANLINE_RADIAL_SEGMENTS,
    SCANLINE_RADIUS, STAR_COUNT, STAR_DEPTH, STAR_RADIUS, STAR_SIZE_FACTOR,
    VIEWER_CAMERA_DISTANCE, VIEWER_PARTICLE_COUNT,
};
use serde::{Deserialize, Serialize};

use crate::engine::shapes::{Primitive, ShapeDescriptor, ShapeKind};
use crate::engine::viewer::lifecycle::ViewMode;
use crate::settings::EngineSettings;

/// Where a scene is shown: inline thumbnail or the full viewer modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneContext {
    Compact,
    #[default]
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Shaded artifact surface.
    Fill,
    /// Faint edges drawn over the fill.
    WireOverlay,
    /// Edges only, no surface.
    WireOnly,
    /// Static hologram enclosure.
    ScanLines,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceStyle {
    /// Lit metallic/rough surface.
    Standard { metalness: f32, roughness: f32 },
    /// Unlit flat colour.
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialSpec {
    /// sRGB hex colour, `0xRRGGBB`.
    pub color: u32,
    pub style: SurfaceStyle,
    pub wireframe: bool,
    pub opacity: f32,
    pub side: FaceSide,
}

impl MaterialSpec {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeshLayer {
    pub role: LayerRole,
    pub primitive: Primitive,
    pub material: MaterialSpec,
    /// Receives the artifact pose every frame.
    pub follows_artifact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Directional,
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightSpec {
    pub kind: LightKind,
    pub color: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightRig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub key: LightSpec,
    pub rim: LightSpec,
    pub accent: LightSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleFieldSpec {
    pub count: usize,
    /// Edge length of the cube particles are scattered in.
    pub spread: f32,
    pub size: f32,
    pub opacity: f32,
    pub color: u32,
    /// Radians per second about Y.
    pub rotation_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarFieldSpec {
    pub count: usize,
    pub radius: f32,
    pub depth: f32,
    pub size_factor: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    pub pan_enabled: bool,
}

impl OrbitBounds {
    pub fn clamp(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraSpec {
    /// Distance along +Z from the origin.
    pub distance: f32,
    pub fov_degrees: f32,
    /// `None` when the view is not interactive.
    pub controls: Option<OrbitBounds>,
}

/// Rigid motion applied to every artifact-bound layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Pose {
    pub rotation_y: f32,
    pub translation_y: f32,
}

impl Pose {
    pub fn to_transform(self) -> Transform {
        Transform::from_xyz(0.0, self.translation_y, 0.0)
            .with_rotation(Quat::from_rotation_y(self.rotation_y))
    }
}

/// Everything needed to draw one artifact in one view mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableScene {
    pub shape: ShapeKind,
    pub view_mode: ViewMode,
    pub context: SceneContext,
    pub layers: Vec<MeshLayer>,
    pub lights: LightRig,
    pub particles: ParticleFieldSpec,
    pub stars: Option<StarFieldSpec>,
    pub camera: CameraSpec,
    pub artifact_pose: Pose,
    pub particle_rotation: f32,
}

impl RenderableScene {
    pub fn layer(&self, role: LayerRole) -> Option<&MeshLayer> {
        self.layers.iter().find(|l| l.role == role)
    }

    pub fn has_layer(&self, role: LayerRole) -> bool {
        self.layer(role).is_some()
    }
}

/// Pure scene builder. Holds only the configurable decoration counts.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct SceneComposer {
    pub viewer_particle_count: usize,
    pub compact_particle_count: usize,
    pub star_count: usize,
}

impl Default for SceneComposer {
    fn default() -> Self {
        Self {
            viewer_particle_count: VIEWER_PARTICLE_COUNT,
            compact_particle_count: COMPACT_PARTICLE_COUNT,
            star_count: STAR_COUNT,
        }
    }
}

impl SceneComposer {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            viewer_particle_count: settings.viewer_particle_count,
            compact_particle_count: settings.compact_particle_count,
            star_count: settings.star_count,
        }
    }

    pub fn compose(
        &self,
        descriptor: &ShapeDescriptor,
        view_mode: ViewMode,
        elapsed: Duration,
        context: SceneContext,
    ) -> RenderableScene {
        let layers = match view_mode {
            ViewMode::Wireframe => vec![wire_only_layer(descriptor.primitive)],
            ViewMode::Solid => vec![
                fill_layer(descriptor.primitive),
                overlay_layer(descriptor.primitive),
            ],
            ViewMode::Hologram => vec![
                fill_layer(descriptor.primitive),
                overlay_layer(descriptor.primitive),
                scan_line_layer(),
            ],
        };

        let particles = ParticleFieldSpec {
            count: match context {
                SceneContext::Viewer => self.viewer_particle_count,
                SceneContext::Compact => self.compact_particle_count,
            },
            spread: PARTICLE_SPREAD,
            size: PARTICLE_SIZE,
            opacity: PARTICLE_OPACITY,
            color: GOLD,
            rotation_rate: PARTICLE_ORBIT_RATE,
        };

        let stars = (context == SceneContext::Viewer).then_some(StarFieldSpec {
            count: self.star_count,
            radius: STAR_RADIUS,
            depth: STAR_DEPTH,
            size_factor: STAR_SIZE_FACTOR,
            color: STAR_WHITE,
        });

        RenderableScene {
            shape: descriptor.kind,
            view_mode,
            context,
            layers,
            lights: light_rig(view_mode),
            particles,
            stars,
            camera: camera_spec(context),
            artifact_pose: artifact_pose(elapsed),
            particle_rotation: particle_rotation(elapsed),
        }
    }
}

/// Slow spin plus a gentle vertical bob.
pub fn artifact_pose(elapsed: Duration) -> Pose {
    let t = elapsed.as_secs_f32();
    Pose {
        rotation_y: ARTIFACT_ROTATION_RATE * t,
        translation_y: (ARTIFACT_BOB_FREQUENCY * t).sin() * ARTIFACT_BOB_AMPLITUDE,
    }
}

pub fn particle_rotation(elapsed: Duration) -> f32 {
    PARTICLE_ORBIT_RATE * elapsed.as_secs_f32()
}

pub fn camera_spec(context: SceneContext) -> CameraSpec {
    match context {
        SceneContext::Viewer => CameraSpec {
            distance: VIEWER_CAMERA_DISTANCE,
            fov_degrees: CAMERA_FOV_DEGREES,
            controls: Some(OrbitBounds {
                min_distance: ORBIT_MIN_DISTANCE,
                max_distance: ORBIT_MAX_DISTANCE,
                pan_enabled: false,
            }),
        },
        SceneContext::Compact => CameraSpec {
            distance: COMPACT_CAMERA_DISTANCE,
            fov_degrees: CAMERA_FOV_DEGREES,
            controls: None,
        },
    }
}

/// Convert a `0xRRGGBB` value into a Bevy colour.
pub fn hex_color(hex: u32) -> Color {
    Color::srgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

fn light_rig(view_mode: ViewMode) -> LightRig {
    let hologram = view_mode == ViewMode::Hologram;

    LightRig {
        ambient_color: AMBIENT_WARM,
        ambient_intensity: if hologram { 0.1 } else { 0.28 },
        key: LightSpec {
            kind: LightKind::Directional,
            color: if hologram { HOLOGRAM_CYAN } else { KEY_WARM },
            intensity: if hologram { 1.2 } else { 0.75 },
            position: [5.0, 5.0, 5.0],
        },
        rim: LightSpec {
            kind: LightKind::Directional,
            color: if hologram { HOLOGRAM_BLUE } else { RIM_COOL },
            intensity: 0.45,
            position: [-5.0, -2.0, -5.0],
        },
        accent: LightSpec {
            kind: LightKind::Point,
            color: GOLD,
            intensity: 0.3,
            position: [0.0, 3.0, 0.0],
        },
    }
}

fn fill_layer(primitive: Primitive) -> MeshLayer {
    MeshLayer {
        role: LayerRole::Fill,
        primitive,
        material: MaterialSpec {
            color: GOLD,
            style: SurfaceStyle::Standard {
                metalness: 0.65,
                roughness: 0.35,
            },
            wireframe: false,
            opacity: 1.0,
            side: FaceSide::Front,
        },
        follows_artifact: true,
    }
}

fn overlay_layer(primitive: Primitive) -> MeshLayer {
    MeshLayer {
        role: LayerRole::WireOverlay,
        primitive,
        material: MaterialSpec {
            color: OVERLAY_BRONZE,
            style: SurfaceStyle::Basic,
            wireframe: true,
            opacity: OVERLAY_OPACITY,
            side: FaceSide::Front,
        },
        follows_artifact: true,
    }
}

fn wire_only_layer(primitive: Primitive) -> MeshLayer {
    MeshLayer {
        role: LayerRole::WireOnly,
        primitive,
        material: MaterialSpec {
            color: GOLD,
            style: SurfaceStyle::Basic,
            wireframe: true,
            opacity: 1.0,
            side: FaceSide::Front,
        },
        follows_artifact: true,
    }
}

fn scan_line_layer() -> MeshLayer {
    MeshLayer {
        role: LayerRole::ScanLines,
        primitive: Primitive::Frustum {
            radius_top: SCANLINE_RADIUS,
            radius_bottom: SCANLINE_RADIUS,
            height: SCANLINE_HEIGHT,
            radial_segments: SCANLINE_RADIAL_SEGMENTS,
            height_segments: SCANLINE_HEIGHT_SEGMENTS,
            open_ended: true,
        },
        material: MaterialSpec {
            color: HOLOGRAM_CYAN,
            style: SurfaceStyle::Basic,
            wireframe: true,
            opacity: SCANLINE_OPACITY,
            side: FaceSide::Back,
        },
        follows_artifact: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::shapes::ShapeRegistry;

    fn compose(mode: ViewMode, context: SceneContext) -> RenderableScene {
        SceneComposer::default().compose(
            &ShapeRegistry::resolve("bust"),
            mode,
            Duration::ZERO,
            context,
        )
    }

    #[test]
    fn solid_has_fill_and_faint_overlay() {
        let scene = compose(ViewMode::Solid, SceneContext::Viewer);

        let roles: Vec<_> = scene.layers.iter().map(|l| l.role).collect();
        assert_eq!(roles, [LayerRole::Fill, LayerRole::WireOverlay]);

        let overlay = scene.layer(LayerRole::WireOverlay).unwrap();
        assert_eq!(overlay.material.opacity, 0.25);
        assert!(overlay.material.wireframe);
        assert_eq!(scene.lights.ambient_intensity, 0.28);
        assert_eq!(scene.lights.key.color, KEY_WARM);
    }

    #[test]
    fn wireframe_is_a_single_edge_layer() {
        let scene = compose(ViewMode::Wireframe, SceneContext::Viewer);

        assert_eq!(scene.layers.len(), 1);
        assert_eq!(scene.layers[0].role, LayerRole::WireOnly);
        assert_eq!(scene.layers[0].material.color, GOLD);
        assert!(!scene.has_layer(LayerRole::Fill));
        assert!(!scene.has_layer(LayerRole::ScanLines));
    }

    #[test]
    fn hologram_dims_ambient_and_adds_static_scan_lines() {
        let scene = compose(ViewMode::Hologram, SceneContext::Viewer);

        assert_eq!(scene.lights.ambient_intensity, 0.1);
        assert_eq!(scene.lights.key.color, HOLOGRAM_CYAN);
        assert_eq!(scene.lights.key.intensity, 1.2);
        assert_eq!(scene.lights.rim.color, HOLOGRAM_BLUE);

        let scan = scene.layer(LayerRole::ScanLines).unwrap();
        assert!(!scan.follows_artifact);
        assert_eq!(scan.material.side, FaceSide::Back);
        assert_eq!(scan.material.opacity, 0.04);
        assert!(matches!(
            scan.primitive,
            Primitive::Frustum {
                open_ended: true,
                ..
            }
        ));
    }

    #[test]
    fn compact_context_is_smaller_and_static() {
        let compact = compose(ViewMode::Solid, SceneContext::Compact);
        let viewer = compose(ViewMode::Solid, SceneContext::Viewer);

        assert_eq!(compact.particles.count, 80);
        assert_eq!(viewer.particles.count, 200);
        assert!(compact.stars.is_none());
        assert_eq!(viewer.stars.map(|s| s.count), Some(400));
        assert!(compact.camera.controls.is_none());
        assert_eq!(compact.camera.distance, 2.8);
        assert_eq!(viewer.camera.distance, 3.2);
    }

    #[test]
    fn viewer_orbit_is_bounded_without_pan() {
        let controls = camera_spec(SceneContext::Viewer).controls.unwrap();
        assert!(!controls.pan_enabled);
        assert_eq!(controls.clamp(0.2), 1.5);
        assert_eq!(controls.clamp(20.0), 6.0);
        assert_eq!(controls.clamp(3.0), 3.0);
    }

    #[test]
    fn artifact_bound_layers_share_one_pose() {
        let elapsed = Duration::from_millis(2750);
        let scene = SceneComposer::default().compose(
            &ShapeRegistry::resolve("horse"),
            ViewMode::Hologram,
            elapsed,
            SceneContext::Viewer,
        );
        let pose = artifact_pose(elapsed);

        assert_eq!(scene.artifact_pose, pose);
        assert!((pose.rotation_y - 0.35 * 2.75).abs() < 1e-6);
        assert!((pose.translation_y - (0.7_f32 * 2.75).sin() * 0.06).abs() < 1e-6);
        assert!((scene.particle_rotation - 0.04 * 2.75).abs() < 1e-6);
    }

    #[test]
    fn unknown_shape_composes_with_default_geometry() {
        let scene = SceneComposer::default().compose(
            &ShapeRegistry::resolve("unknown-tag"),
            ViewMode::Solid,
            Duration::ZERO,
            SceneContext::Viewer,
        );
        assert_eq!(scene.shape, ShapeKind::Default);
        assert!(!scene.layers.is_empty());
    }

    #[test]
    fn hex_colors_decode_channels() {
        let color = hex_color(0xc9a84c).to_srgba();
        assert!((color.red - 0xc9 as f32 / 255.0).abs() < 1e-6);
        assert!((color.green - 0xa8 as f32 / 255.0).abs() < 1e-6);
        assert!((color.blue - 0x4c as f32 / 255.0).abs() < 1e-6);
    }
}
