//! Realise composed scenes as entities.

use bevy::prelude::*;
use bevy::render::render_resource::Face;
use constants::render_settings::{
    AMBIENT_BRIGHTNESS_PER_UNIT, DIRECTIONAL_LUX_PER_UNIT, POINT_LUMENS_PER_UNIT,
};

use super::animation::{animate_artifact, orbit_particles};
use super::composer::{
    FaceSide, LayerRole, LightKind, LightSpec, MaterialSpec, RenderableScene, SceneComposer,
    SceneContext, SurfaceStyle, hex_color,
};
use super::particles::{scatter_particles, scatter_stars};
use crate::engine::camera::ViewportCamera;
use crate::engine::core::plugin::EngineSet;
use crate::engine::mesh::{Geometry, point_cloud_mesh};
use crate::engine::shapes::ShapeRegistry;
use crate::engine::store::ArtifactStore;
use crate::engine::viewer::lifecycle::{SceneKey, ViewerLifecycle};
use crate::engine::viewer::systems::viewer_is_ready;

/// Parent of every entity belonging to the current artifact scene.
#[derive(Component, Debug)]
pub struct ArtifactSceneRoot {
    pub key: SceneKey,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneLayer(pub LayerRole);

/// Follows the artifact pose each frame.
#[derive(Component)]
pub struct ArtifactMotion;

#[derive(Component)]
pub struct ParticleOrbit;

#[derive(Component)]
pub struct StarField;

#[derive(Component)]
pub struct SceneLight;

/// Which scene is currently spawned.
#[derive(Resource, Debug, Default)]
pub struct ActiveScene {
    pub key: Option<SceneKey>,
    pub root: Option<Entity>,
    /// World ambient light from before the first scene, restored on close.
    /// The inner `None` means no ambient resource existed.
    saved_ambient: Option<Option<AmbientLight>>,
}

/// Spawns, rebuilds and animates the artifact scene. Requires mesh and
/// material asset storage, so headless hosts without rendering leave it out.
pub struct ArtifactScenePlugin;

impl Plugin for ArtifactScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveScene>()
            .add_systems(
                Update,
                rebuild_scene_system
                    .in_set(EngineSet::Scene)
                    .run_if(resource_exists::<ArtifactStore>),
            )
            .add_systems(
                Update,
                (animate_artifact, orbit_particles)
                    .in_set(EngineSet::Animation)
                    .run_if(viewer_is_ready),
            );
    }
}

/// Rebuild the scene whenever the lifecycle's scene key changes.
///
/// Leaving Ready despawns everything; entering Ready or switching view mode
/// composes and spawns a fresh scene.
pub fn rebuild_scene_system(
    mut commands: Commands,
    mut active: ResMut<ActiveScene>,
    lifecycle: Res<ViewerLifecycle>,
    store: Res<ArtifactStore>,
    composer: Res<SceneComposer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewport: Option<ResMut<ViewportCamera>>,
    ambient: Option<Res<AmbientLight>>,
) {
    let key = lifecycle.scene_key();
    if key == active.key {
        return;
    }

    if let Some(root) = active.root.take() {
        commands.entity(root).despawn();
    }
    active.key = key;

    let Some(key) = key else {
        match active.saved_ambient.take() {
            Some(Some(previous)) => commands.insert_resource(previous),
            Some(None) => commands.remove_resource::<AmbientLight>(),
            None => {}
        }
        return;
    };

    let Some(artifact) = store.catalog().get(key.artifact_id) else {
        warn!("Scene requested for missing artifact {}", key.artifact_id);
        return;
    };

    let descriptor = ShapeRegistry::resolve(&artifact.shape);
    let scene = composer.compose(
        &descriptor,
        key.view_mode,
        lifecycle.elapsed().unwrap_or_default(),
        SceneContext::Viewer,
    );
    let seed = lifecycle.session_seed().unwrap_or_default();

    let root = spawn_scene(&mut commands, &scene, seed, &mut meshes, &mut materials);
    commands.entity(root).insert(ArtifactSceneRoot { key });
    active.root = Some(root);

    if active.saved_ambient.is_none() {
        active.saved_ambient = Some(ambient.map(|a| (*a).clone()));
    }
    commands.insert_resource(AmbientLight {
        color: hex_color(scene.lights.ambient_color),
        brightness: scene.lights.ambient_intensity * AMBIENT_BRIGHTNESS_PER_UNIT,
        ..default()
    });

    if let Some(mut viewport) = viewport {
        viewport.reset_to(&scene.camera);
    }

    info!(
        "Spawned {} scene for {} ({} layers)",
        key.view_mode,
        artifact.name,
        scene.layers.len()
    );
}

/// Spawn a composed scene under a new root entity and return the root.
pub fn spawn_scene(
    commands: &mut Commands,
    scene: &RenderableScene,
    seed: u64,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let pose = scene.artifact_pose.to_transform();

    commands
        .spawn((
            Name::new("artifact-scene"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for layer in &scene.layers {
                let geometry = Geometry::from_primitive(&layer.primitive);
                let mesh = if layer.material.wireframe {
                    geometry.to_wireframe_mesh()
                } else {
                    geometry.to_mesh()
                };

                let mut entity = parent.spawn((
                    Mesh3d(meshes.add(mesh)),
                    MeshMaterial3d(materials.add(layer_material(&layer.material))),
                    SceneLayer(layer.role),
                ));
                if layer.follows_artifact {
                    entity.insert((pose, ArtifactMotion));
                } else {
                    entity.insert(Transform::IDENTITY);
                }
            }

            for light in [&scene.lights.key, &scene.lights.rim, &scene.lights.accent] {
                spawn_light(parent, light);
            }

            let particles = &scene.particles;
            parent.spawn((
                Mesh3d(meshes.add(point_cloud_mesh(&scatter_particles(particles, seed)))),
                MeshMaterial3d(materials.add(point_material(particles.color, particles.opacity))),
                Transform::from_rotation(Quat::from_rotation_y(scene.particle_rotation)),
                ParticleOrbit,
            ));

            if let Some(stars) = &scene.stars {
                parent.spawn((
                    Mesh3d(meshes.add(point_cloud_mesh(&scatter_stars(stars, seed)))),
                    MeshMaterial3d(materials.add(point_material(stars.color, 1.0))),
                    Transform::IDENTITY,
                    StarField,
                ));
            }
        })
        .id()
}

fn spawn_light(parent: &mut ChildSpawnerCommands, light: &LightSpec) {
    let color = hex_color(light.color);
    let translation = Vec3::from(light.position);

    match light.kind {
        LightKind::Directional => {
            parent.spawn((
                DirectionalLight {
                    color,
                    illuminance: light.intensity * DIRECTIONAL_LUX_PER_UNIT,
                    ..default()
                },
                Transform::from_translation(translation).looking_at(Vec3::ZERO, Vec3::Y),
                SceneLight,
            ));
        }
        LightKind::Point => {
            parent.spawn((
                PointLight {
                    color,
                    intensity: light.intensity * POINT_LUMENS_PER_UNIT,
                    ..default()
                },
                Transform::from_translation(translation),
                SceneLight,
            ));
        }
    }
}

fn layer_material(spec: &MaterialSpec) -> StandardMaterial {
    let (metallic, perceptual_roughness, unlit) = match spec.style {
        SurfaceStyle::Standard {
            metalness,
            roughness,
        } => (metalness, roughness, false),
        SurfaceStyle::Basic => (0.0, 1.0, true),
    };

    StandardMaterial {
        base_color: hex_color(spec.color).with_alpha(spec.opacity),
        metallic,
        perceptual_roughness,
        unlit,
        alpha_mode: if spec.is_transparent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        cull_mode: match spec.side {
            FaceSide::Front => Some(Face::Back),
            FaceSide::Back => Some(Face::Front),
        },
        ..default()
    }
}

fn point_material(color: u32, opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: hex_color(color).with_alpha(opacity),
        unlit: true,
        alpha_mode: if opacity < 1.0 {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::viewer::lifecycle::ViewMode;
    use std::time::Duration;

    #[test]
    fn back_side_materials_cull_front_faces() {
        let scene = SceneComposer::default().compose(
            &ShapeRegistry::resolve("dome"),
            ViewMode::Hologram,
            Duration::ZERO,
            SceneContext::Viewer,
        );

        let scan = scene.layer(LayerRole::ScanLines).unwrap();
        let material = layer_material(&scan.material);
        assert_eq!(material.cull_mode, Some(Face::Front));
        assert!(material.unlit);
        assert_eq!(material.alpha_mode, AlphaMode::Blend);

        let fill = scene.layer(LayerRole::Fill).unwrap();
        let material = layer_material(&fill.material);
        assert_eq!(material.cull_mode, Some(Face::Back));
        assert!(!material.unlit);
        assert_eq!(material.metallic, 0.65);
    }
}
