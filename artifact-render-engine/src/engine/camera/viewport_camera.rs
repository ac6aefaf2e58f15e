use bevy::input::mouse::MouseScrollUnit;
use bevy::math::EulerRot;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use constants::render_settings::{CAMERA_FOV_DEGREES, VIEWER_CAMERA_DISTANCE};

use crate::engine::core::plugin::EngineSet;
use crate::engine::scene::composer::{CameraSpec, OrbitBounds, SceneContext, camera_spec};

/// Marks the camera looking at the artifact scene.
#[derive(Component)]
pub struct ArtifactCamera;

/// Orbit state for the artifact camera. Always looks at the origin; no panning.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_degrees: f32,
    /// `None` when the current scene is not interactive.
    pub bounds: Option<OrbitBounds>,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: VIEWER_CAMERA_DISTANCE,
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: CAMERA_FOV_DEGREES,
            bounds: None,
        }
    }
}

impl ViewportCamera {
    pub fn from_spec(spec: &CameraSpec) -> Self {
        let mut camera = Self::default();
        camera.reset_to(spec);
        camera
    }

    /// Back to the framing a freshly composed scene asks for.
    pub fn reset_to(&mut self, spec: &CameraSpec) {
        self.focus_point = Vec3::ZERO;
        self.distance = spec.distance;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.fov_degrees = spec.fov_degrees;
        self.bounds = spec.controls;
    }

    pub fn is_interactive(&self) -> bool {
        self.bounds.is_some()
    }

    /// Rotate around the focus point by a mouse delta in pixels.
    pub fn orbit(&mut self, mouse_delta: Vec2) {
        if !self.is_interactive() {
            return;
        }
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        self.yaw += -mouse_delta.x * yaw_sens;
        self.pitch += -mouse_delta.y * pitch_sens;
        self.pitch = self.pitch.clamp(-1.55, 1.55);
    }

    /// Dolly towards the focus point, kept inside the orbit band.
    pub fn zoom(&mut self, scroll: f32) {
        let Some(bounds) = self.bounds else {
            return;
        };
        let dolly_speed = (self.distance * 0.2).clamp(0.05, 1.0);
        self.distance = bounds.clamp(self.distance - scroll * dolly_speed);
    }

    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let position = self.focus_point + rotation * (Vec3::Z * self.distance);
        Transform::from_translation(position).looking_at(self.focus_point, Vec3::Y)
    }
}

/// Spawns the artifact camera and applies orbit input to it.
pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ViewportCamera::from_spec(&camera_spec(SceneContext::Viewer)))
            .add_systems(Startup, spawn_artifact_camera)
            .add_systems(Update, camera_controller.after(EngineSet::Scene));
    }
}

/// Transparent-background perspective camera at the viewer framing.
pub fn spawn_artifact_camera(mut commands: Commands, viewport: Res<ViewportCamera>) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::NONE),
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: viewport.fov_degrees.to_radians(),
            ..default()
        }),
        viewport.transform(),
        ArtifactCamera,
    ));
}

pub fn camera_controller(
    mut camera_query: Query<(&mut Transform, &mut Projection), With<ArtifactCamera>>,
    mut viewport: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok((mut camera_transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        viewport.orbit(mouse_delta);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        viewport.zoom(scroll_accum);
    }

    if let Projection::Perspective(perspective) = projection.as_mut() {
        let fov = viewport.fov_degrees.to_radians();
        if (perspective.fov - fov).abs() > f32::EPSILON {
            perspective.fov = fov;
        }
    }

    let target = viewport.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform
        .translation
        .lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_frames_the_artifact_on_the_z_axis() {
        let camera = ViewportCamera::from_spec(&camera_spec(SceneContext::Viewer));
        let transform = camera.transform();

        assert!((transform.translation - Vec3::new(0.0, 0.0, 3.2)).length() < 1e-5);
        assert!((transform.forward().as_vec3() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn zoom_is_clamped_to_the_orbit_band() {
        let mut camera = ViewportCamera::from_spec(&camera_spec(SceneContext::Viewer));

        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.distance, 1.5);

        for _ in 0..100 {
            camera.zoom(-5.0);
        }
        assert_eq!(camera.distance, 6.0);
    }

    #[test]
    fn orbit_keeps_distance_and_focus() {
        let mut camera = ViewportCamera::from_spec(&camera_spec(SceneContext::Viewer));
        camera.orbit(Vec2::new(240.0, -80.0));

        let transform = camera.transform();
        assert!((transform.translation.length() - 3.2).abs() < 1e-4);
        assert_eq!(camera.focus_point, Vec3::ZERO);
    }

    #[test]
    fn compact_camera_ignores_input() {
        let mut camera = ViewportCamera::from_spec(&camera_spec(SceneContext::Compact));
        let before = camera.clone();

        camera.orbit(Vec2::new(100.0, 100.0));
        camera.zoom(3.0);

        assert_eq!(camera, before);
        assert_eq!(camera.distance, 2.8);
    }
}
