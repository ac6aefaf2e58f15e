use bevy::prelude::*;

use super::composer::{artifact_pose, particle_rotation};
use super::spawn::{ArtifactMotion, ParticleOrbit};
use crate::engine::viewer::lifecycle::ViewerLifecycle;

/// Apply the artifact pose to every artifact-bound layer.
pub fn animate_artifact(
    lifecycle: Res<ViewerLifecycle>,
    mut layers: Query<&mut Transform, With<ArtifactMotion>>,
) {
    let Some(elapsed) = lifecycle.elapsed() else {
        return;
    };
    let pose = artifact_pose(elapsed).to_transform();
    for mut transform in &mut layers {
        *transform = pose;
    }
}

/// Slowly turn the particle field about Y.
pub fn orbit_particles(
    lifecycle: Res<ViewerLifecycle>,
    mut fields: Query<&mut Transform, (With<ParticleOrbit>, Without<ArtifactMotion>)>,
) {
    let Some(elapsed) = lifecycle.elapsed() else {
        return;
    };
    let rotation = Quat::from_rotation_y(particle_rotation(elapsed));
    for mut transform in &mut fields {
        transform.rotation = rotation;
    }
}
