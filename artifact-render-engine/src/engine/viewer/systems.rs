use bevy::prelude::*;
use serde::Serialize;

use super::lifecycle::{SessionToken, ViewMode, ViewerLifecycle, ViewerPhase};
use crate::catalog::ArtifactId;
use crate::engine::store::ArtifactStore;

/// Viewer requests from the presentation layer, RPC or keyboard.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    Open(ArtifactId),
    Close,
    SetViewMode(ViewMode),
}

/// Fired on every lifecycle transition and view mode switch.
#[derive(Event, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewerPhaseChanged {
    pub phase: ViewerPhase,
    pub artifact_id: Option<ArtifactId>,
    pub view_mode: Option<ViewMode>,
    pub token: Option<SessionToken>,
}

impl ViewerPhaseChanged {
    pub fn snapshot(lifecycle: &ViewerLifecycle) -> Self {
        Self {
            phase: lifecycle.phase(),
            artifact_id: lifecycle.artifact_id(),
            view_mode: lifecycle.view_mode(),
            token: lifecycle.token(),
        }
    }
}

/// Apply viewer commands. Open and close go through the store; the lifecycle
/// follows in [`sync_viewer_with_store`].
pub fn handle_viewer_commands(
    mut commands: EventReader<ViewerCommand>,
    mut store: ResMut<ArtifactStore>,
    mut lifecycle: ResMut<ViewerLifecycle>,
    mut phase_events: EventWriter<ViewerPhaseChanged>,
) {
    for command in commands.read() {
        match *command {
            ViewerCommand::Open(id) => {
                if let Err(err) = store.view(id) {
                    warn!("Ignoring open request: {}", err);
                }
            }
            ViewerCommand::Close => {
                store.close();
            }
            ViewerCommand::SetViewMode(mode) => {
                if lifecycle.set_view_mode(mode) {
                    info!("Viewer mode: {}", mode);
                    phase_events.write(ViewerPhaseChanged::snapshot(&lifecycle));
                } else {
                    debug!("View mode {} ignored outside Ready", mode);
                }
            }
        }
    }
}

/// Close the viewer on Escape, regardless of focus.
pub fn handle_cancel_key(keyboard: Res<ButtonInput<KeyCode>>, mut store: ResMut<ArtifactStore>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        if let Some(id) = store.handle_cancel_key() {
            info!("Viewer for {} cancelled", id);
        }
    }
}

/// Native number-key shortcuts for the view modes. Web hosts use RPC.
pub fn view_mode_shortcuts(
    #[cfg(not(target_arch = "wasm32"))] keyboard: Res<ButtonInput<KeyCode>>,
    #[cfg(not(target_arch = "wasm32"))] mut viewer_commands: EventWriter<ViewerCommand>,
) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let shortcuts = [
            (KeyCode::Digit1, ViewMode::Solid),
            (KeyCode::Digit2, ViewMode::Hologram),
            (KeyCode::Digit3, ViewMode::Wireframe),
        ];

        for (key, mode) in shortcuts {
            if keyboard.just_pressed(key) {
                viewer_commands.write(ViewerCommand::SetViewMode(mode));
            }
        }
    }
}

/// Keep the lifecycle on whatever artifact the store says is being viewed,
/// pairing cancel-key listeners with session start and end.
///
/// Follows the store's view generation rather than the id alone, so a close
/// and reopen of the same artifact within one frame still starts a fresh
/// session.
pub fn sync_viewer_with_store(
    mut store: ResMut<ArtifactStore>,
    mut lifecycle: ResMut<ViewerLifecycle>,
    mut phase_events: EventWriter<ViewerPhaseChanged>,
    mut synced_generation: Local<u64>,
) {
    let generation = store.view_generation();
    if generation == *synced_generation {
        return;
    }
    *synced_generation = generation;

    let wanted = store.viewing();
    if let Some(ended) = lifecycle.close() {
        store.detach_cancel_listener(ended);
        info!("Viewer session {:?} closed", ended);
    }

    if let Some(id) = wanted {
        if let Some(token) = lifecycle.open(id) {
            store.attach_cancel_listener(token);
            info!("Viewer session {:?} generating artifact {}", token, id);
        }
    }

    phase_events.write(ViewerPhaseChanged::snapshot(&lifecycle));
}

/// Advance the generation timer and animation clock.
pub fn tick_viewer_clock(
    time: Res<Time>,
    mut lifecycle: ResMut<ViewerLifecycle>,
    mut phase_events: EventWriter<ViewerPhaseChanged>,
) {
    if let Some(token) = lifecycle.tick(time.delta()) {
        info!("Viewer session {:?} ready", token);
        phase_events.write(ViewerPhaseChanged::snapshot(&lifecycle));
    }
}

/// Run condition for systems that only make sense while a scene is shown.
pub fn viewer_is_ready(lifecycle: Option<Res<ViewerLifecycle>>) -> bool {
    lifecycle.is_some_and(|l| l.is_ready())
}
