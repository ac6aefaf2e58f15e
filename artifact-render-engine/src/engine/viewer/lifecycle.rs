use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bevy::prelude::*;
use constants::timing::GENERATION_DELAY_MS;
use serde::{Deserialize, Serialize};

use crate::catalog::ArtifactId;
use crate::error::{EngineError, Result};

/// Mutually exclusive presentations of the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    #[serde(rename = "3d", alias = "solid")]
    Solid,
    #[serde(rename = "hologram")]
    Hologram,
    #[serde(rename = "wireframe")]
    Wireframe,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [Self::Solid, Self::Hologram, Self::Wireframe];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "3d" | "solid" => Ok(Self::Solid),
            "hologram" => Ok(Self::Hologram),
            "wireframe" => Ok(Self::Wireframe),
            _ => Err(EngineError::UnknownViewMode(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solid => "3d",
            Self::Hologram => "hologram",
            Self::Wireframe => "wireframe",
        }
    }
}

impl FromStr for ViewMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerPhase {
    /// No session.
    #[default]
    Idle,
    /// Simulated generation in progress; nothing is rendered.
    Loading,
    Ready,
}

/// Identifies one viewing session. Strictly increasing per lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub u64);

impl SessionToken {
    /// Deterministic seed for per-session decoration.
    pub fn seed(&self) -> u64 {
        self.0.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// What the scene plugin renders. A change means a full rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SceneKey {
    pub artifact_id: ArtifactId,
    pub view_mode: ViewMode,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewerSession {
    artifact_id: ArtifactId,
    token: SessionToken,
    phase: ViewerPhase,
    view_mode: ViewMode,
    remaining: Duration,
    elapsed: Duration,
}

/// Single viewing session state machine: Idle → Loading → Ready → Idle.
#[derive(Resource, Debug, Clone)]
pub struct ViewerLifecycle {
    generation_delay: Duration,
    session: Option<ViewerSession>,
    next_token: u64,
}

impl Default for ViewerLifecycle {
    fn default() -> Self {
        Self::new(Duration::from_millis(GENERATION_DELAY_MS))
    }
}

impl ViewerLifecycle {
    pub fn new(generation_delay: Duration) -> Self {
        Self {
            generation_delay,
            session: None,
            next_token: 1,
        }
    }

    /// Start viewing `artifact_id`.
    ///
    /// Replaces any other session with a fresh Loading phase. Opening the
    /// artifact that is already active changes nothing and returns `None`.
    pub fn open(&mut self, artifact_id: ArtifactId) -> Option<SessionToken> {
        if self.artifact_id() == Some(artifact_id) {
            return None;
        }

        let token = SessionToken(self.next_token);
        self.next_token += 1;

        self.session = Some(ViewerSession {
            artifact_id,
            token,
            phase: ViewerPhase::Loading,
            view_mode: ViewMode::Solid,
            remaining: self.generation_delay,
            elapsed: Duration::ZERO,
        });
        Some(token)
    }

    /// End the current session, returning its token.
    pub fn close(&mut self) -> Option<SessionToken> {
        self.session.take().map(|s| s.token)
    }

    /// Switch presentation. Only honoured while Ready; the animation clock keeps running.
    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> bool {
        match &mut self.session {
            Some(session) if session.phase == ViewerPhase::Ready => {
                session.view_mode = view_mode;
                true
            }
            _ => false,
        }
    }

    /// Advance the generation timer or the animation clock.
    ///
    /// Returns the token of a session that became Ready during this tick.
    pub fn tick(&mut self, delta: Duration) -> Option<SessionToken> {
        let session = self.session.as_mut()?;
        match session.phase {
            ViewerPhase::Loading => {
                session.remaining = session.remaining.saturating_sub(delta);
                if session.remaining.is_zero() {
                    session.phase = ViewerPhase::Ready;
                    session.elapsed = Duration::ZERO;
                    return Some(session.token);
                }
                None
            }
            ViewerPhase::Ready => {
                session.elapsed += delta;
                None
            }
            ViewerPhase::Idle => None,
        }
    }

    /// Complete generation for an externally timed session. Stale tokens are ignored.
    pub fn finish_generation(&mut self, token: SessionToken) -> bool {
        match &mut self.session {
            Some(session) if session.token == token && session.phase == ViewerPhase::Loading => {
                session.phase = ViewerPhase::Ready;
                session.remaining = Duration::ZERO;
                session.elapsed = Duration::ZERO;
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self) -> ViewerPhase {
        self.session.as_ref().map_or(ViewerPhase::Idle, |s| s.phase)
    }

    pub fn artifact_id(&self) -> Option<ArtifactId> {
        self.session.as_ref().map(|s| s.artifact_id)
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.session.as_ref().map(|s| s.token)
    }

    pub fn view_mode(&self) -> Option<ViewMode> {
        self.session.as_ref().map(|s| s.view_mode)
    }

    pub fn is_generating(&self) -> bool {
        self.phase() == ViewerPhase::Loading
    }

    pub fn is_ready(&self) -> bool {
        self.phase() == ViewerPhase::Ready
    }

    /// Animation time since the session became Ready.
    pub fn elapsed(&self) -> Option<Duration> {
        self.session
            .as_ref()
            .filter(|s| s.phase == ViewerPhase::Ready)
            .map(|s| s.elapsed)
    }

    /// Generation time left while Loading.
    pub fn remaining(&self) -> Option<Duration> {
        self.session
            .as_ref()
            .filter(|s| s.phase == ViewerPhase::Loading)
            .map(|s| s.remaining)
    }

    pub fn scene_key(&self) -> Option<SceneKey> {
        self.session
            .as_ref()
            .filter(|s| s.phase == ViewerPhase::Ready)
            .map(|s| SceneKey {
                artifact_id: s.artifact_id,
                view_mode: s.view_mode,
            })
    }

    pub fn session_seed(&self) -> Option<u64> {
        self.token().map(|t| t.seed())
    }

    pub fn generation_delay(&self) -> Duration {
        self.generation_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(2000);

    fn ready(id: u32) -> ViewerLifecycle {
        let mut lifecycle = ViewerLifecycle::new(DELAY);
        lifecycle.open(ArtifactId(id));
        lifecycle.tick(DELAY);
        lifecycle
    }

    #[test]
    fn open_enters_loading_with_solid_mode() {
        let mut lifecycle = ViewerLifecycle::new(DELAY);
        assert_eq!(lifecycle.phase(), ViewerPhase::Idle);

        let token = lifecycle.open(ArtifactId(1));

        assert!(token.is_some());
        assert!(lifecycle.is_generating());
        assert_eq!(lifecycle.view_mode(), Some(ViewMode::Solid));
        assert_eq!(lifecycle.scene_key(), None);
        assert_eq!(lifecycle.remaining(), Some(DELAY));
    }

    #[test]
    fn loading_becomes_ready_only_after_the_full_delay() {
        let mut lifecycle = ViewerLifecycle::new(DELAY);
        let token = lifecycle.open(ArtifactId(1));

        assert_eq!(lifecycle.tick(Duration::from_millis(1999)), None);
        assert!(lifecycle.is_generating());
        assert_eq!(lifecycle.tick(Duration::from_millis(1)), token);
        assert!(lifecycle.is_ready());
        assert_eq!(lifecycle.elapsed(), Some(Duration::ZERO));
    }

    #[test]
    fn view_mode_changes_are_ignored_while_loading() {
        let mut lifecycle = ViewerLifecycle::new(DELAY);
        lifecycle.open(ArtifactId(1));

        assert!(!lifecycle.set_view_mode(ViewMode::Hologram));
        assert_eq!(lifecycle.view_mode(), Some(ViewMode::Solid));
    }

    #[test]
    fn view_mode_switch_keeps_the_clock_running() {
        let mut lifecycle = ready(1);
        lifecycle.tick(Duration::from_millis(500));

        assert!(lifecycle.set_view_mode(ViewMode::Wireframe));
        lifecycle.tick(Duration::from_millis(250));

        assert!(lifecycle.is_ready());
        assert_eq!(lifecycle.elapsed(), Some(Duration::from_millis(750)));
        assert_eq!(
            lifecycle.scene_key(),
            Some(SceneKey {
                artifact_id: ArtifactId(1),
                view_mode: ViewMode::Wireframe
            })
        );
    }

    #[test]
    fn switching_artifacts_restarts_loading_with_a_fresh_clock() {
        let mut lifecycle = ViewerLifecycle::new(DELAY);
        let first = lifecycle.open(ArtifactId(1)).unwrap();
        lifecycle.tick(Duration::from_millis(1500));

        let second = lifecycle.open(ArtifactId(2)).unwrap();
        assert!(second > first);

        // The first session's remaining 500ms must not promote the second one
        assert_eq!(lifecycle.tick(Duration::from_millis(500)), None);
        assert!(lifecycle.is_generating());
        assert_eq!(lifecycle.tick(Duration::from_millis(1500)), Some(second));
        assert_eq!(lifecycle.artifact_id(), Some(ArtifactId(2)));
        assert_eq!(lifecycle.elapsed(), Some(Duration::ZERO));
    }

    #[test]
    fn reopening_the_active_artifact_is_a_no_op() {
        let mut lifecycle = ready(1);
        lifecycle.set_view_mode(ViewMode::Hologram);
        lifecycle.tick(Duration::from_millis(300));
        let token = lifecycle.token();

        assert_eq!(lifecycle.open(ArtifactId(1)), None);
        assert_eq!(lifecycle.token(), token);
        assert_eq!(lifecycle.view_mode(), Some(ViewMode::Hologram));
        assert_eq!(lifecycle.elapsed(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn stale_generation_tokens_are_ignored() {
        let mut lifecycle = ViewerLifecycle::new(DELAY);
        let stale = lifecycle.open(ArtifactId(1)).unwrap();
        let current = lifecycle.open(ArtifactId(2)).unwrap();

        assert!(!lifecycle.finish_generation(stale));
        assert!(lifecycle.is_generating());
        assert!(lifecycle.finish_generation(current));
        assert!(lifecycle.is_ready());
    }

    #[test]
    fn close_returns_to_idle_from_any_phase() {
        let mut loading = ViewerLifecycle::new(DELAY);
        let token = loading.open(ArtifactId(1));
        assert_eq!(loading.close(), token);
        assert_eq!(loading.phase(), ViewerPhase::Idle);

        let mut lifecycle = ready(1);
        assert!(lifecycle.close().is_some());
        assert_eq!(lifecycle.scene_key(), None);
        assert_eq!(lifecycle.close(), None);
        assert_eq!(lifecycle.tick(Duration::from_secs(1)), None);
    }

    #[test]
    fn view_mode_names_accept_both_solid_spellings() {
        assert_eq!(ViewMode::from_name("3d").unwrap(), ViewMode::Solid);
        assert_eq!(ViewMode::from_name("Solid").unwrap(), ViewMode::Solid);
        assert_eq!("wireframe".parse::<ViewMode>().unwrap(), ViewMode::Wireframe);
        assert!(matches!(
            ViewMode::from_name("xray"),
            Err(EngineError::UnknownViewMode(_))
        ));

        let json = serde_json::to_string(&ViewMode::Solid).unwrap();
        assert_eq!(json, "\"3d\"");
        let parsed: ViewMode = serde_json::from_str("\"solid\"").unwrap();
        assert_eq!(parsed, ViewMode::Solid);
    }
}
