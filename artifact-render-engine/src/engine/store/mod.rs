//! Process-wide browsing state.
//!
//! A single [`ArtifactStore`] resource holds the shared catalog, the artifact
//! currently open in the viewer, the saved set and the cancel-key listener
//! registry. All mutation goes through its methods.

use std::sync::Arc;

use bevy::prelude::*;

use crate::catalog::{Artifact, ArtifactId, Catalog};
use crate::engine::viewer::lifecycle::SessionToken;
use crate::error::{EngineError, Result};

#[derive(Resource, Debug, Clone)]
pub struct ArtifactStore {
    catalog: Arc<Catalog>,
    viewing: Option<ArtifactId>,
    /// Saved ids in the order they were saved.
    saved: Vec<ArtifactId>,
    cancel_listeners: Vec<SessionToken>,
    /// Bumped whenever `viewing` starts or stops, so a close and reopen of the
    /// same artifact between two syncs is still visible.
    view_generation: u64,
}

impl ArtifactStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            viewing: None,
            saved: Vec::new(),
            cancel_listeners: Vec::new(),
            view_generation: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn viewing(&self) -> Option<ArtifactId> {
        self.viewing
    }

    pub fn viewing_artifact(&self) -> Option<&Artifact> {
        self.viewing.and_then(|id| self.catalog.get(id))
    }

    /// Mark `id` as the artifact being viewed. Unknown ids leave state untouched.
    pub fn view(&mut self, id: ArtifactId) -> Result<&Artifact> {
        let artifact = self
            .catalog
            .get(id)
            .ok_or(EngineError::ArtifactNotFound(id))?;
        if self.viewing != Some(id) {
            self.viewing = Some(id);
            self.view_generation += 1;
        }
        Ok(artifact)
    }

    /// Stop viewing, returning what was open.
    pub fn close(&mut self) -> Option<ArtifactId> {
        let closed = self.viewing.take();
        if closed.is_some() {
            self.view_generation += 1;
        }
        closed
    }

    pub fn view_generation(&self) -> u64 {
        self.view_generation
    }

    /// Flip the saved flag and return the new value.
    pub fn toggle_save(&mut self, id: ArtifactId) -> bool {
        if let Some(pos) = self.saved.iter().position(|s| *s == id) {
            self.saved.remove(pos);
            false
        } else {
            self.saved.push(id);
            true
        }
    }

    pub fn is_saved(&self, id: ArtifactId) -> bool {
        self.saved.contains(&id)
    }

    /// Saved artifacts in save order, skipping ids missing from the catalog.
    pub fn saved_artifacts(&self) -> Vec<&Artifact> {
        self.saved
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    pub fn attach_cancel_listener(&mut self, token: SessionToken) {
        if !self.cancel_listeners.contains(&token) {
            self.cancel_listeners.push(token);
        }
    }

    pub fn detach_cancel_listener(&mut self, token: SessionToken) -> bool {
        let before = self.cancel_listeners.len();
        self.cancel_listeners.retain(|t| *t != token);
        self.cancel_listeners.len() != before
    }

    pub fn cancel_listener_count(&self) -> usize {
        self.cancel_listeners.len()
    }

    /// Cancel key pressed. Closes the viewer only while a session listens for it.
    pub fn handle_cancel_key(&mut self) -> Option<ArtifactId> {
        if self.cancel_listeners.is_empty() {
            return None;
        }
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ArtifactStore {
        let catalog = Catalog::from_artifacts(vec![
            Artifact::new(1, "Bust of Nefertiti", "Egypt", "1345 BCE", "bust"),
            Artifact::new(2, "Lion Gate", "Mycenaean", "1250 BCE", "slab"),
            Artifact::new(3, "Terracotta Warrior", "China", "210 BCE", "statue"),
        ])
        .unwrap();
        ArtifactStore::new(Arc::new(catalog))
    }

    #[test]
    fn view_sets_the_current_artifact() {
        let mut store = store();

        let artifact = store.view(ArtifactId(2)).unwrap();
        assert_eq!(artifact.name, "Lion Gate");
        assert_eq!(store.viewing(), Some(ArtifactId(2)));

        store.view(ArtifactId(3)).unwrap();
        assert_eq!(store.viewing(), Some(ArtifactId(3)));
    }

    #[test]
    fn unknown_id_is_not_found_and_changes_nothing() {
        let mut store = store();
        store.view(ArtifactId(1)).unwrap();

        let err = store.view(ArtifactId(99)).unwrap_err();

        assert!(matches!(err, EngineError::ArtifactNotFound(ArtifactId(99))));
        assert_eq!(store.viewing(), Some(ArtifactId(1)));
    }

    #[test]
    fn close_clears_viewing() {
        let mut store = store();
        store.view(ArtifactId(1)).unwrap();

        assert_eq!(store.close(), Some(ArtifactId(1)));
        assert_eq!(store.close(), None);
        assert!(store.viewing_artifact().is_none());
    }

    #[test]
    fn generation_counts_view_transitions() {
        let mut store = store();
        assert_eq!(store.view_generation(), 0);

        store.view(ArtifactId(1)).unwrap();
        store.view(ArtifactId(1)).unwrap();
        assert_eq!(store.view_generation(), 1);

        store.close();
        store.view(ArtifactId(1)).unwrap();
        assert_eq!(store.viewing(), Some(ArtifactId(1)));
        assert_eq!(store.view_generation(), 3);

        store.view(ArtifactId(99)).unwrap_err();
        store.close();
        store.close();
        assert_eq!(store.view_generation(), 4);
    }

    #[test]
    fn toggle_save_twice_restores_state() {
        let mut store = store();

        assert!(!store.is_saved(ArtifactId(1)));
        assert!(store.toggle_save(ArtifactId(1)));
        assert!(store.is_saved(ArtifactId(1)));
        assert!(!store.toggle_save(ArtifactId(1)));
        assert!(!store.is_saved(ArtifactId(1)));
    }

    #[test]
    fn saved_listing_keeps_save_order() {
        let mut store = store();
        store.toggle_save(ArtifactId(3));
        store.toggle_save(ArtifactId(1));
        store.toggle_save(ArtifactId(42));

        let names: Vec<_> = store.saved_artifacts().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Terracotta Warrior", "Bust of Nefertiti"]);
    }

    #[test]
    fn cancel_key_needs_an_attached_listener() {
        let mut store = store();
        store.view(ArtifactId(1)).unwrap();

        assert_eq!(store.handle_cancel_key(), None);
        assert_eq!(store.viewing(), Some(ArtifactId(1)));

        store.attach_cancel_listener(SessionToken(1));
        assert_eq!(store.handle_cancel_key(), Some(ArtifactId(1)));
        assert_eq!(store.viewing(), None);
    }

    #[test]
    fn listeners_pair_across_repeated_sessions() {
        let mut store = store();

        for n in 1..=5 {
            let token = SessionToken(n);
            store.attach_cancel_listener(token);
            store.attach_cancel_listener(token);
            assert_eq!(store.cancel_listener_count(), 1);
            assert!(store.detach_cancel_listener(token));
            assert!(!store.detach_cancel_listener(token));
        }

        assert_eq!(store.cancel_listener_count(), 0);
    }
}
