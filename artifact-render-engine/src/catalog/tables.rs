use std::collections::HashSet;

use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::{Deserialize, Serialize};

use super::artifact::{Artifact, ArtifactId};
use crate::error::{EngineError, Result};

/// Label used by facet tables for the pass-through entry.
pub const ALL_FACET: &str = "All";

/// Curated collection grouping artifacts by civilisation or theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub culture: String,
    #[serde(default)]
    pub era: String,
    #[serde(default)]
    pub desc: String,
}

/// Display label for a supported description language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageLabel {
    pub code: String,
    pub label: String,
}

/// Full static catalog plus lookup tables.
///
/// Loaded once per process and shared read-only behind an `Arc`.
#[derive(Asset, TypePath, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub artifacts: Vec<Artifact>,
    #[serde(default)]
    pub cultures: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub collections: Vec<CollectionInfo>,
    #[serde(default)]
    pub languages: Vec<LanguageLabel>,
}

impl Catalog {
    /// Build a catalog from bare artifacts, deriving facet tables in catalog order.
    pub fn from_artifacts(artifacts: Vec<Artifact>) -> Result<Self> {
        let mut catalog = Self {
            artifacts,
            ..Default::default()
        };
        catalog.fill_facet_tables();
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate catalog JSON. Missing facet tables are derived.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut catalog: Catalog = serde_json::from_str(json)?;
        catalog.fill_facet_tables();
        catalog.validate()?;
        Ok(catalog)
    }

    /// Derive empty facet tables from the artifacts and make sure both lists
    /// lead with the pass-through entry.
    pub fn fill_facet_tables(&mut self) {
        if self.cultures.is_empty() {
            self.cultures = self.derive_facets(|a| &a.culture);
        }
        if self.categories.is_empty() {
            self.categories = self.derive_facets(|a| &a.category);
        }
        for table in [&mut self.cultures, &mut self.categories] {
            if table.first().map(String::as_str) != Some(ALL_FACET) {
                table.retain(|f| f != ALL_FACET);
                table.insert(0, ALL_FACET.to_string());
            }
        }
    }

    /// Reject catalogs whose ids collide.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.artifacts.len());
        for artifact in &self.artifacts {
            if !seen.insert(artifact.id) {
                return Err(EngineError::DuplicateArtifactId(artifact.id));
            }
        }
        Ok(())
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn get(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: ArtifactId) -> bool {
        self.get(id).is_some()
    }

    /// Artifacts flagged for the landing page, in catalog order.
    pub fn featured(&self) -> Vec<&Artifact> {
        self.artifacts.iter().filter(|a| a.featured).collect()
    }

    /// Artifacts belonging to the named collection, in catalog order.
    pub fn in_collection(&self, collection: &str) -> Vec<&Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.collection == collection)
            .collect()
    }

    pub fn cultures(&self) -> &[String] {
        &self.cultures
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn collections(&self) -> &[CollectionInfo] {
        &self.collections
    }

    pub fn languages(&self) -> &[LanguageLabel] {
        &self.languages
    }

    /// Human label for a language code; unknown codes echo back unchanged.
    pub fn language_label<'a>(&'a self, code: &'a str) -> &'a str {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .map_or(code, |l| l.label.as_str())
    }

    fn derive_facets(&self, field: impl Fn(&Artifact) -> &String) -> Vec<String> {
        let mut facets = vec![ALL_FACET.to_string()];
        for artifact in &self.artifacts {
            let value = field(artifact);
            if !value.is_empty() && !facets.contains(value) {
                facets.push(value.clone());
            }
        }
        facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../../assets/catalog.json");

    #[test]
    fn bundled_catalog_parses_and_has_unique_ids() {
        let catalog = Catalog::from_json_str(BUNDLED).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.cultures().first().map(String::as_str), Some(ALL_FACET));
        assert_eq!(catalog.categories().first().map(String::as_str), Some(ALL_FACET));
        assert!(!catalog.featured().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let artifacts = vec![
            Artifact::new(1, "Lion Gate", "Mycenaean", "1250 BCE", "slab"),
            Artifact::new(1, "Bust of Nefertiti", "Egypt", "1345 BCE", "bust"),
        ];

        let err = Catalog::from_artifacts(artifacts).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateArtifactId(ArtifactId(1))));
    }

    #[test]
    fn derived_facets_keep_catalog_order_without_duplicates() {
        let catalog = Catalog::from_artifacts(vec![
            Artifact::new(1, "A", "Egypt", "1", "bust").with_category("Sculpture"),
            Artifact::new(2, "B", "Greece", "2", "statue").with_category("Sculpture"),
            Artifact::new(3, "C", "Egypt", "3", "slab").with_category("Relief"),
        ])
        .unwrap();

        assert_eq!(catalog.cultures(), ["All", "Egypt", "Greece"]);
        assert_eq!(catalog.categories(), ["All", "Sculpture", "Relief"]);
    }

    #[test]
    fn json_without_facet_tables_derives_them() {
        let json = r#"{
            "artifacts": [
                { "id": 1, "name": "Bust of Nefertiti", "culture": "Egypt", "era": "1345 BCE",
                  "shape": "bust", "category": "Sculpture" },
                { "id": 2, "name": "Lion Gate", "culture": "Mycenaean", "era": "1250 BCE",
                  "shape": "slab", "category": "Relief" }
            ]
        }"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.cultures(), ["All", "Egypt", "Mycenaean"]);
        assert_eq!(catalog.categories(), ["All", "Sculpture", "Relief"]);
    }

    #[test]
    fn supplied_tables_gain_a_leading_all() {
        let mut catalog = Catalog {
            artifacts: vec![Artifact::new(1, "A", "Egypt", "1", "bust")],
            cultures: vec!["Egypt".into(), "All".into()],
            ..Default::default()
        };
        catalog.fill_facet_tables();

        assert_eq!(catalog.cultures(), ["All", "Egypt"]);
        assert_eq!(catalog.categories().first().map(String::as_str), Some(ALL_FACET));
    }

    #[test]
    fn language_label_falls_back_to_code() {
        let catalog = Catalog {
            languages: vec![LanguageLabel {
                code: "fr".into(),
                label: "Français".into(),
            }],
            ..Default::default()
        };

        assert_eq!(catalog.language_label("fr"), "Français");
        assert_eq!(catalog.language_label("xx"), "xx");
    }

    #[test]
    fn collection_listing_filters_by_name() {
        let catalog = Catalog::from_artifacts(vec![
            Artifact::new(1, "A", "Egypt", "1", "bust").with_collection("Nile"),
            Artifact::new(2, "B", "Greece", "2", "statue").with_collection("Aegean"),
        ])
        .unwrap();

        let nile: Vec<_> = catalog.in_collection("Nile").iter().map(|a| a.id).collect();
        assert_eq!(nile, [ArtifactId(1)]);
        assert!(catalog.in_collection("Andes").is_empty());
    }
}
