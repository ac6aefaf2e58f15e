use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique catalog identity of an artifact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ArtifactId(pub u32);

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ArtifactId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One dated event in an artifact's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: String,
    pub text: String,
}

/// Immutable catalog record for one cultural-heritage artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    pub culture: String,
    pub era: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub ai_desc: String,
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
    /// Free-form shape tag, resolved by the shape registry (unknown tags fall back).
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub featured: bool,
}

impl Artifact {
    /// Minimal record, used by tests and host-side fixtures.
    pub fn new(id: u32, name: &str, culture: &str, era: &str, shape: &str) -> Self {
        Self {
            id: ArtifactId(id),
            name: name.to_string(),
            culture: culture.to_string(),
            era: era.to_string(),
            period: String::new(),
            material: String::new(),
            dimensions: String::new(),
            location: String::new(),
            desc: String::new(),
            ai_desc: String::new(),
            collection: String::new(),
            tags: Vec::new(),
            timeline: Vec::new(),
            shape: shape.to_string(),
            category: String::new(),
            featured: false,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = collection.to_string();
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }
}
