use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Artifact;
use crate::catalog::tables::ALL_FACET;
use crate::error::{EngineError, Result};

/// One facet selection. Serialized as the plain label, `"All"` meaning no filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Facet {
    #[default]
    All,
    Only(String),
}

impl Facet {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl From<String> for Facet {
    fn from(value: String) -> Self {
        if value == ALL_FACET {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<&str> for Facet {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Facet> for String {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::All => ALL_FACET.to_string(),
            Facet::Only(value) => value,
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_FACET),
            Self::Only(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Input order: catalog order or search relevance.
    #[default]
    Default,
    NameAsc,
    EraAsc,
    EraDesc,
}

impl SortOrder {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim() {
            "default" => Ok(Self::Default),
            "name_asc" => Ok(Self::NameAsc),
            "era_asc" => Ok(Self::EraAsc),
            "era_desc" => Ok(Self::EraDesc),
            _ => Err(EngineError::UnknownSortOrder(name.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub culture: Facet,
    pub category: Facet,
    pub sort: SortOrder,
}

/// Leading integer of an era label, e.g. `"1345 BCE"` → 1345.
///
/// Skips leading whitespace, accepts one sign, then reads digits. Labels that do
/// not start with a number sort as 0.
pub fn era_sort_key(era: &str) -> i64 {
    let trimmed = era.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut any_digit = false;
    for digit in rest.bytes().take_while(u8::is_ascii_digit) {
        any_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(digit - b'0'));
    }

    match (any_digit, negative) {
        (false, _) => 0,
        (true, true) => -value,
        (true, false) => value,
    }
}

/// Facet filtering followed by the selected sort. Pure and deterministic.
pub fn apply_filters(list: &[Artifact], filters: &FilterState) -> Vec<Artifact> {
    let mut out: Vec<Artifact> = list
        .iter()
        .filter(|a| filters.culture.matches(&a.culture) && filters.category.matches(&a.category))
        .cloned()
        .collect();

    match filters.sort {
        SortOrder::Default => {}
        SortOrder::NameAsc => out.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortOrder::EraAsc => out.sort_by_key(|a| era_sort_key(&a.era)),
        SortOrder::EraDesc => {
            out.sort_by_key(|a| era_sort_key(&a.era));
            out.reverse();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Vec<Artifact> {
        vec![
            Artifact::new(1, "Bust of Nefertiti", "Egypt", "1345 BCE", "bust")
                .with_category("Sculpture"),
            Artifact::new(2, "Lion Gate", "Mycenaean", "1250 BCE", "slab")
                .with_category("Architecture"),
            Artifact::new(3, "Terracotta Warrior", "China", "210 BCE", "statue")
                .with_category("Sculpture"),
            Artifact::new(4, "Pantheon Dome Model", "Rome", "125 CE", "dome")
                .with_category("Architecture"),
        ]
    }

    fn ids(list: &[Artifact]) -> Vec<u32> {
        list.iter().map(|a| a.id.0).collect()
    }

    #[test]
    fn all_facets_pass_everything_in_input_order() {
        let out = apply_filters(&sample(), &FilterState::default());
        assert_eq!(ids(&out), [1, 2, 3, 4]);
    }

    #[test]
    fn facets_match_exactly() {
        let filters = FilterState {
            category: Facet::from("Sculpture"),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&sample(), &filters)), [1, 3]);

        let filters = FilterState {
            culture: Facet::from("egypt"),
            ..Default::default()
        };
        assert!(apply_filters(&sample(), &filters).is_empty());
    }

    #[test]
    fn era_sorts_use_the_leading_number() {
        let asc = FilterState {
            sort: SortOrder::EraAsc,
            ..Default::default()
        };
        let desc = FilterState {
            sort: SortOrder::EraDesc,
            ..Default::default()
        };

        assert_eq!(ids(&apply_filters(&sample(), &asc)), [4, 3, 2, 1]);
        assert_eq!(ids(&apply_filters(&sample(), &desc)), [1, 2, 3, 4]);
    }

    #[test]
    fn era_key_parsing() {
        assert_eq!(era_sort_key("1345 BCE"), 1345);
        assert_eq!(era_sort_key("  -44 BCE"), -44);
        assert_eq!(era_sort_key("+7"), 7);
        assert_eq!(era_sort_key("6th century"), 6);
        assert_eq!(era_sort_key("c. 1345"), 0);
        assert_eq!(era_sort_key(""), 0);
        assert_eq!(era_sort_key("-"), 0);
    }

    #[test]
    fn facet_serializes_as_plain_label() {
        assert_eq!(serde_json::to_string(&Facet::All).unwrap(), "\"All\"");
        let facet: Facet = serde_json::from_str("\"Egypt\"").unwrap();
        assert_eq!(facet, Facet::Only("Egypt".into()));

        let filters: FilterState =
            serde_json::from_str(r#"{ "culture": "All", "sort": "era_desc" }"#).unwrap();
        assert_eq!(filters.culture, Facet::All);
        assert_eq!(filters.sort, SortOrder::EraDesc);
    }

    #[test]
    fn sort_names_are_validated() {
        assert_eq!(SortOrder::from_name("name_asc").unwrap(), SortOrder::NameAsc);
        assert!(matches!(
            SortOrder::from_name("newest"),
            Err(EngineError::UnknownSortOrder(_))
        ));
    }

    fn artifact_strategy() -> impl Strategy<Value = Artifact> {
        (
            0u32..1000,
            "[A-Za-z ]{0,12}",
            prop::sample::select(vec!["Egypt", "Greece", "China"]),
            prop::sample::select(vec!["Sculpture", "Relief"]),
            prop_oneof![
                (-3000i32..3000).prop_map(|n| format!("{n} CE")),
                Just("unknown".to_string()),
                Just(" 12th century".to_string()),
            ],
        )
            .prop_map(|(id, name, culture, category, era)| {
                Artifact::new(id, &name, culture, &era, "figure").with_category(category)
            })
    }

    fn filter_strategy() -> impl Strategy<Value = FilterState> {
        (
            prop::sample::select(vec!["All", "Egypt", "Greece"]),
            prop::sample::select(vec!["All", "Sculpture"]),
            prop::sample::select(vec![
                SortOrder::Default,
                SortOrder::NameAsc,
                SortOrder::EraAsc,
                SortOrder::EraDesc,
            ]),
        )
            .prop_map(|(culture, category, sort)| FilterState {
                culture: Facet::from(culture),
                category: Facet::from(category),
                sort,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn filtering_is_deterministic(
            list in prop::collection::vec(artifact_strategy(), 0..24),
            filters in filter_strategy(),
        ) {
            prop_assert_eq!(apply_filters(&list, &filters), apply_filters(&list, &filters));
        }

        #[test]
        fn filtering_a_filtered_list_changes_nothing(
            list in prop::collection::vec(artifact_strategy(), 0..24),
            filters in filter_strategy(),
        ) {
            // EraDesc reverses ties, so only the forward orders are fixed points
            prop_assume!(filters.sort != SortOrder::EraDesc);
            let once = apply_filters(&list, &filters);
            prop_assert_eq!(apply_filters(&once, &filters), once);
        }

        #[test]
        fn name_sort_is_non_decreasing(list in prop::collection::vec(artifact_strategy(), 0..24)) {
            let filters = FilterState { sort: SortOrder::NameAsc, ..Default::default() };
            let out = apply_filters(&list, &filters);
            for pair in out.windows(2) {
                prop_assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
            }
        }

        #[test]
        fn era_orders_are_exact_reverses(
            list in prop::collection::vec(artifact_strategy(), 0..24),
        ) {
            let asc = FilterState { sort: SortOrder::EraAsc, ..Default::default() };
            let desc = FilterState { sort: SortOrder::EraDesc, ..Default::default() };

            let mut reversed = apply_filters(&list, &desc);
            reversed.reverse();
            prop_assert_eq!(apply_filters(&list, &asc), reversed);
        }

        #[test]
        fn filtering_never_invents_artifacts(
            list in prop::collection::vec(artifact_strategy(), 0..24),
            filters in filter_strategy(),
        ) {
            let out = apply_filters(&list, &filters);
            prop_assert!(out.len() <= list.len());
            prop_assert!(out.iter().all(|a| list.contains(a)));
        }
    }
}
