//! Identifier resolution
//!
//! A decoded payload is matched against the catalog by an ordered list of
//! stages. Each stage is a pure predicate over `(payload, item)`; the first
//! stage with any matching item wins, and within a stage the first item in
//! catalog order wins.
//!
//! | Stage       | Rule                                                              |
//! |-------------|-------------------------------------------------------------------|
//! | Exact       | payload equals the item's encoded identifier                      |
//! | Structured  | `inlove_product:<id>:<code>` whose id or short code matches       |
//! | Containment | payload contains short code or id, or identifier contains payload |
//! | Fuzzy       | name contains payload, or payload contains the name's first 5 chars |
//!
//! Empty fields never match anything, and an empty payload resolves to
//! nothing.

use serde::{Deserialize, Serialize};
use shared::models::{CatalogItem, EncodedIdentifier};

/// Characters of the lowercased name used by the fuzzy stage
pub const FUZZY_PREFIX_CHARS: usize = 5;

/// Resolution stage, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Exact,
    Structured,
    Containment,
    Fuzzy,
}

impl MatchStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Structured => "structured",
            Self::Containment => "containment",
            Self::Fuzzy => "fuzzy",
        }
    }

    /// Predicate for this stage. `payload` is already trimmed.
    pub fn matches(&self, payload: &str, item: &CatalogItem) -> bool {
        let predicate = STAGES
            .iter()
            .find(|(stage, _)| stage == self)
            .map(|(_, f)| *f);
        predicate.is_some_and(|f| f(payload, item))
    }
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

type StagePredicate = fn(&str, &CatalogItem) -> bool;

/// Stages in evaluation order
pub const STAGES: [(MatchStage, StagePredicate); 4] = [
    (MatchStage::Exact, exact),
    (MatchStage::Structured, structured),
    (MatchStage::Containment, containment),
    (MatchStage::Fuzzy, fuzzy),
];

fn exact(payload: &str, item: &CatalogItem) -> bool {
    !item.encoded_identifier.is_empty() && item.encoded_identifier == payload
}

fn structured(payload: &str, item: &CatalogItem) -> bool {
    let Some(parsed) = EncodedIdentifier::parse(payload) else {
        return false;
    };
    (!parsed.id.is_empty() && item.id == parsed.id)
        || (!parsed.short_code.is_empty() && item.short_code == parsed.short_code)
}

fn containment(payload: &str, item: &CatalogItem) -> bool {
    (!item.short_code.is_empty() && payload.contains(item.short_code.as_str()))
        || (!item.id.is_empty() && payload.contains(item.id.as_str()))
        || item.encoded_identifier.contains(payload)
}

fn fuzzy(payload: &str, item: &CatalogItem) -> bool {
    let name = item.name.to_lowercase();
    if name.is_empty() {
        return false;
    }
    let payload = payload.to_lowercase();
    if name.contains(payload.as_str()) {
        return true;
    }
    let prefix: String = name.chars().take(FUZZY_PREFIX_CHARS).collect();
    payload.contains(prefix.as_str())
}

/// Resolve a payload to a catalog item
pub fn resolve<'a>(payload: &str, items: &'a [CatalogItem]) -> Option<&'a CatalogItem> {
    resolve_with_stage(payload, items).map(|(item, _)| item)
}

/// Resolve a payload, also reporting which stage matched
pub fn resolve_with_stage<'a>(
    payload: &str,
    items: &'a [CatalogItem],
) -> Option<(&'a CatalogItem, MatchStage)> {
    let payload = payload.trim();
    if payload.is_empty() {
        return None;
    }
    STAGES.iter().find_map(|(stage, predicate)| {
        items
            .iter()
            .find(|item| predicate(payload, item))
            .map(|item| (item, *stage))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(id: &str, code: &str, name: &str) -> CatalogItem {
        CatalogItem::with_id(id, code, name, Decimal::new(8990, 2))
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item("abc-1", "P001", "Conjunto Rosa"),
            item("def-2", "P002", "Camisola Cetim"),
            item("ghi-3", "P003", "Body Renda Preto"),
        ]
    }

    #[test]
    fn test_exact_identifier() {
        let items = catalog();
        let (found, stage) = resolve_with_stage("inlove_product:def-2:P002", &items).unwrap();
        assert_eq!(found.id, "def-2");
        assert_eq!(stage, MatchStage::Exact);
    }

    #[test]
    fn test_payload_is_trimmed() {
        let items = catalog();
        let (found, stage) =
            resolve_with_stage("  inlove_product:abc-1:P001\n", &items).unwrap();
        assert_eq!(found.id, "abc-1");
        assert_eq!(stage, MatchStage::Exact);
    }

    #[test]
    fn test_exact_wins_over_earlier_structured_candidate() {
        // first item matches structurally by id, second matches exactly
        let mut first = item("abc-1", "X9", "Outro");
        first.encoded_identifier = "legacy".to_string();
        let second = item("zzz-9", "P001", "Conjunto Rosa");
        let items = vec![first, second];

        let payload = "inlove_product:zzz-9:P001";
        let (found, stage) = resolve_with_stage(payload, &items).unwrap();
        assert_eq!(found.id, "zzz-9");
        assert_eq!(stage, MatchStage::Exact);
    }

    #[test]
    fn test_structured_by_id_or_short_code() {
        let items = catalog();

        // stale short code, current id
        let (found, stage) = resolve_with_stage("inlove_product:ghi-3:OLD", &items).unwrap();
        assert_eq!(found.id, "ghi-3");
        assert_eq!(stage, MatchStage::Structured);

        // unknown id, current short code
        let (found, stage) = resolve_with_stage("inlove_product:gone:P002", &items).unwrap();
        assert_eq!(found.id, "def-2");
        assert_eq!(stage, MatchStage::Structured);
    }

    #[test]
    fn test_structured_requires_tag_and_three_fields() {
        let items = catalog();
        assert!(!MatchStage::Structured.matches("other_tag:abc-1:P001", &items[0]));
        assert!(!MatchStage::Structured.matches("inlove_product:abc-1", &items[0]));
        assert!(!MatchStage::Structured.matches("inlove_product:abc-1:P001:x", &items[0]));
    }

    #[test]
    fn test_containment() {
        let items = catalog();

        let (found, stage) = resolve_with_stage("codigo P003 lote 7", &items).unwrap();
        assert_eq!(found.id, "ghi-3");
        assert_eq!(stage, MatchStage::Containment);

        // identifier contains the payload
        let (found, stage) = resolve_with_stage("def-2:P0", &items).unwrap();
        assert_eq!(found.id, "def-2");
        assert_eq!(stage, MatchStage::Containment);
    }

    #[test]
    fn test_fuzzy_name() {
        let items = catalog();

        let (found, stage) = resolve_with_stage("CETIM", &items).unwrap();
        assert_eq!(found.id, "def-2");
        assert_eq!(stage, MatchStage::Fuzzy);

        // payload contains the first five characters of the name
        let (found, stage) = resolve_with_stage("promo body renda azul", &items).unwrap();
        assert_eq!(found.id, "ghi-3");
        assert_eq!(stage, MatchStage::Fuzzy);
    }

    #[test]
    fn test_fuzzy_counts_characters() {
        let items = vec![item("x-1", "X1", "Pérola Bordô")];
        assert!(MatchStage::Fuzzy.matches("linha pérol nova", &items[0]));
        assert!(!MatchStage::Fuzzy.matches("linha péro nova", &items[0]));
    }

    #[test]
    fn test_ties_resolve_to_first_in_order() {
        let items = vec![
            item("a-1", "A1", "Conjunto Rosa"),
            item("b-2", "B2", "Conjunto Azul"),
        ];
        let (found, stage) = resolve_with_stage("conjunto", &items).unwrap();
        assert_eq!(found.id, "a-1");
        assert_eq!(stage, MatchStage::Fuzzy);
    }

    #[test]
    fn test_no_match() {
        let items = catalog();
        assert!(resolve("xyz-999", &items).is_none());
        assert!(resolve("inlove_product:nope:NOPE", &items).is_none());
        assert!(resolve("anything", &[]).is_none());
    }

    #[test]
    fn test_empty_payload_matches_nothing() {
        let items = catalog();
        assert!(resolve("", &items).is_none());
        assert!(resolve("   \t", &items).is_none());
    }

    #[test]
    fn test_empty_fields_are_not_wildcards() {
        let mut blank = item("", "", "");
        blank.encoded_identifier = String::new();
        let items = vec![blank, item("abc-1", "P001", "Conjunto Rosa")];

        let (found, _) = resolve_with_stage("P001", &items).unwrap();
        assert_eq!(found.id, "abc-1");
        assert!(resolve("qualquer coisa", &items[..1]).is_none());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let items = catalog();
        for payload in ["P001", "rosa", "inlove_product:def-2:P002", "nada"] {
            let a = resolve_with_stage(payload, &items).map(|(i, s)| (i.id.clone(), s));
            let b = resolve_with_stage(payload, &items).map(|(i, s)| (i.id.clone(), s));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_stage_order() {
        let order: Vec<_> = STAGES.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            order,
            vec![
                MatchStage::Exact,
                MatchStage::Structured,
                MatchStage::Containment,
                MatchStage::Fuzzy
            ]
        );
    }
}
