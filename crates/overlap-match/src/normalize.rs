//! Drug name canonicalization.
//!
//! Three levels of normalization are provided, each a superset of the last:
//!
//! - [`normalize_drug_name`]: lowercase, drop parentheticals and salt suffixes.
//! - [`salt_normalize`]: drop salt suffixes and formulation/route words.
//! - [`NameNormalizer::extract_base_drug_name`]: additionally drop species qualifiers.
//!
//! Salt-comparison results are memoized per [`NameNormalizer`] instance, so a
//! cache lives exactly as long as the matcher that owns it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]+\)").expect("Invalid parenthetical regex"));

/// Salt and hydrate suffixes removed by [`normalize_drug_name`].
static SALT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s+(?:hydrochloride|hcl|sulfate|sulphate|acetate|phosphate|citrate|maleate|fumarate|succinate|tartrate|mesylate|besylate|tosylate|bromide|iodide|sodium|potassium|calcium|monohydrate|dihydrate|anhydrous)\b",
    )
    .expect("Invalid salt suffix regex")
});

/// Salt suffixes for salt comparison: the [`SALT_SUFFIX`] set plus counter-ions
/// and hydrates that only matter when two names are compared against each other.
static SALT_COMPARISON_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s+(?:hydrochloride|hcl|chloride|sulfate|sulphate|acetate|phosphate|citrate|maleate|fumarate|succinate|tartrate|mesylate|besylate|tosylate|bromide|iodide|sodium|potassium|calcium|magnesium|monohydrate|dihydrate|trihydrate|anhydrous)\b",
    )
    .expect("Invalid salt comparison regex")
});

static FORMULATION_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:tablet|capsule|injection|solution|suspension|cream|ointment|gel|syrup|oral|topical|intravenous|iv|im|subcutaneous|sc)\b",
    )
    .expect("Invalid formulation regex")
});

// Longer variants first so "recombinant human" is removed as a unit.
static SPECIES_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:recombinant human|r-hu|rh|hr|human|salmon|salcatonin|porcine|pig|pork|bovine|cow|beef|synthetic|artificial)\b",
    )
    .expect("Invalid species regex")
});

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a raw drug name for comparison.
///
/// Lowercases, removes any `(...)` segment, strips salt-form suffixes as whole
/// words, and collapses whitespace. Applying it twice yields the same string.
pub fn normalize_drug_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let lowered = name.to_lowercase();
    let without_parens = PARENTHETICAL.replace_all(&lowered, "");
    let without_salts = SALT_SUFFIX.replace_all(&without_parens, "");
    collapse_whitespace(&without_salts)
}

/// Remove salt suffixes and formulation/route words. Uncached.
pub fn salt_normalize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let without_forms = FORMULATION_TERM.replace_all(&lowered, "");
    let without_salts = SALT_COMPARISON_SUFFIX.replace_all(&without_forms, "");
    collapse_whitespace(&without_salts)
}

/// Memo of salt-comparison forms keyed by raw input.
///
/// Grows without eviction and is never invalidated, so it is scoped to one
/// matching run. `RefCell` keeps it single-writer, which also makes it `!Sync`.
#[derive(Debug, Default)]
pub struct SaltCache {
    entries: RefCell<HashMap<String, String>>,
}

impl SaltCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, computing and storing it on first use.
    pub fn get_or_insert_with(&self, key: &str, compute: impl FnOnce() -> String) -> String {
        if let Some(cached) = self.entries.borrow().get(key) {
            return cached.clone();
        }
        let value = compute();
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Name normalizer backed by a per-instance [`SaltCache`].
#[derive(Debug, Default)]
pub struct NameNormalizer {
    salt_cache: SaltCache,
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`normalize_drug_name`].
    pub fn normalize(&self, name: &str) -> String {
        normalize_drug_name(name)
    }

    /// Salt- and formulation-insensitive form of `name`, memoized by raw input.
    pub fn normalize_for_salt_comparison(&self, name: &str) -> String {
        self.salt_cache.get_or_insert_with(name, || salt_normalize(name))
    }

    /// Salt-comparison form with species qualifiers removed.
    pub fn extract_base_drug_name(&self, name: &str) -> String {
        let salt_free = self.normalize_for_salt_comparison(name);
        collapse_whitespace(&SPECIES_QUALIFIER.replace_all(&salt_free, ""))
    }

    /// Number of distinct raw inputs memoized so far.
    pub fn cached_entries(&self) -> usize {
        self.salt_cache.len()
    }
}
