use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categories seeded on a fresh ledger, with whole-unit budgets. These can be
/// re-budgeted but never removed.
pub const DEFAULT_CATEGORIES: [(&str, i64); 7] = [
    ("ALIMENTAÇÃO", 300),
    ("TRANSPORTE", 200),
    ("MORADIA", 500),
    ("SAÚDE", 150),
    ("LAZER", 200),
    ("EDUCAÇÃO", 100),
    ("OUTROS", 100),
];

/// A named spending bucket with a monthly budget ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub name: String,
    pub budget: Decimal,
    pub is_default: bool,
}

impl Category {
    pub fn new(name: impl AsRef<str>, budget: Decimal) -> Self {
        Self {
            name: normalize_name(name.as_ref()),
            budget,
            is_default: false,
        }
    }

    fn default_entry(name: &str, budget: Decimal) -> Self {
        Self {
            name: name.to_string(),
            budget,
            is_default: true,
        }
    }
}

/// Canonical category key: trimmed and upper-cased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Ordered list of categories used as the template for new months.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// An empty registry, mostly useful in tests.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, budget)| Category::default_entry(name, Decimal::from(*budget)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        let normalized = normalize_name(name);
        self.categories
            .iter()
            .find(|category| category.name == normalized)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|category| category.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub(crate) fn push(&mut self, category: Category) {
        self.categories.push(category);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Category> {
        let normalized = normalize_name(name);
        let index = self
            .categories
            .iter()
            .position(|category| category.name == normalized)?;
        Some(self.categories.remove(index))
    }

    pub(crate) fn set_budget(&mut self, name: &str, budget: Decimal) -> Option<&Category> {
        let normalized = normalize_name(name);
        let category = self
            .categories
            .iter_mut()
            .find(|category| category.name == normalized)?;
        category.budget = budget;
        Some(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_are_protected_and_ordered() {
        let registry = CategoryRegistry::with_defaults();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.names()[0], "ALIMENTAÇÃO");
        assert!(registry.iter().all(|category| category.is_default));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = CategoryRegistry::with_defaults();
        assert!(registry.contains("  alimentação "));
        assert_eq!(registry.get("moradia").map(|c| c.budget), Some(dec!(500)));
    }

    #[test]
    fn new_category_is_normalized_and_custom() {
        let category = Category::new(" pets ", dec!(80));
        assert_eq!(category.name, "PETS");
        assert!(!category.is_default);
    }
}
