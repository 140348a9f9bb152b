//! Reference resolution for display: account and category ids to names.
//!
//! Absence is an expected state here (an uncategorized transaction, or an
//! entity that has not loaded yet), so every resolver is total and degrades
//! to a fixed placeholder.
use super::models::{Account, Category};

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
pub const NEUTRAL_COLOR: &str = "#6B7280";

/// Result of looking an id up in a snapshot collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a, T> {
    Found(&'a T),
    NotFound,
}

impl<'a, T> Lookup<'a, T> {
    pub fn map_or<U>(self, default: U, f: impl FnOnce(&'a T) -> U) -> U {
        match self {
            Lookup::Found(entity) => f(entity),
            Lookup::NotFound => default,
        }
    }
}

/// Entities addressable by an opaque string id.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn find<'a, T: Identified>(collection: &'a [T], id: &str) -> Lookup<'a, T> {
    collection
        .iter()
        .find(|entity| entity.id() == id)
        .map_or(Lookup::NotFound, Lookup::Found)
}

/// Name of the category, "Uncategorized" when no id is set and "Unknown" when
/// the id is not in the collection.
pub fn category_name<'a>(categories: &'a [Category], id: Option<&str>) -> &'a str {
    match id {
        None => UNCATEGORIZED_LABEL,
        Some(id) => find(categories, id).map_or(UNKNOWN_LABEL, |c| c.name.as_str()),
    }
}

pub fn category_color<'a>(categories: &'a [Category], id: Option<&str>) -> &'a str {
    match id {
        None => NEUTRAL_COLOR,
        Some(id) => find(categories, id).map_or(NEUTRAL_COLOR, |c| c.color.as_str()),
    }
}

pub fn account_name<'a>(accounts: &'a [Account], id: &str) -> &'a str {
    find(accounts, id).map_or(UNKNOWN_LABEL, |a| a.name.as_str())
}

pub fn account_currency<'a>(accounts: &'a [Account], id: &str, fallback: &'a str) -> &'a str {
    find(accounts, id).map_or(fallback, |a| a.currency.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::CategoryType;
    use crate::core::models::fixtures::{account, category};
    use rust_decimal::Decimal;

    #[test]
    fn test_find_returns_sum_type() {
        let categories = vec![category("cat-1", "Food", CategoryType::Expense)];
        assert!(matches!(find(&categories, "cat-1"), Lookup::Found(c) if c.name == "Food"));
        assert_eq!(find(&categories, "cat-9"), Lookup::NotFound);
    }

    #[test]
    fn test_category_name_placeholders() {
        let categories = vec![category("cat-1", "Food", CategoryType::Expense)];
        assert_eq!(category_name(&categories, Some("cat-1")), "Food");
        assert_eq!(category_name(&categories, Some("missing")), UNKNOWN_LABEL);
        assert_eq!(category_name(&categories, None), UNCATEGORIZED_LABEL);
        assert_eq!(category_name(&[], Some("cat-1")), UNKNOWN_LABEL);
    }

    #[test]
    fn test_category_color_falls_back_to_neutral() {
        let categories = vec![category("cat-1", "Food", CategoryType::Expense)];
        assert_eq!(category_color(&categories, Some("cat-1")), "#10B981");
        assert_eq!(category_color(&categories, Some("missing")), NEUTRAL_COLOR);
        assert_eq!(category_color(&categories, None), NEUTRAL_COLOR);
    }

    #[test]
    fn test_account_resolution() {
        let accounts = vec![account("acc-1", Decimal::from(10), false)];
        assert_eq!(account_name(&accounts, "acc-1"), "Account acc-1");
        assert_eq!(account_name(&accounts, "acc-2"), UNKNOWN_LABEL);
        assert_eq!(account_currency(&accounts, "acc-1", "USD"), "EUR");
        assert_eq!(account_currency(&accounts, "acc-2", "USD"), "USD");
    }
}
