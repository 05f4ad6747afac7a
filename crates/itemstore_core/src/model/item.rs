//! Item domain model and query/update parameter objects.
//!
//! # Responsibility
//! - Define the stored `Item` record and its pre-persistence form `NewItem`.
//! - Own the search-filter semantics shared by every backend.
//!
//! # Invariants
//! - `id` is assigned exactly once by a repository and never changes.
//! - A blank `item_name` filter means "no name constraint".
//! - Values are not range-checked: negative price/quantity are accepted.

use serde::{Deserialize, Serialize};

/// Store-assigned item identifier. Always positive once assigned.
pub type ItemId = i64;

/// Item as persisted by a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Display and search field. Storage length guidance is 10 chars.
    pub item_name: String,
    pub price: i64,
    pub quantity: i64,
}

impl Item {
    /// Builds the stored form of `new_item` under the store-assigned `id`.
    pub fn from_new(id: ItemId, new_item: &NewItem) -> Self {
        Self {
            id,
            item_name: new_item.item_name.clone(),
            price: new_item.price,
            quantity: new_item.quantity,
        }
    }

    /// Overwrites every mutable field from `params`. `id` stays untouched.
    pub fn apply_update(&mut self, params: &ItemUpdateParams) {
        self.item_name = params.item_name.clone();
        self.price = params.price;
        self.quantity = params.quantity;
    }
}

/// Item that has not been saved yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub item_name: String,
    pub price: i64,
    pub quantity: i64,
}

impl NewItem {
    pub fn new(item_name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            item_name: item_name.into(),
            price,
            quantity,
        }
    }
}

/// Optional filters for `find_all`.
///
/// Each field is independent; `None` means no constraint on that attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSearchCond {
    /// Case-sensitive substring the item name must contain.
    pub item_name: Option<String>,
    /// Inclusive upper bound on price.
    pub max_price: Option<i64>,
}

impl ItemSearchCond {
    pub fn new(item_name: Option<&str>, max_price: Option<i64>) -> Self {
        Self {
            item_name: item_name.map(str::to_string),
            max_price,
        }
    }

    /// Returns the name filter only when it carries non-whitespace text.
    ///
    /// The returned slice is not trimmed: `" A"` still requires the leading
    /// space to match.
    pub fn name_filter(&self) -> Option<&str> {
        self.item_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Returns whether no effective constraint is set.
    pub fn is_unconstrained(&self) -> bool {
        self.name_filter().is_none() && self.max_price.is_none()
    }

    /// Evaluates both predicates against one item.
    pub fn matches(&self, item: &Item) -> bool {
        let name_ok = self
            .name_filter()
            .map_or(true, |name| item.item_name.contains(name));
        let price_ok = self.max_price.map_or(true, |max| item.price <= max);
        name_ok && price_ok
    }
}

/// Full replacement values for `update`.
///
/// Partial updates are not supported: all three fields are always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdateParams {
    pub item_name: String,
    pub price: i64,
    pub quantity: i64,
}

impl ItemUpdateParams {
    pub fn new(item_name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            item_name: item_name.into(),
            price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Item, ItemSearchCond, ItemUpdateParams, NewItem};

    fn item(id: i64, name: &str, price: i64) -> Item {
        Item::from_new(id, &NewItem::new(name, price, 1))
    }

    #[test]
    fn blank_name_filter_is_treated_as_absent() {
        for blank in ["", "   ", "\t\n"] {
            let cond = ItemSearchCond::new(Some(blank), None);
            assert_eq!(cond.name_filter(), None);
            assert!(cond.is_unconstrained());
        }
    }

    #[test]
    fn name_filter_keeps_surrounding_whitespace() {
        let cond = ItemSearchCond::new(Some(" A"), None);
        assert_eq!(cond.name_filter(), Some(" A"));
        assert!(!cond.matches(&item(1, "itemA", 10)));
        assert!(cond.matches(&item(2, "item A", 10)));
    }

    #[test]
    fn matches_combines_predicates_with_and() {
        let cond = ItemSearchCond::new(Some("itemA"), Some(10_000));
        assert!(cond.matches(&item(1, "itemA-1", 10_000)));
        assert!(!cond.matches(&item(2, "itemA-2", 20_000)));
        assert!(!cond.matches(&item(3, "itemB-1", 5_000)));
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let cond = ItemSearchCond::new(Some("itema"), None);
        assert!(!cond.matches(&item(1, "itemA-1", 10)));
    }

    #[test]
    fn apply_update_overwrites_all_fields_but_id() {
        let mut stored = item(7, "old", 100);
        stored.apply_update(&ItemUpdateParams::new("new", 200, 3));
        assert_eq!(stored.id, 7);
        assert_eq!(stored.item_name, "new");
        assert_eq!(stored.price, 200);
        assert_eq!(stored.quantity, 3);
    }
}
