use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{Error, Item, ItemKind, Result};

/// A sorted, duplicate-free set of items of a single kind, plus the number of
/// times it has been seen.
///
/// Equality and hashing only look at the items.
#[derive(Clone, Debug, Default)]
pub struct ItemSet {
    items: Vec<Item>,
    frequency: u64,
}

impl ItemSet {
    pub fn new() -> ItemSet {
        ItemSet::default()
    }

    pub fn from_items<I>(items: impl IntoIterator<Item = I>) -> Result<ItemSet>
    where
        I: Into<Item>,
    {
        let mut set = ItemSet::new();
        for item in items {
            set.add(item.into())?;
        }
        Ok(set)
    }

    /// `items` must already be sorted, deduplicated and of a single kind.
    pub(crate) fn from_sorted(items: Vec<Item>, frequency: u64) -> ItemSet {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(items.windows(2).all(|w| w[0].kind() == w[1].kind()));
        ItemSet { items, frequency }
    }

    /// Insert `item`, keeping the set sorted. Returns whether the item was
    /// new.
    pub fn add(&mut self, item: Item) -> Result<bool> {
        if let Some(expected) = self.kind() {
            if expected != item.kind() {
                return Err(Error::TypeMismatch {
                    expected,
                    found: item.kind(),
                });
            }
        }
        match self.items.binary_search(&item) {
            Ok(_) => Ok(false),
            Err(index) => {
                self.items.insert(index, item);
                Ok(true)
            }
        }
    }

    /// The kind shared by every item, or `None` for the empty set.
    pub fn kind(&self) -> Option<ItemKind> {
        self.items.first().map(Item::kind)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Item> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&Item> {
        self.items.last()
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.binary_search(item).is_ok()
    }

    pub fn is_subset_of(&self, other: &ItemSet) -> bool {
        is_sorted_subset(&self.items, &other.items)
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn increment_frequency(&mut self) {
        self.frequency += 1;
    }

    /// `self` extended with the last item of `other`. Both sets must share
    /// every item but their last.
    pub(crate) fn joined(&self, other: &ItemSet) -> ItemSet {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend_from_slice(&self.items);
        if let Some(last) = other.last() {
            if let Err(index) = items.binary_search(last) {
                items.insert(index, last.clone());
            }
        }
        ItemSet::from_sorted(items, 0)
    }
}

/// Whether every element of `small` appears in `large`; both must be sorted.
pub(crate) fn is_sorted_subset(small: &[Item], large: &[Item]) -> bool {
    let mut large = large.iter();
    small
        .iter()
        .all(|needle| large.by_ref().any(|candidate| candidate == needle))
}

pub(crate) fn write_itemset(
    f: &mut impl fmt::Write,
    items: &[Item],
    frequency: u64,
) -> fmt::Result {
    write!(f, "{{")?;
    for item in items {
        write!(f, " {item}")?;
    }
    write!(f, " }}:{frequency}")
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &ItemSet) -> bool {
        self.items == other.items
    }
}

impl Eq for ItemSet {}

impl Hash for ItemSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.items.hash(state);
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for ItemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_itemset(f, &self.items, self.frequency)
    }
}
