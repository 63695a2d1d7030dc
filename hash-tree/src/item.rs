//! The atomic values transactions are made of.
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use rustc_hash::FxHasher;

use crate::{Error, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Integer,
    Text,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Integer => write!(f, "integer"),
            ItemKind::Text => write!(f, "text"),
        }
    }
}

/// A single item. Integers order numerically and text lexicographically.
///
/// The derived `Ord` also places every integer before every text item so that
/// items can be sorted at all, but that cross-kind order carries no meaning:
/// itemsets refuse to hold both kinds, and [`Item::compare`] reports the
/// mismatch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Item {
    Integer(i64),
    Text(Arc<str>),
}

impl Item {
    /// Reads a token the way the transaction scanner does: anything that
    /// parses as an `i64` is an integer, everything else is text.
    pub fn parse(token: &str) -> Item {
        match token.parse::<i64>() {
            Ok(i) => Item::Integer(i),
            Err(_) => Item::Text(token.into()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Integer(_) => ItemKind::Integer,
            Item::Text(_) => ItemKind::Text,
        }
    }

    pub fn compare(&self, other: &Item) -> Result<Ordering> {
        if self.kind() != other.kind() {
            return Err(Error::TypeMismatch {
                expected: self.kind(),
                found: other.kind(),
            });
        }
        Ok(self.cmp(other))
    }

    /// The number the tree hashes on: the integer itself, or the FxHash of
    /// the text. FxHash is unseeded, so this is stable from run to run.
    pub fn hash_key(&self) -> u64 {
        match self {
            Item::Integer(i) => *i as u64,
            Item::Text(s) => {
                let mut hasher = FxHasher::default();
                s.hash(&mut hasher);
                hasher.finish()
            }
        }
    }

    /// The child slot this item routes to. Negative integers wrap around, so
    /// `-4` lands in slot 2 of 3.
    pub(crate) fn slot(&self, children_per_node: usize) -> usize {
        match self {
            Item::Integer(i) => i.rem_euclid(children_per_node as i64) as usize,
            Item::Text(_) => (self.hash_key() % children_per_node as u64) as usize,
        }
    }
}

impl From<i64> for Item {
    fn from(i: i64) -> Item {
        Item::Integer(i)
    }
}

impl From<i32> for Item {
    fn from(i: i32) -> Item {
        Item::Integer(i.into())
    }
}

impl From<&str> for Item {
    fn from(s: &str) -> Item {
        Item::Text(s.into())
    }
}

impl From<String> for Item {
    fn from(s: String) -> Item {
        Item::Text(s.into())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Integer(i) => write!(f, "{i}"),
            Item::Text(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tokens() {
        assert_eq!(Item::parse("42"), Item::Integer(42));
        assert_eq!(Item::parse("-7"), Item::Integer(-7));
        assert_eq!(Item::parse("milk"), Item::from("milk"));
        assert_eq!(Item::parse("4.5"), Item::from("4.5"));
    }

    #[test]
    fn compare_same_kind() {
        assert_eq!(Item::from(1).compare(&Item::from(2)), Ok(Ordering::Less));
        assert_eq!(
            Item::from("pear").compare(&Item::from("apple")),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn compare_mixed_kinds() {
        assert_eq!(
            Item::from(1).compare(&Item::from("1")),
            Err(Error::TypeMismatch {
                expected: ItemKind::Integer,
                found: ItemKind::Text,
            })
        );
    }

    #[test]
    fn slots_are_stable() {
        assert_eq!(Item::from(7).slot(3), 1);
        assert_eq!(Item::from(9).slot(3), 0);
        let bread = Item::from("bread");
        assert_eq!(bread.slot(5), Item::from("bread").slot(5));
        assert_eq!(Item::from(-4).slot(3), 2);
        assert_eq!(Item::from(-3).slot(3), 0);
        assert_eq!(Item::from(i64::MIN).slot(7), i64::MIN.rem_euclid(7) as usize);
    }
}
