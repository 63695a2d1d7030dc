//! Hash trees of itemsets, and the Apriori frequent-itemset miner built on
//! top of them.
//!
//! # Hash trees
//! A [`HashTree`] stores the candidate itemsets of a single size `k`. Interior
//! nodes hash one item of the itemset being routed (the item at the node's
//! depth) to pick one of `children_per_node` child slots; leaves are buckets
//! holding itemsets together with their frequency counts.
//!
//! Buckets are bounded by `max_bucket_size`. When adding to a bucket would
//! overflow it and there are still items left to hash on, the bucket is
//! converted in place to a hash node and its contents are redistributed one
//! level deeper. Buckets at depth `k` have nothing left to hash on and accept
//! any number of itemsets.
//!
//! Adding a transaction to a tree adds every k-combination of its items, but
//! combinations are only materialized once they reach a bucket: hash nodes
//! route on the next chosen item and only enumerate the choices that can
//! still complete to `k` items. Counting a transaction against a tree walks
//! the same routes without creating anything.
//!
//! # Mining
//! [`Apriori::mine`] runs the usual level-wise loop: count the 1-itemsets,
//! then repeatedly self-join the frequent k-itemsets into (k+1)-candidates,
//! drop candidates with an infrequent k-subset, count the survivors and drop
//! those below the minimum support. Every level's tree is kept.
//!
//! Items are either integers or text, and a single mining run must not mix
//! the two; mixed inputs are rejected with [`Error::TypeMismatch`] before any
//! tree is built.

pub(crate) mod apriori;
pub(crate) mod combinations;
pub(crate) mod error;
pub(crate) mod item;
pub(crate) mod item_set;
pub(crate) mod node;
pub(crate) mod tree;
#[cfg(test)]
pub(crate) mod test_workloads;

pub use apriori::{Apriori, AprioriOptions, CHILDREN_PER_NODE_DEFAULT, MAX_BUCKET_SIZE_DEFAULT};
pub use error::{Error, Result};
pub use item::{Item, ItemKind};
pub use item_set::ItemSet;
pub use tree::{HashTree, TreeConfig};
