use std::time::Instant;

use crate::{Error, HashTree, ItemSet, Result, TreeConfig};

pub const MAX_BUCKET_SIZE_DEFAULT: usize = 5;
pub const CHILDREN_PER_NODE_DEFAULT: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AprioriOptions {
    /// Absolute number of transactions a frequent itemset occurs in.
    pub min_support: u64,
    pub max_bucket_size: usize,
    pub children_per_node: usize,
    /// Join and count candidates with [`HashTree::generate_next_candidate_tree_par`]
    /// and [`HashTree::count_all_par`].
    pub parallel: bool,
}

impl AprioriOptions {
    pub fn new(min_support: u64) -> AprioriOptions {
        AprioriOptions {
            min_support,
            max_bucket_size: MAX_BUCKET_SIZE_DEFAULT,
            children_per_node: CHILDREN_PER_NODE_DEFAULT,
            parallel: false,
        }
    }

    fn tree_config(&self, k: usize) -> TreeConfig {
        TreeConfig {
            k,
            min_support: self.min_support,
            max_bucket_size: self.max_bucket_size,
            children_per_node: self.children_per_node,
        }
    }
}

/// The outcome of one mining run: the tree of frequent k-itemsets for
/// `k = 1, 2, ...`, up to and including the first empty level.
#[derive(Clone, Debug)]
pub struct Apriori {
    trees: Vec<HashTree>,
}

impl Apriori {
    pub fn mine(transactions: &[ItemSet], options: &AprioriOptions) -> Result<Apriori> {
        check_single_kind(transactions)?;
        let config = options.tree_config(1);
        config.validate()?;

        if transactions.iter().all(ItemSet::is_empty) {
            log::warn!("No items in {} transactions, nothing to mine", transactions.len());
        }

        let start = Instant::now();
        let mut current = HashTree::with_config(config)?;
        current.insert_all(transactions);
        current.increment_all_frequencies();
        let candidates = current.len();
        current.remove_below_min_support();
        log::info!(
            "k=1: {} candidates, {} frequent in {:?}",
            candidates,
            current.len(),
            start.elapsed()
        );

        let mut trees = vec![];
        while !current.is_empty() {
            let start = Instant::now();
            let mut next = if options.parallel {
                current.generate_next_candidate_tree_par()
            } else {
                current.generate_next_candidate_tree()
            };
            let k = next.k();
            let candidates = next.len();
            next.prune(&current)?;
            let pruned = next.len();
            if options.parallel {
                next.count_all_par(transactions);
            } else {
                next.count_all(transactions);
            }
            next.remove_below_min_support();
            log::info!(
                "k={}: {} candidates, {} after pruning, {} frequent in {:?}",
                k,
                candidates,
                pruned,
                next.len(),
                start.elapsed()
            );
            trees.push(current);
            current = next;
        }
        trees.push(current);
        log::debug!(
            "Recorded {} levels, {} frequent itemsets",
            trees.len(),
            trees.iter().map(HashTree::len).sum::<usize>()
        );

        Ok(Apriori { trees })
    }

    /// Every recorded tree, level 1 first. The last one is empty.
    pub fn trees(&self) -> &[HashTree] {
        &self.trees
    }

    pub fn levels(&self) -> usize {
        self.trees.len()
    }

    /// The frequent itemsets of size `k`; empty past the last level.
    pub fn frequent_k_itemsets(&self, k: usize) -> Vec<ItemSet> {
        k.checked_sub(1)
            .and_then(|i| self.trees.get(i))
            .map(HashTree::flatten)
            .unwrap_or_default()
    }

    pub fn all_frequent_itemsets(&self) -> Vec<ItemSet> {
        self.trees.iter().flat_map(HashTree::flatten).collect()
    }
}

fn check_single_kind(transactions: &[ItemSet]) -> Result<()> {
    let mut kinds = transactions.iter().filter_map(ItemSet::kind);
    if let Some(expected) = kinds.next() {
        if let Some(found) = kinds.find(|&kind| kind != expected) {
            return Err(Error::TypeMismatch { expected, found });
        }
    }
    Ok(())
}
