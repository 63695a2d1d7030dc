//! Hash trees holding the candidate or frequent itemsets of one size.
use std::fmt;

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::{node::Node, Error, Item, ItemSet, Result};


/// Parameters shared by every node of a tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Size of the itemsets stored in the tree.
    pub k: usize,
    /// Absolute number of transactions an itemset must occur in to survive
    /// [`HashTree::remove_below_min_support`].
    pub min_support: u64,
    /// Itemsets a bucket may hold before it is split, unless it sits at
    /// depth `k`.
    pub max_bucket_size: usize,
    pub children_per_node: usize,
}

impl TreeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidArgument("itemset size must be at least 1".into()));
        }
        if self.min_support == 0 {
            return Err(Error::InvalidArgument("minimum support must be positive".into()));
        }
        if self.max_bucket_size == 0 {
            return Err(Error::InvalidArgument("maximum bucket size must be positive".into()));
        }
        if self.children_per_node == 0 {
            return Err(Error::InvalidArgument("children per node must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct HashTree {
    root: Node,
    config: TreeConfig,
}

impl HashTree {
    pub fn new(
        k: usize,
        min_support: u64,
        max_bucket_size: usize,
        children_per_node: usize,
    ) -> Result<HashTree> {
        HashTree::with_config(TreeConfig {
            k,
            min_support,
            max_bucket_size,
            children_per_node,
        })
    }

    pub fn with_config(config: TreeConfig) -> Result<HashTree> {
        config.validate()?;
        Ok(HashTree {
            root: Node::hash(0, config.children_per_node),
            config,
        })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn k(&self) -> usize {
        self.config.k
    }

    /// True when the root has no children left.
    pub fn is_empty(&self) -> bool {
        !self.root.has_children()
    }

    /// The number of itemsets stored.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Add every k-combination of `transaction`. Combinations already present
    /// have their frequency bumped; new ones start at 0.
    pub fn insert(&mut self, transaction: &ItemSet) {
        if transaction.len() >= self.config.k {
            let mut chosen = Vec::with_capacity(self.config.k);
            self.root.add(&mut chosen, transaction.items(), &self.config);
        }
    }

    pub fn insert_all<'a>(&mut self, transactions: impl IntoIterator<Item = &'a ItemSet>) {
        for transaction in transactions {
            self.insert(transaction);
        }
    }

    /// Increment the frequency of every stored itemset contained in
    /// `transaction`.
    pub fn count(&mut self, transaction: &ItemSet) {
        if transaction.len() >= self.config.k {
            let mut chosen = Vec::with_capacity(self.config.k);
            self.root.count(&mut chosen, transaction.items(), &self.config);
        }
    }

    pub fn count_all<'a>(&mut self, transactions: impl IntoIterator<Item = &'a ItemSet>) {
        for transaction in transactions {
            self.count(transaction);
        }
    }

    /// Same result as [`HashTree::count_all`]. Transactions are matched
    /// against the tree in parallel, each rayon job tallying into its own map;
    /// the merged tallies are applied afterwards.
    pub fn count_all_par(&mut self, transactions: &[ItemSet]) {
        let k = self.config.k;
        let tallies = {
            let tree = &*self;
            transactions
                .par_iter()
                .filter(|transaction| transaction.len() >= k)
                .fold(FxHashMap::<Box<[Item]>, u64>::default, |mut tally, transaction| {
                    let mut chosen = Vec::with_capacity(k);
                    tree.root.for_each_match(
                        &mut chosen,
                        transaction.items(),
                        &tree.config,
                        &mut |items| *tally.entry(items.into()).or_insert(0) += 1,
                    );
                    tally
                })
                .reduce(FxHashMap::default, |mut left, right| {
                    for (items, n) in right {
                        *left.entry(items).or_insert(0) += n;
                    }
                    left
                })
        };
        for (items, n) in tallies {
            if let Some(frequency) = self.root.frequency_mut(&items, &self.config) {
                *frequency += n;
            }
        }
    }

    /// Drop every itemset occurring in fewer than `min_support` transactions.
    /// Returns true if the tree is now empty.
    pub fn remove_below_min_support(&mut self) -> bool {
        self.root.remove_below(self.config.min_support)
    }

    /// Drop every candidate with a (k-1)-subset missing from `previous`, the
    /// tree of frequent (k-1)-itemsets. Returns true if the tree is now empty.
    pub fn prune(&mut self, previous: &HashTree) -> Result<bool> {
        if previous.k() + 1 != self.k() {
            return Err(Error::InvalidArgument(format!(
                "pruning a tree of {}-itemsets needs the tree of {}-itemsets, got {}-itemsets",
                self.k(),
                self.k() - 1,
                previous.k()
            )));
        }
        Ok(self.root.prune(previous))
    }

    /// Whether every k-item subset of `itemset` is stored in this tree.
    pub fn are_all_subsets_frequent(&self, itemset: &ItemSet) -> bool {
        self.subsets_present(itemset.items())
    }

    pub(crate) fn subsets_present(&self, items: &[Item]) -> bool {
        let mut chosen = Vec::with_capacity(self.config.k);
        self.root.contains_all(&mut chosen, items, &self.config)
    }

    /// Self-join: build the (k+1)-candidate tree from every pair of stored
    /// itemsets agreeing on their first k-1 items.
    pub fn generate_next_candidate_tree(&self) -> HashTree {
        let itemsets = self.flatten();
        let candidates: Vec<ItemSet> = (0..itemsets.len())
            .flat_map(|i| self.join_from(&itemsets, i))
            .collect();
        self.candidate_tree(&candidates)
    }

    /// Same result as [`HashTree::generate_next_candidate_tree`], with the
    /// pairs enumerated on rayon. Candidates keep their sequential order.
    pub fn generate_next_candidate_tree_par(&self) -> HashTree {
        let itemsets = self.flatten();
        let candidates: Vec<ItemSet> = (0..itemsets.len())
            .into_par_iter()
            .flat_map_iter(|i| self.join_from(&itemsets, i))
            .collect();
        self.candidate_tree(&candidates)
    }

    /// The joins of `itemsets[i]` with every later itemset sharing its prefix.
    fn join_from<'a>(
        &self,
        itemsets: &'a [ItemSet],
        i: usize,
    ) -> impl Iterator<Item = ItemSet> + 'a {
        let prefix = self.config.k - 1;
        let first = &itemsets[i];
        itemsets[i + 1..]
            .iter()
            .filter(move |second| first.items()[..prefix] == second.items()[..prefix])
            .map(move |second| first.joined(second))
    }

    fn candidate_tree(&self, candidates: &[ItemSet]) -> HashTree {
        let mut next = HashTree {
            root: Node::hash(0, self.config.children_per_node),
            config: TreeConfig {
                k: self.config.k + 1,
                ..self.config
            },
        };
        next.insert_all(candidates);
        next
    }

    /// Every stored itemset with its frequency, depth first by child slot and
    /// in insertion order within each bucket.
    pub fn flatten(&self) -> Vec<ItemSet> {
        let mut itemsets = Vec::new();
        self.root.for_each(&mut |items, frequency| {
            itemsets.push(ItemSet::from_sorted(items.to_vec(), frequency))
        });
        itemsets
    }

    pub fn increment_all_frequencies(&mut self) {
        self.root.for_each_frequency_mut(&mut |frequency| *frequency += 1);
    }

    /// The frequency of exactly `items`, if the tree holds it. `items` must be
    /// sorted.
    pub fn frequency_of(&self, items: &[Item]) -> Option<u64> {
        if items.len() != self.config.k {
            return None;
        }
        self.root.frequency(items, &self.config)
    }
}

impl fmt::Display for HashTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.render(f, &mut String::new())
    }
}
