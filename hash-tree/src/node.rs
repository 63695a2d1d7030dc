//! Underlying node representation for the trees.
use std::{fmt, hash::BuildHasherDefault, mem};

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::{
    combinations::{binomial, for_each_completion, pickable},
    item_set::write_itemset,
    HashTree, Item, TreeConfig,
};

/// Complete itemsets and their frequencies, in insertion order.
pub(crate) type Bucket = IndexMap<Box<[Item]>, u64, BuildHasherDefault<FxHasher>>;

type Slots = Box<[Option<Box<Node>>]>;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// Depth from the root, which is also the number of items already hashed
    /// on to reach this node.
    level: usize,
    kind: Kind,
}

#[derive(Clone, Debug)]
enum Kind {
    Bucket(Bucket),
    Hash(Slots),
}

fn empty_slots(children_per_node: usize) -> Slots {
    std::iter::repeat_with(|| None)
        .take(children_per_node)
        .collect()
}

/// Bump `items` if it is already in the bucket, otherwise insert it with
/// `frequency`.
fn merge(bucket: &mut Bucket, items: &[Item], frequency: u64) {
    match bucket.get_mut(items) {
        Some(existing) => *existing += 1,
        None => {
            bucket.insert(items.into(), frequency);
        }
    }
}

impl Node {
    pub(crate) fn bucket(level: usize) -> Node {
        Node {
            level,
            kind: Kind::Bucket(Bucket::default()),
        }
    }

    pub(crate) fn hash(level: usize, children_per_node: usize) -> Node {
        Node {
            level,
            kind: Kind::Hash(empty_slots(children_per_node)),
        }
    }

    pub(crate) fn has_children(&self) -> bool {
        match &self.kind {
            Kind::Bucket(_) => false,
            Kind::Hash(children) => children.iter().any(Option::is_some),
        }
    }

    /// Add every k-combination that extends `chosen` with items from
    /// `remaining`.
    pub(crate) fn add(&mut self, chosen: &mut Vec<Item>, remaining: &[Item], config: &TreeConfig) {
        debug_assert!(chosen.len() + remaining.len() >= config.k);
        if chosen.len() == config.k {
            self.place(chosen, 0, config);
            return;
        }
        if let Kind::Bucket(bucket) = &mut self.kind {
            let pending = binomial(remaining.len(), config.k - chosen.len());
            if (bucket.len() as u64).saturating_add(pending) <= config.max_bucket_size as u64 {
                for_each_completion(chosen, remaining, config.k, &mut |items| {
                    merge(bucket, items, 0);
                    true
                });
                return;
            }
            self.convert_to_hash(config);
        }

        let level = self.level;
        if let Kind::Hash(children) = &mut self.kind {
            for i in pickable(chosen.len(), remaining.len(), config.k) {
                let item = &remaining[i];
                let child = children[item.slot(config.children_per_node)]
                    .get_or_insert_with(|| Box::new(Node::bucket(level + 1)));
                chosen.push(item.clone());
                child.add(chosen, &remaining[i + 1..], config);
                chosen.pop();
            }
        }
    }

    /// Route a complete itemset by its item at each level until it reaches a
    /// bucket, then merge it there.
    fn place(&mut self, items: &[Item], frequency: u64, config: &TreeConfig) {
        let level = self.level;
        match &mut self.kind {
            Kind::Bucket(bucket) => merge(bucket, items, frequency),
            Kind::Hash(children) => children[items[level].slot(config.children_per_node)]
                .get_or_insert_with(|| Box::new(Node::bucket(level + 1)))
                .place(items, frequency, config),
        }
    }

    /// Turn this bucket into a hash node, pushing every itemset it held one
    /// level down with its frequency intact.
    fn convert_to_hash(&mut self, config: &TreeConfig) {
        let slots = empty_slots(config.children_per_node);
        let bucket = match mem::replace(&mut self.kind, Kind::Hash(slots)) {
            Kind::Bucket(bucket) => bucket,
            hash => {
                self.kind = hash;
                return;
            }
        };
        for (items, frequency) in bucket {
            self.place(&items, frequency, config);
        }
    }

    /// Increment every stored k-combination of `chosen` + `remaining`.
    pub(crate) fn count(&mut self, chosen: &mut Vec<Item>, remaining: &[Item], config: &TreeConfig) {
        match &mut self.kind {
            Kind::Bucket(bucket) => {
                for_each_completion(chosen, remaining, config.k, &mut |items| {
                    if let Some(frequency) = bucket.get_mut(items) {
                        *frequency += 1;
                    }
                    true
                });
            }
            Kind::Hash(children) => {
                for i in pickable(chosen.len(), remaining.len(), config.k) {
                    let item = &remaining[i];
                    if let Some(child) = &mut children[item.slot(config.children_per_node)] {
                        chosen.push(item.clone());
                        child.count(chosen, &remaining[i + 1..], config);
                        chosen.pop();
                    }
                }
            }
        }
    }

    /// Read-only twin of [`Node::count`]: calls `f` on every stored
    /// k-combination of `chosen` + `remaining`.
    pub(crate) fn for_each_match(
        &self,
        chosen: &mut Vec<Item>,
        remaining: &[Item],
        config: &TreeConfig,
        f: &mut impl FnMut(&[Item]),
    ) {
        match &self.kind {
            Kind::Bucket(bucket) => {
                for_each_completion(chosen, remaining, config.k, &mut |items| {
                    if bucket.contains_key(items) {
                        f(items);
                    }
                    true
                });
            }
            Kind::Hash(children) => {
                for i in pickable(chosen.len(), remaining.len(), config.k) {
                    let item = &remaining[i];
                    if let Some(child) = &children[item.slot(config.children_per_node)] {
                        chosen.push(item.clone());
                        child.for_each_match(chosen, &remaining[i + 1..], config, f);
                        chosen.pop();
                    }
                }
            }
        }
    }

    /// Whether every k-combination of `chosen` + `remaining` is stored in
    /// this subtree.
    pub(crate) fn contains_all(
        &self,
        chosen: &mut Vec<Item>,
        remaining: &[Item],
        config: &TreeConfig,
    ) -> bool {
        match &self.kind {
            Kind::Bucket(bucket) => {
                for_each_completion(chosen, remaining, config.k, &mut |items| {
                    bucket.contains_key(items)
                })
            }
            Kind::Hash(children) => {
                for i in pickable(chosen.len(), remaining.len(), config.k) {
                    let item = &remaining[i];
                    let Some(child) = &children[item.slot(config.children_per_node)] else {
                        return false;
                    };
                    chosen.push(item.clone());
                    let present = child.contains_all(chosen, &remaining[i + 1..], config);
                    chosen.pop();
                    if !present {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Drop itemsets below `min_support`. Returns true if nothing is left and
    /// the node should be detached.
    pub(crate) fn remove_below(&mut self, min_support: u64) -> bool {
        self.retain(&mut |_, frequency| frequency >= min_support)
    }

    /// Drop itemsets with a (k-1)-subset missing from `previous`. Returns true
    /// if nothing is left and the node should be detached.
    pub(crate) fn prune(&mut self, previous: &HashTree) -> bool {
        self.retain(&mut |items, _| previous.subsets_present(items))
    }

    fn retain(&mut self, keep: &mut impl FnMut(&[Item], u64) -> bool) -> bool {
        match &mut self.kind {
            Kind::Bucket(bucket) => {
                bucket.retain(|items, frequency| keep(&items[..], *frequency));
                bucket.is_empty()
            }
            Kind::Hash(children) => {
                let mut empty = true;
                for slot in children.iter_mut() {
                    let detach = match slot {
                        Some(child) => child.retain(keep),
                        None => continue,
                    };
                    if detach {
                        *slot = None;
                    } else {
                        empty = false;
                    }
                }
                empty
            }
        }
    }

    /// The frequency slot of one complete itemset, found by routing on its
    /// items.
    pub(crate) fn frequency_mut(&mut self, items: &[Item], config: &TreeConfig) -> Option<&mut u64> {
        match &mut self.kind {
            Kind::Bucket(bucket) => bucket.get_mut(items),
            Kind::Hash(children) => children[items.get(self.level)?.slot(config.children_per_node)]
                .as_mut()?
                .frequency_mut(items, config),
        }
    }

    pub(crate) fn frequency(&self, items: &[Item], config: &TreeConfig) -> Option<u64> {
        match &self.kind {
            Kind::Bucket(bucket) => bucket.get(items).copied(),
            Kind::Hash(children) => children[items.get(self.level)?.slot(config.children_per_node)]
                .as_ref()?
                .frequency(items, config),
        }
    }

    /// Visit every stored itemset, depth first by slot index and in insertion
    /// order within a bucket.
    pub(crate) fn for_each(&self, f: &mut impl FnMut(&[Item], u64)) {
        match &self.kind {
            Kind::Bucket(bucket) => {
                for (items, frequency) in bucket {
                    f(&items[..], *frequency);
                }
            }
            Kind::Hash(children) => {
                for child in children.iter().flatten() {
                    child.for_each(f);
                }
            }
        }
    }

    pub(crate) fn for_each_frequency_mut(&mut self, f: &mut impl FnMut(&mut u64)) {
        match &mut self.kind {
            Kind::Bucket(bucket) => bucket.values_mut().for_each(|frequency| f(frequency)),
            Kind::Hash(children) => {
                for child in children.iter_mut().flatten() {
                    child.for_each_frequency_mut(f);
                }
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        match &self.kind {
            Kind::Bucket(bucket) => bucket.len(),
            Kind::Hash(children) => children.iter().flatten().map(|child| child.len()).sum(),
        }
    }

    /// Write this subtree as an ASCII tree. `indent` holds the prefix of the
    /// current depth and is restored before returning.
    pub(crate) fn render(&self, f: &mut impl fmt::Write, indent: &mut String) -> fmt::Result {
        match &self.kind {
            Kind::Bucket(bucket) => {
                for (items, frequency) in bucket {
                    write!(f, " ")?;
                    write_itemset(f, items, *frequency)?;
                }
                writeln!(f)
            }
            Kind::Hash(children) => {
                writeln!(f, " #")?;
                for (i, child) in children.iter().enumerate() {
                    let Some(child) = child else { continue };
                    // only the adjacent slot decides whether the rail continues
                    let next_occupied = children.get(i + 1).map_or(false, Option::is_some);
                    write!(f, "{indent} `--")?;
                    let depth = indent.len();
                    indent.push_str(if next_occupied { " |  " } else { "    " });
                    child.render(f, indent)?;
                    indent.truncate(depth);
                }
                Ok(())
            }
        }
    }
}
