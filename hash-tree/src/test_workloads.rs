use std::collections::BTreeMap;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Item, ItemSet};

pub(crate) fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(crate) fn ints(ids: &[i64]) -> Vec<Item> {
    ids.iter().copied().map(Item::from).collect()
}

pub(crate) fn transactions(rows: &[&[i64]]) -> Vec<ItemSet> {
    rows.iter()
        .map(|row| ItemSet::from_items(row.iter().copied()).unwrap())
        .collect()
}

/// `n` transactions over the items `0..universe`, each holding up to
/// `max_len` distinct items. Some come out empty.
pub(crate) fn random_transactions(
    rng: &mut impl Rng,
    n: usize,
    universe: i64,
    max_len: usize,
) -> Vec<ItemSet> {
    (0..n)
        .map(|_| {
            let len = rng.gen_range(0..=max_len);
            let mut set = ItemSet::new();
            while set.len() < len.min(universe as usize) {
                set.add(Item::from(rng.gen_range(0..universe))).unwrap();
            }
            set
        })
        .collect()
}

/// Itemsets with their frequencies, in a canonical order.
pub(crate) fn sorted(itemsets: impl IntoIterator<Item = ItemSet>) -> Vec<(Vec<Item>, u64)> {
    let mut out: Vec<_> = itemsets
        .into_iter()
        .map(|set| (set.items().to_vec(), set.frequency()))
        .collect();
    out.sort();
    out
}

/// Every itemset occurring in at least `min_support` transactions, found by
/// counting all subsets of every transaction.
pub(crate) fn brute_force_frequent(
    transactions: &[ItemSet],
    min_support: u64,
) -> Vec<(Vec<Item>, u64)> {
    let mut oracle = BTreeMap::<Vec<Item>, u64>::new();
    for transaction in transactions {
        let items = transaction.items();
        assert!(items.len() < 20, "transaction too large to enumerate");
        for mask in 1u32..(1 << items.len()) {
            let subset: Vec<Item> = items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, item)| item.clone())
                .collect();
            *oracle.entry(subset).or_insert(0) += 1;
        }
    }
    oracle
        .into_iter()
        .filter(|(_, frequency)| *frequency >= min_support)
        .collect()
}

/// How many transactions contain every item of `items`.
pub(crate) fn support(transactions: &[ItemSet], items: &[Item]) -> u64 {
    transactions
        .iter()
        .filter(|t| items.iter().all(|item| t.contains(item)))
        .count() as u64
}
