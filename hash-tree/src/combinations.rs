use std::ops::Range;

use crate::Item;

/// `n` choose `k`, saturating at `u64::MAX`.
pub(crate) fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // exact: the product of i + 1 consecutive integers is divisible by (i + 1)!
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    acc as u64
}

/// Indices into `remaining` that can be chosen next and still leave enough
/// items after them to reach `k` chosen items.
pub(crate) fn pickable(chosen: usize, remaining: usize, k: usize) -> Range<usize> {
    debug_assert!(chosen < k);
    0..(remaining + chosen + 1).saturating_sub(k).min(remaining)
}

/// Calls `f` on every completion of `chosen` to `k` items drawn, in order,
/// from `remaining`. Stops as soon as `f` returns false, and returns whether
/// it ran to the end.
pub(crate) fn for_each_completion<F>(
    chosen: &mut Vec<Item>,
    remaining: &[Item],
    k: usize,
    f: &mut F,
) -> bool
where
    F: FnMut(&[Item]) -> bool,
{
    if chosen.len() == k {
        return f(chosen);
    }
    for i in pickable(chosen.len(), remaining.len(), k) {
        chosen.push(remaining[i].clone());
        let keep_going = for_each_completion(chosen, &remaining[i + 1..], k, f);
        chosen.pop();
        if !keep_going {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[i64]) -> Vec<Item> {
        ids.iter().copied().map(Item::from).collect()
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(5, 5), 1);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(60, 30), 118264581564861424);
        assert_eq!(binomial(200, 100), u64::MAX);
    }

    #[test]
    fn pickable_leaves_room() {
        assert_eq!(pickable(0, 4, 2), 0..3);
        assert_eq!(pickable(1, 2, 2), 0..2);
        assert_eq!(pickable(0, 1, 2), 0..0);
    }

    #[test]
    fn completions_in_order() {
        let mut seen = Vec::new();
        let mut chosen = items(&[1]);
        let complete = for_each_completion(&mut chosen, &items(&[2, 3, 4]), 3, &mut |c| {
            seen.push(c.to_vec());
            true
        });
        assert!(complete);
        assert_eq!(chosen, items(&[1]));
        assert_eq!(
            seen,
            vec![items(&[1, 2, 3]), items(&[1, 2, 4]), items(&[1, 3, 4])]
        );
    }

    #[test]
    fn completions_stop_early() {
        let mut calls = 0;
        let complete = for_each_completion(&mut Vec::new(), &items(&[1, 2, 3, 4]), 2, &mut |_| {
            calls += 1;
            calls < 2
        });
        assert!(!complete);
        assert_eq!(calls, 2);
    }
}
