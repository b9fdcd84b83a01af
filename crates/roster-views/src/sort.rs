//! Four comparison sorts over borrowed slices.
//!
//! Each takes the input by reference and a key extractor, and returns a
//! freshly ordered `Vec`. The input is never reordered.
//!
//! | Sort | Order | Cost | Stable |
//! |------|-------|------|--------|
//! | `exchange_sort_by_key` | ascending | O(n²) | yes |
//! | `selection_sort_desc_by_key` | descending | O(n²) | no |
//! | `partition_sort_by_key` | ascending | avg O(n log n), worst O(n²) | yes |
//! | `merge_sort_by_key` | ascending | O(n log n) | yes |

/// Adjacent compare-and-swap passes until a pass makes no swap.
pub fn exchange_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut out = items.to_vec();
    let len = out.len();
    for pass in 0..len {
        let mut swapped = false;
        for index in 0..len - 1 - pass {
            if key(&out[index]) > key(&out[index + 1]) {
                out.swap(index, index + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    out
}

/// Repeatedly move the largest remaining item to the front of the
/// unsorted tail. Equal keys may come out in any order.
pub fn selection_sort_desc_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut out = items.to_vec();
    for start in 0..out.len() {
        let mut max = start;
        for index in start + 1..out.len() {
            if key(&out[index]) > key(&out[max]) {
                max = index;
            }
        }
        out.swap(start, max);
    }
    out
}

/// Three-way partition around the middle element, recursing on the
/// smaller and larger parts.
pub fn partition_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    partition_sort_with(items, &key)
}

fn partition_sort_with<T, K, F>(items: &[T], key: &F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items.to_vec();
    }
    let pivot = key(&items[items.len() / 2]);
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();
    for item in items {
        match key(item).cmp(&pivot) {
            std::cmp::Ordering::Less => less.push(item.clone()),
            std::cmp::Ordering::Equal => equal.push(item.clone()),
            std::cmp::Ordering::Greater => greater.push(item.clone()),
        }
    }
    let mut out = partition_sort_with(&less, key);
    out.extend(equal);
    out.extend(partition_sort_with(&greater, key));
    out
}

/// Top-down merge sort; on equal keys the left half wins.
pub fn merge_sort_by_key<T, K, F>(items: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    merge_sort_with(items, &key)
}

fn merge_sort_with<T, K, F>(items: &[T], key: &F) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items.to_vec();
    }
    let (left, right) = items.split_at(items.len() / 2);
    let left = merge_sort_with(left, key);
    let right = merge_sort_with(right, key);

    let mut out = Vec::with_capacity(items.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => key(l) <= key(r),
            _ => break,
        };
        if take_left {
            out.extend(left.next());
        } else {
            out.extend(right.next());
        }
    }
    out.extend(left);
    out.extend(right);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // (sort key, original position)
    fn fixture() -> Vec<(u8, usize)> {
        [3, 1, 2, 3, 1, 0, 2, 3, 2, 1]
            .into_iter()
            .enumerate()
            .map(|(position, key)| (key, position))
            .collect()
    }

    fn is_permutation(input: &[(u8, usize)], output: &[(u8, usize)]) -> bool {
        let mut a = input.to_vec();
        let mut b = output.to_vec();
        a.sort();
        b.sort();
        a == b
    }

    fn stable_ascending(output: &[(u8, usize)]) -> bool {
        output.windows(2).all(|pair| pair[0] <= pair[1])
    }

    #[test]
    fn exchange_sort_is_stable_ascending() {
        let input = fixture();
        let out = exchange_sort_by_key(&input, |item| item.0);
        assert!(is_permutation(&input, &out));
        assert!(stable_ascending(&out));
        assert_eq!(input, fixture());
    }

    #[test]
    fn selection_sort_orders_descending() {
        let input = fixture();
        let out = selection_sort_desc_by_key(&input, |item| item.0);
        assert!(is_permutation(&input, &out));
        assert!(out.windows(2).all(|pair| pair[0].0 >= pair[1].0));
    }

    #[test]
    fn partition_sort_keeps_input_order_among_equals() {
        let input = fixture();
        let out = partition_sort_by_key(&input, |item| item.0);
        assert!(is_permutation(&input, &out));
        assert!(stable_ascending(&out));
    }

    #[test]
    fn partition_sort_handles_presorted_and_reversed_input() {
        let ascending: Vec<u32> = (0..500).collect();
        let descending: Vec<u32> = (0..500).rev().collect();
        assert_eq!(partition_sort_by_key(&ascending, |v| *v), ascending);
        assert_eq!(partition_sort_by_key(&descending, |v| *v), ascending);
    }

    #[test]
    fn merge_sort_left_side_wins_ties() {
        let input = fixture();
        let out = merge_sort_by_key(&input, |item| item.0);
        assert!(is_permutation(&input, &out));
        assert!(stable_ascending(&out));
    }

    #[test]
    fn empty_and_single_inputs() {
        let empty: Vec<i32> = Vec::new();
        assert!(exchange_sort_by_key(&empty, |v| *v).is_empty());
        assert!(selection_sort_desc_by_key(&empty, |v| *v).is_empty());
        assert!(partition_sort_by_key(&empty, |v| *v).is_empty());
        assert!(merge_sort_by_key(&empty, |v| *v).is_empty());
        assert_eq!(merge_sort_by_key(&[7], |v| *v), vec![7]);
        assert_eq!(exchange_sort_by_key(&[7], |v| *v), vec![7]);
    }
}
