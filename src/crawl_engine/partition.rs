//! Contiguous work partitioning

/// Split `items` into `k` contiguous blocks
///
/// Each of the first `k - 1` blocks holds `len / k` items and the last block
/// absorbs the remainder. With fewer items than workers everything goes into
/// a single block. A `k` of zero is treated as one. Concatenating the blocks
/// gives back `items` unchanged.
#[must_use]
pub fn partition<T>(items: Vec<T>, k: usize) -> Vec<Vec<T>> {
    let k = k.max(1);
    if items.len() < k {
        return vec![items];
    }

    let unit = items.len() / k;
    let mut blocks = Vec::with_capacity(k);
    let mut rest = items;

    for _ in 0..k - 1 {
        let tail = rest.split_off(unit);
        blocks.push(rest);
        rest = tail;
    }
    blocks.push(rest);

    blocks
}
