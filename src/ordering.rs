//! Badge ordering across sheets.
//!
//! Printed sheets are stacked and cut in half. The order index printed on
//! each badge lets the two half-stacks be put back in sequence by hand, and
//! [`two_per_page`] arranges the badges so that the top-half stack holds the
//! first half of the list and the bottom-half stack the rest, both in order.

use std::iter::Peekable;

/// How badges are distributed over a physical sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Two badges per sheet, one above the other, cut apart after printing.
    TwoPerPage,
    /// One badge per sheet, nothing to compensate for.
    Enumerate,
}

impl Ordering {
    pub fn badges_per_sheet(self) -> usize {
        match self {
            Ordering::TwoPerPage => 2,
            Ordering::Enumerate => 1,
        }
    }

    /// Pair each item with its printed order index, in drawing order.
    pub fn apply<T>(self, items: &[T]) -> Vec<(usize, &T)> {
        match self {
            Ordering::TwoPerPage => two_per_page(items),
            Ordering::Enumerate => items.iter().enumerate().collect(),
        }
    }
}

/// Sheet `i` carries item `i` on its top half and item `i + ceil(n/2)` on its
/// bottom half. With an odd count the last sheet has no bottom half.
pub fn two_per_page<T>(items: &[T]) -> Vec<(usize, &T)> {
    let size = items.len();
    let nb_pages = size.div_ceil(2);
    let mut out = Vec::with_capacity(size);
    for i in 0..nb_pages {
        out.push((i, &items[i]));
        if i + nb_pages < size {
            out.push((i + nb_pages, &items[i + nb_pages]));
        }
    }
    out
}

/// Split an iterator into consecutive batches of at most `size` items.
///
/// Batches are produced lazily from a single pass over the source. Each
/// batch borrows the underlying iterator, so it must be consumed (or
/// dropped) before the next one is requested; a dropped batch skips its
/// remaining items.
pub fn batches<I: IntoIterator>(iter: I, size: usize) -> Batches<I::IntoIter> {
    assert!(size >= 1, "batch size must be at least 1");
    Batches {
        inner: iter.into_iter().peekable(),
        size,
    }
}

pub struct Batches<I: Iterator> {
    inner: Peekable<I>,
    size: usize,
}

impl<I: Iterator> Batches<I> {
    /// Next batch, or `None` once the source is exhausted.
    pub fn next_batch(&mut self) -> Option<Batch<'_, I>> {
        self.inner.peek()?;
        Some(Batch {
            inner: &mut self.inner,
            remaining: self.size,
        })
    }
}

/// One batch of a [`Batches`] split.
pub struct Batch<'a, I: Iterator> {
    inner: &'a mut Peekable<I>,
    remaining: usize,
}

impl<I: Iterator> Iterator for Batch<'_, I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.inner.next()
    }
}

impl<I: Iterator> Drop for Batch<'_, I> {
    fn drop(&mut self) {
        while self.remaining > 0 && self.inner.next().is_some() {
            self.remaining -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_batches<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
        let mut split = batches(items.iter().cloned(), size);
        let mut out = Vec::new();
        while let Some(batch) = split.next_batch() {
            out.push(batch.collect());
        }
        out
    }

    #[test]
    fn test_five_items_two_per_page() {
        let items = ['A', 'B', 'C', 'D', 'E'];
        let ordered: Vec<(usize, char)> = two_per_page(&items)
            .into_iter()
            .map(|(i, c)| (i, *c))
            .collect();
        assert_eq!(
            ordered,
            vec![(0, 'A'), (3, 'D'), (1, 'B'), (4, 'E'), (2, 'C')]
        );

        let sheets = collect_batches(&ordered, 2);
        assert_eq!(
            sheets,
            vec![
                vec![(0, 'A'), (3, 'D')],
                vec![(1, 'B'), (4, 'E')],
                vec![(2, 'C')],
            ]
        );
    }

    #[test]
    fn test_boundaries() {
        let empty: [u8; 0] = [];
        assert!(two_per_page(&empty).is_empty());
        assert_eq!(two_per_page(&["a"]), vec![(0, &"a")]);
        assert_eq!(two_per_page(&["a", "b"]), vec![(0, &"a"), (1, &"b")]);
    }

    #[test]
    fn test_halves_keep_original_order() {
        for n in 0..40usize {
            let items: Vec<usize> = (0..n).collect();
            let ordered = two_per_page(&items);
            let half = n.div_ceil(2);

            assert_eq!(ordered.len(), n);

            let mut indices: Vec<usize> = ordered.iter().map(|(i, _)| *i).collect();
            indices.sort_unstable();
            assert_eq!(indices, items);

            let top: Vec<usize> = ordered.iter().filter(|(i, _)| *i < half).map(|(_, v)| **v).collect();
            let bottom: Vec<usize> = ordered.iter().filter(|(i, _)| *i >= half).map(|(_, v)| **v).collect();
            assert_eq!(top, items[..half]);
            assert_eq!(bottom, items[half..]);

            // order index always names the item's original position
            assert!(ordered.iter().all(|(i, v)| i == *v));
        }
    }

    #[test]
    fn test_ordering_is_repeatable() {
        let items = ["r1", "r2", "r3", "r4", "r5", "r6", "r7"];
        assert_eq!(two_per_page(&items), two_per_page(&items));
        assert_eq!(items, ["r1", "r2", "r3", "r4", "r5", "r6", "r7"]);
    }

    #[test]
    fn test_enumerate_is_identity() {
        let items = ["x", "y", "z"];
        assert_eq!(
            Ordering::Enumerate.apply(&items),
            vec![(0, &"x"), (1, &"y"), (2, &"z")]
        );
        assert_eq!(Ordering::Enumerate.badges_per_sheet(), 1);
        assert_eq!(Ordering::TwoPerPage.badges_per_sheet(), 2);
    }

    #[test]
    fn test_batch_sizes() {
        for n in 0..25usize {
            for k in 1..6usize {
                let items: Vec<usize> = (0..n).collect();
                let split = collect_batches(&items, k);
                assert_eq!(split.len(), n.div_ceil(k));
                if let Some((last, full)) = split.split_last() {
                    assert!(full.iter().all(|b| b.len() == k));
                    assert!(!last.is_empty() && last.len() <= k);
                }
                let flat: Vec<usize> = split.into_iter().flatten().collect();
                assert_eq!(flat, items);
            }
        }
    }

    #[test]
    fn test_batches_are_lazy() {
        let mut pulled = 0;
        let source = (0..1_000_000).inspect(|_| pulled += 1);
        let mut split = batches(source, 3);
        let first: Vec<i32> = split.next_batch().unwrap().collect();
        assert_eq!(first, vec![0, 1, 2]);
        drop(split);
        // the peek for the first batch plus its three items
        assert!(pulled <= 4);
    }

    #[test]
    fn test_dropped_batch_skips_rest() {
        let mut split = batches(1..=7, 3);
        {
            let mut b = split.next_batch().unwrap();
            assert_eq!(b.next(), Some(1));
        }
        let second: Vec<i32> = split.next_batch().unwrap().collect();
        assert_eq!(second, vec![4, 5, 6]);
        let third: Vec<i32> = split.next_batch().unwrap().collect();
        assert_eq!(third, vec![7]);
        assert!(split.next_batch().is_none());
    }

    #[test]
    #[should_panic(expected = "batch size must be at least 1")]
    fn test_zero_batch_size() {
        let _ = batches(0..3, 0);
    }
}
