//! Index mapping for lists that interleave items with separators.
//!
//! Even child indices are items, odd ones are separators, so `n` items
//! produce `2n - 1` children.

/// One child of a separated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeparatedChild {
    Item(usize),
    /// Separator following the item at this index.
    Separator(usize),
}

pub fn separated_child_count(item_count: usize) -> usize {
    (item_count * 2).saturating_sub(1)
}

pub fn separated_child(child_index: usize) -> SeparatedChild {
    let item_index = child_index / 2;
    if child_index % 2 == 0 {
        SeparatedChild::Item(item_index)
    } else {
        SeparatedChild::Separator(item_index)
    }
}
