//! Identity-keyed item sets
//!
//! Line items are compared by [`LineItemId`] alone, never by price or discount state.
//! These helpers let the discount machinery partition a basket and fold partial
//! results back into one consistent collection.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::items::{LineItem, LineItemId};

/// Items with the given product code, in their existing order.
pub fn select_by_code<'a>(items: &[LineItem<'a>], code: &str) -> Vec<LineItem<'a>> {
    items
        .iter()
        .filter(|item| item.code() == code)
        .cloned()
        .collect()
}

/// Merge item lists by identity.
///
/// Later entries replace earlier ones sharing the same identity. The result keeps the
/// order in which each identity first appeared.
pub fn merge_by_identity<'a, 'i>(
    lists: impl IntoIterator<Item = &'i [LineItem<'a>]>,
) -> Vec<LineItem<'a>>
where
    'a: 'i,
{
    let mut merged: Vec<LineItem<'a>> = Vec::new();
    let mut positions: FxHashMap<LineItemId, usize> = FxHashMap::default();

    for item in lists.into_iter().flatten() {
        match positions.get(&item.id()).and_then(|&idx| merged.get_mut(idx)) {
            Some(existing) => existing.clone_from(item),
            None => {
                positions.insert(item.id(), merged.len());
                merged.push(item.clone());
            }
        }
    }

    merged
}

/// Items whose identity does not appear in `remove`, in their existing order.
pub fn difference_by_identity<'a>(
    items: &[LineItem<'a>],
    remove: &[LineItem<'a>],
) -> Vec<LineItem<'a>> {
    let removed: FxHashSet<LineItemId> = remove.iter().map(LineItem::id).collect();

    items
        .iter()
        .filter(|item| !removed.contains(&item.id()))
        .cloned()
        .collect()
}
