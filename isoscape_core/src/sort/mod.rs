use std::fmt;

use bevy::{math::Vec3, reflect::Reflect};
use serde::Deserialize;

use crate::{bounds::IsoBox, projector::IsoProjector};

pub mod simple;
pub mod topological;

pub use simple::simple_sort;
pub use topological::{topological_sort, DrawGraph};

/// Padding used by the behind test when nothing else is configured.
pub const DEFAULT_PADDING: f32 = 1.5;

/// Which strategy orders a collection each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Reflect)]
pub enum SortMode {
    /// Order the objects were added in, as recorded by their insertion index.
    #[default]
    InsertionOrder,
    Simple,
    Topological,
}

impl SortMode {
    /// Flips between insertion order and `sorter`.
    pub fn toggled(self, sorter: SortMode) -> SortMode {
        if self == SortMode::InsertionOrder {
            sorter
        } else {
            SortMode::InsertionOrder
        }
    }

    pub fn is_sorted(&self) -> bool {
        *self != SortMode::InsertionOrder
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::InsertionOrder => write!(f, "insertion order"),
            SortMode::Simple => write!(f, "simple"),
            SortMode::Topological => write!(f, "topological"),
        }
    }
}

/// Anything with an iso position that can be depth sorted. Coordinates are read when the
/// sort runs, never cached.
pub trait IsoSortable {
    fn iso_box(&self) -> IsoBox;

    fn iso_position(&self) -> Vec3 {
        self.iso_box().position
    }

    /// Index the item was added at, used by [`SortMode::InsertionOrder`].
    fn insertion_index(&self) -> usize {
        usize::MAX
    }
}

impl IsoSortable for IsoBox {
    fn iso_box(&self) -> IsoBox {
        *self
    }
}

/// Counters from the last sort, for debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct SortStats {
    /// Draw before edges found between overlapping objects.
    pub edges: usize,
    /// Objects emitted ahead of unresolved edges to break a cycle.
    pub cycles_broken: usize,
}

/// Reorders `items` back to front using `mode`.
pub fn sort_collection<T: IsoSortable>(
    items: &mut [T],
    mode: SortMode,
    projector: &IsoProjector,
    padding: f32,
) -> SortStats {
    match mode {
        SortMode::InsertionOrder => {
            items.sort_by_key(|item| item.insertion_index());
            SortStats::default()
        }
        SortMode::Simple => {
            simple_sort(items);
            SortStats::default()
        }
        SortMode::Topological => topological_sort(items, projector, padding),
    }
}

/// Rearranges `items` so that `items[i]` becomes the element previously at `order[i]`.
/// `order` must be a permutation of `0..items.len()`.
pub(crate) fn apply_order<T>(items: &mut [T], order: &[usize]) {
    debug_assert_eq!(items.len(), order.len());
    let mut placed = vec![false; order.len()];
    for start in 0..order.len() {
        if placed[start] {
            continue;
        }
        let mut current = start;
        loop {
            placed[current] = true;
            let source = order[current];
            if source == start {
                break;
            }
            items.swap(current, source);
            current = source;
        }
    }
}
