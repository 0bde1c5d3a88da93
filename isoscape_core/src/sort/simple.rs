use tracing::instrument;

use crate::depth::depth_key;

use super::IsoSortable;

/// Stable sort on the scalar depth key. Objects with equal keys keep their relative order.
///
/// Cheap, but boxes whose keys do not capture their occlusion (long objects crossing each
/// other on screen) can come out in the wrong order; use
/// [`topological_sort`](super::topological_sort) for those.
#[instrument(skip_all, fields(len = items.len()))]
pub fn simple_sort<T: IsoSortable>(items: &mut [T]) {
    items.sort_by(|a, b| depth_key(a.iso_position()).total_cmp(&depth_key(b.iso_position())));
}
