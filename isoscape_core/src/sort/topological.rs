use std::{cmp::Reverse, collections::BinaryHeap};

use bevy::log::debug;
use tracing::instrument;

use crate::{bounds::IsoBox, depth::DepthKey, projector::IsoProjector};

use super::{apply_order, IsoSortable, SortStats};

/// Directed "draws before" graph over a collection, resolved into a back to front order.
#[derive(Debug, Clone, Default)]
pub struct DrawGraph {
    keys: Vec<DepthKey>,
    successors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    edges: usize,
}

impl DrawGraph {
    /// One node per key; `keys[i]` is the tie-break for node `i`.
    pub fn new(keys: Vec<DepthKey>) -> Self {
        let len = keys.len();
        Self {
            keys,
            successors: vec![Vec::new(); len],
            in_degree: vec![0; len],
            edges: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// `before` must be drawn before `after`. Self edges are ignored.
    pub fn add_edge(&mut self, before: usize, after: usize) {
        if before == after {
            return;
        }
        self.successors[before].push(after);
        self.in_degree[after] += 1;
        self.edges += 1;
    }

    /// Returns the node order and the number of times a cycle had to be broken.
    ///
    /// Nodes become ready once everything drawn before them is placed; among ready nodes the
    /// smallest key goes first. When only cycles remain, the smallest remaining key is placed
    /// regardless of its unresolved edges.
    pub fn resolve(&self) -> (Vec<usize>, usize) {
        let len = self.len();
        let mut in_degree = self.in_degree.clone();
        let mut placed = vec![false; len];
        let mut ready: BinaryHeap<Reverse<(DepthKey, usize)>> = (0..len)
            .filter(|&node| in_degree[node] == 0)
            .map(|node| Reverse((self.keys[node], node)))
            .collect();

        let mut order = Vec::with_capacity(len);
        let mut cycles_broken = 0;

        while order.len() < len {
            let node = match ready.pop() {
                Some(Reverse((_, node))) => node,
                None => {
                    let Some(node) = (0..len)
                        .filter(|&node| !placed[node])
                        .min_by_key(|&node| (self.keys[node], node))
                    else {
                        break;
                    };
                    cycles_broken += 1;
                    node
                }
            };

            placed[node] = true;
            order.push(node);

            for &next in &self.successors[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 && !placed[next] {
                    ready.push(Reverse((self.keys[next], next)));
                }
            }
        }

        (order, cycles_broken)
    }
}

/// Orders `items` so that every object is drawn after everything it overlaps on screen and
/// sits in front of. Pairs that are ambiguous, or that do not overlap, fall back to the depth
/// key, which also breaks any cycles.
#[instrument(skip_all, fields(len = items.len()))]
pub fn topological_sort<T: IsoSortable>(
    items: &mut [T],
    projector: &IsoProjector,
    padding: f32,
) -> SortStats {
    let boxes: Vec<IsoBox> = items.iter().map(|item| item.iso_box()).collect();
    let rects: Vec<_> = boxes.iter().map(|b| b.screen_rect(projector)).collect();
    let mut graph = DrawGraph::new(
        items
            .iter()
            .map(|item| DepthKey::new(item.iso_position()))
            .collect(),
    );

    for a in 0..boxes.len() {
        for b in (a + 1)..boxes.len() {
            if rects[a].intersect(rects[b]).is_empty() {
                continue;
            }
            match (
                boxes[a].is_behind(&boxes[b], padding),
                boxes[b].is_behind(&boxes[a], padding),
            ) {
                (true, false) => graph.add_edge(a, b),
                (false, true) => graph.add_edge(b, a),
                _ => {}
            }
        }
    }

    let (order, cycles_broken) = graph.resolve();
    apply_order(items, &order);

    if cycles_broken > 0 {
        debug!(cycles_broken, edges = graph.edge_count(), "Broke draw order cycles");
    }

    SortStats {
        edges: graph.edge_count(),
        cycles_broken,
    }
}

#[cfg(test)]
mod test {
    use bevy::math::Vec3;
    use proptest::prelude::*;

    use super::*;
    use crate::{depth::depth_key, sort::DEFAULT_PADDING};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Cube {
        id: usize,
        iso_box: IsoBox,
    }

    impl Cube {
        fn new(id: usize, position: Vec3, size: Vec3) -> Self {
            Self {
                id,
                iso_box: IsoBox::new(position, size),
            }
        }
    }

    impl IsoSortable for Cube {
        fn iso_box(&self) -> IsoBox {
            self.iso_box
        }
    }

    fn ids(cubes: &[Cube]) -> Vec<usize> {
        cubes.iter().map(|c| c.id).collect()
    }

    fn position_of(cubes: &[Cube], id: usize) -> usize {
        cubes.iter().position(|c| c.id == id).unwrap()
    }

    fn arb_cubes() -> impl Strategy<Value = Vec<Cube>> {
        prop::collection::vec((0..10u8, 0..10u8, 0..4u8, 1..4u8), 0..30).prop_map(|coords| {
            coords
                .into_iter()
                .enumerate()
                .map(|(id, (x, y, z, size))| {
                    Cube::new(
                        id,
                        Vec3::new(x as f32 * 16., y as f32 * 16., z as f32 * 16.),
                        Vec3::splat(size as f32 * 16.),
                    )
                })
                .collect()
        })
    }

    fn keys(positions: &[Vec3]) -> Vec<DepthKey> {
        positions.iter().map(|&p| DepthKey::new(p)).collect()
    }

    #[test]
    fn cube_behind_is_drawn_first() {
        let projector = IsoProjector::default();
        let mut cubes = vec![
            Cube::new(0, Vec3::new(32., 32., 0.), Vec3::splat(32.)),
            Cube::new(1, Vec3::new(0., 0., 0.), Vec3::splat(32.)),
        ];
        assert!(cubes[0]
            .iso_box
            .overlaps_on_screen(&cubes[1].iso_box, &projector));

        let stats = topological_sort(&mut cubes, &projector, DEFAULT_PADDING);

        assert_eq!(ids(&cubes), vec![1, 0]);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.cycles_broken, 0);
    }

    #[test]
    fn wall_in_front_of_cube_beats_key_order() {
        // The wall's back corner gives it the smaller key, but it stands between the cube
        // and the viewer along x.
        let projector = IsoProjector::default();
        let mut cubes = vec![
            Cube::new(0, Vec3::new(0., 100., 0.), Vec3::splat(16.)),
            Cube::new(1, Vec3::new(40., 0., 0.), Vec3::new(8., 160., 32.)),
        ];
        assert!(
            depth_key(cubes[1].iso_box.position) < depth_key(cubes[0].iso_box.position)
        );

        let mut simple = cubes.clone();
        crate::sort::simple_sort(&mut simple);
        assert_eq!(ids(&simple), vec![1, 0]);

        let stats = topological_sort(&mut cubes, &projector, DEFAULT_PADDING);
        assert_eq!(ids(&cubes), vec![0, 1]);
        assert_eq!(stats.edges, 1);
    }

    #[test]
    fn cycle_terminates_with_every_node() {
        let mut graph = DrawGraph::new(keys(&[
            Vec3::new(0., 0., 0.),
            Vec3::new(10., 0., 0.),
            Vec3::new(20., 0., 0.),
        ]));
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);

        let (order, cycles_broken) = graph.resolve();

        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(cycles_broken, 1);
    }

    #[test]
    fn cycle_break_picks_smallest_key() {
        let mut graph = DrawGraph::new(keys(&[
            Vec3::new(50., 0., 0.),
            Vec3::new(10., 0., 0.),
            Vec3::new(30., 0., 0.),
        ]));
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(2, 0);

        let (order, cycles_broken) = graph.resolve();

        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(cycles_broken, 1);
    }

    #[test]
    fn edges_override_key_order() {
        let mut graph = DrawGraph::new(keys(&[Vec3::ZERO, Vec3::new(10., 0., 0.)]));
        graph.add_edge(1, 0);

        assert_eq!(graph.resolve(), (vec![1, 0], 0));
    }

    #[test]
    fn self_edges_are_ignored() {
        let mut graph = DrawGraph::new(keys(&[Vec3::ZERO]));
        graph.add_edge(0, 0);

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.resolve(), (vec![0], 0));
    }

    #[test]
    fn empty_collection() {
        let mut cubes: Vec<Cube> = Vec::new();
        let stats = topological_sort(&mut cubes, &IsoProjector::default(), DEFAULT_PADDING);

        assert!(cubes.is_empty());
        assert_eq!(stats, SortStats::default());
    }

    /// Three boxes in a pinwheel: `0` is behind `1` along x, `1` behind `2` along y and `2`
    /// behind `0` along z.
    fn pinwheel() -> [Cube; 3] {
        [
            Cube::new(0, Vec3::new(0., 0., 10.), Vec3::new(20., 30., 10.)),
            Cube::new(1, Vec3::new(20., 0., 0.), Vec3::new(20., 20., 40.)),
            Cube::new(2, Vec3::new(0., 20., 0.), Vec3::new(60., 20., 10.)),
        ]
    }

    #[test]
    fn pinwheel_boxes_form_a_cycle() {
        let projector = IsoProjector::default();
        let [a, b, c] = pinwheel().map(|cube| cube.iso_box);

        for (back, front) in [(a, b), (b, c), (c, a)] {
            assert!(back.is_behind(&front, DEFAULT_PADDING));
            assert!(!front.is_behind(&back, DEFAULT_PADDING));
            assert!(back.overlaps_on_screen(&front, &projector));
        }
    }

    #[test]
    fn overlapping_cycle_is_broken_at_smallest_key() {
        let projector = IsoProjector::default();
        let [a, b, c] = pinwheel();
        let mut cubes = vec![c, a, b];

        let stats = topological_sort(&mut cubes, &projector, DEFAULT_PADDING);

        assert_eq!(ids(&cubes), vec![0, 1, 2]);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.cycles_broken, 1);
    }

    #[test]
    fn reverse_spawn_order_matches_forward() {
        let projector = IsoProjector::default();
        let mut forward = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                forward.push(Cube::new(
                    forward.len(),
                    Vec3::new(x as f32 * 48., y as f32 * 48., 0.),
                    Vec3::splat(32.),
                ));
            }
        }
        let mut reverse: Vec<Cube> = forward.iter().rev().cloned().collect();

        topological_sort(&mut forward, &projector, DEFAULT_PADDING);
        topological_sort(&mut reverse, &projector, DEFAULT_PADDING);

        assert_eq!(ids(&forward), ids(&reverse));
    }

    proptest! {
        #[test]
        fn output_is_a_permutation(mut cubes in arb_cubes()) {
            let len = cubes.len();
            topological_sort(&mut cubes, &IsoProjector::default(), DEFAULT_PADDING);

            let mut sorted_ids = ids(&cubes);
            sorted_ids.sort();
            prop_assert_eq!(sorted_ids, (0..len).collect::<Vec<_>>());
        }

        #[test]
        fn sorting_twice_is_idempotent(mut cubes in arb_cubes()) {
            let projector = IsoProjector::default();
            topological_sort(&mut cubes, &projector, DEFAULT_PADDING);
            let first = ids(&cubes);
            topological_sort(&mut cubes, &projector, DEFAULT_PADDING);

            prop_assert_eq!(first, ids(&cubes));
        }

        #[test]
        fn acyclic_edges_are_respected(mut cubes in arb_cubes()) {
            let projector = IsoProjector::default();
            let stats = topological_sort(&mut cubes, &projector, DEFAULT_PADDING);
            prop_assume!(stats.cycles_broken == 0);

            for a in &cubes {
                for b in &cubes {
                    if a.id == b.id || !a.iso_box.overlaps_on_screen(&b.iso_box, &projector) {
                        continue;
                    }
                    if a.iso_box.is_behind(&b.iso_box, DEFAULT_PADDING)
                        && !b.iso_box.is_behind(&a.iso_box, DEFAULT_PADDING)
                    {
                        prop_assert!(position_of(&cubes, a.id) < position_of(&cubes, b.id));
                    }
                }
            }
        }
    }
}
