//! Grouping of wire endpoints into electrically connected nodes.
//!
//! Endpoints live in an arena of union-find nodes indexed by a point map.
//! Two endpoints are already connected when their roots are the same index.

use std::collections::{BTreeSet, HashMap};

use crate::geometry::Point;
use crate::wire::Wire;

/// Union-find over endpoint points, used while wires are being folded in.
#[derive(Debug, Default)]
struct EndpointForest {
    index: HashMap<Point, usize>,
    parent: Vec<usize>,
    /// Points owned by each root; empty for non-root nodes.
    members: Vec<Vec<Point>>,
}

impl EndpointForest {
    fn node(&mut self, p: Point) -> usize {
        if let Some(&i) = self.index.get(&p) {
            return i;
        }
        let i = self.parent.len();
        self.parent.push(i);
        self.members.push(vec![p]);
        self.index.insert(p, i);
        i
    }

    fn find(&mut self, mut i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    /// Join the groups of `a` and `b`. Returns false if they were already one group.
    fn union(&mut self, a: Point, b: Point) -> bool {
        let (na, nb) = (self.node(a), self.node(b));
        let (ra, rb) = (self.find(na), self.find(nb));
        if ra == rb {
            return false;
        }

        let (keep, absorb) = if self.members[ra].len() >= self.members[rb].len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        let moved = std::mem::take(&mut self.members[absorb]);
        debug_assert!(
            moved.iter().all(|p| !self.members[keep].contains(p)),
            "endpoint groups being merged are not disjoint"
        );
        self.parent[absorb] = keep;
        self.members[keep].extend(moved);
        true
    }
}

/// Connected endpoint groups of a set of wires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connections {
    groups: Vec<BTreeSet<Point>>,
    group_of: HashMap<Point, usize>,
}

impl Connections {
    /// Fold every wire's first and last point into the grouping.
    ///
    /// Single-point wires contribute nothing.
    pub fn from_wires<'a, I>(wires: I) -> Self
    where
        I: IntoIterator<Item = &'a Wire>,
    {
        let mut forest = EndpointForest::default();
        let mut redundant = 0usize;

        for wire in wires {
            let Some((first, last)) = wire.endpoints() else {
                continue;
            };
            if !forest.union(first, last) {
                redundant += 1;
            }
        }

        let mut groups = Vec::new();
        let mut group_of = HashMap::with_capacity(forest.index.len());
        for root in 0..forest.parent.len() {
            if forest.parent[root] != root {
                continue;
            }
            let members: BTreeSet<Point> = forest.members[root].iter().copied().collect();
            for p in &members {
                group_of.insert(*p, groups.len());
            }
            groups.push(members);
        }

        log::debug!(
            "Grouped {} endpoints into {} nodes ({} redundant wires)",
            group_of.len(),
            groups.len(),
            redundant
        );

        Self { groups, group_of }
    }

    /// The group containing `p`, if `p` is a wire endpoint.
    pub fn group(&self, p: Point) -> Option<&BTreeSet<Point>> {
        self.group_of.get(&p).map(|&i| &self.groups[i])
    }

    pub fn connected(&self, a: Point, b: Point) -> bool {
        match (self.group_of.get(&a), self.group_of.get(&b)) {
            (Some(ga), Some(gb)) => ga == gb,
            _ => false,
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &BTreeSet<Point>> {
        self.groups.iter()
    }

    /// Every endpoint paired with its group.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &BTreeSet<Point>)> {
        self.group_of.iter().map(|(p, &i)| (*p, &self.groups[i]))
    }

    pub fn contains(&self, p: Point) -> bool {
        self.group_of.contains_key(&p)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct endpoints.
    pub fn endpoint_count(&self) -> usize {
        self.group_of.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireKind;

    fn wire(id: u64, path: &[(i32, i32)]) -> Wire {
        Wire::new(
            id,
            WireKind::Bit,
            path.iter().copied().map(Point::from).collect(),
        )
    }

    #[test]
    fn test_chain_and_separate_group() {
        let wires = [
            wire(1, &[(0, 0), (2, 0)]),
            wire(2, &[(2, 0), (2, 3)]),
            wire(3, &[(10, 10), (10, 12)]),
        ];
        let conns = Connections::from_wires(&wires);

        let expected: BTreeSet<Point> = [(0, 0), (2, 0), (2, 3)]
            .into_iter()
            .map(Point::from)
            .collect();
        assert_eq!(conns.group(Point::new(0, 0)), Some(&expected));
        assert_eq!(conns.group(Point::new(2, 3)), Some(&expected));
        assert!(conns.connected(Point::new(0, 0), Point::new(2, 3)));
        assert!(!conns.connected(Point::new(0, 0), Point::new(10, 10)));
        assert_eq!(conns.len(), 2);
        assert_eq!(conns.endpoint_count(), 5);
    }

    #[test]
    fn test_only_endpoints_count() {
        // middle cell (1,0) is not an endpoint and connects nothing
        let wires = [
            wire(1, &[(0, 0), (1, 0), (2, 0)]),
            wire(2, &[(1, 0), (1, 5)]),
        ];
        let conns = Connections::from_wires(&wires);
        assert!(!conns.connected(Point::new(0, 0), Point::new(1, 5)));
        assert!(!conns.contains(Point::new(2, 5)));
        assert_eq!(conns.len(), 2);
    }

    #[test]
    fn test_single_point_wire_ignored() {
        let wires = [wire(1, &[(4, 4)])];
        let conns = Connections::from_wires(&wires);
        assert!(conns.is_empty());
        assert_eq!(conns.group(Point::new(4, 4)), None);
    }

    #[test]
    fn test_redundant_wire_and_loop() {
        let wires = [
            wire(1, &[(0, 0), (0, 2)]),
            wire(2, &[(0, 2), (0, 0)]),
            wire(3, &[(5, 5), (6, 5), (5, 5)]),
        ];
        let conns = Connections::from_wires(&wires);
        assert_eq!(conns.len(), 2);
        let lonely: BTreeSet<Point> = [Point::new(5, 5)].into_iter().collect();
        assert_eq!(conns.group(Point::new(5, 5)), Some(&lonely));
    }

    #[test]
    fn test_merging_two_existing_groups() {
        let wires = [
            wire(1, &[(0, 0), (1, 0)]),
            wire(2, &[(5, 0), (6, 0)]),
            wire(3, &[(7, 0), (8, 0)]),
            wire(4, &[(6, 0), (7, 0)]),
            wire(5, &[(1, 0), (8, 0)]),
        ];
        let conns = Connections::from_wires(&wires);
        assert_eq!(conns.len(), 1);
        for (p, group) in conns.iter() {
            assert!(group.contains(&p));
            assert_eq!(group.len(), 6);
        }
    }

    #[test]
    fn test_forest_members_stay_disjoint() {
        let mut forest = EndpointForest::default();
        let pts: Vec<Point> = (0..6).map(|i| Point::new(i, 0)).collect();
        assert!(forest.union(pts[0], pts[1]));
        assert!(forest.union(pts[2], pts[3]));
        assert!(forest.union(pts[4], pts[5]));
        assert!(forest.union(pts[1], pts[2]));
        assert!(!forest.union(pts[0], pts[3]));
        assert!(forest.union(pts[5], pts[0]));

        // every point is owned by exactly one root
        let owned: Vec<&Point> = forest.members.iter().flatten().collect();
        assert_eq!(owned.len(), pts.len());
        let distinct: BTreeSet<&Point> = owned.iter().copied().collect();
        assert_eq!(distinct.len(), pts.len());
        assert_eq!(forest.members.iter().filter(|m| !m.is_empty()).count(), 1);
    }

    #[test]
    fn test_grouping_is_an_equivalence() {
        let wires: Vec<Wire> = (0..20)
            .map(|i| wire(i, &[((i % 7) as i32, 0), (((i * 3) % 7) as i32, 1)]))
            .collect();
        let conns = Connections::from_wires(&wires);
        let points: Vec<Point> = conns.iter().map(|(p, _)| p).collect();
        for &a in &points {
            assert!(conns.connected(a, a));
            for &b in &points {
                assert_eq!(conns.connected(a, b), conns.connected(b, a));
                for &c in &points {
                    if conns.connected(a, b) && conns.connected(b, c) {
                        assert!(conns.connected(a, c));
                    }
                }
            }
        }
    }
}
