//! Joining 3D junction boxes into circuits by closest pairs.
//!
//! Pairs of points are taken in order of increasing straight-line
//! distance and each pair is wired together. Connected groups of points
//! are circuits, tracked with a union-find.

use serde::{Deserialize, Serialize};

use crate::error::{parse_number, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &Point) -> i64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }
}

/// Parse one `x,y,z` point per non-blank line.
pub fn parse_points(input: &str) -> Result<Vec<Point>, ParseError> {
    let mut points = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let [x, y, z] = fields[..] else {
            return Err(ParseError::malformed(idx + 1, "expected `x,y,z`"));
        };
        points.push(Point::new(
            parse_number(idx + 1, x)?,
            parse_number(idx + 1, y)?,
            parse_number(idx + 1, z)?,
        ));
    }
    if points.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(points)
}

/// Disjoint sets with path compression and union by size.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            components: n,
        }
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.components -= 1;
        true
    }

    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Sizes of all components, largest first.
    pub fn component_sizes(&mut self) -> Vec<usize> {
        let roots: Vec<usize> = (0..self.parent.len()).filter(|&i| self.find(i) == i).collect();
        let mut sizes: Vec<usize> = roots.into_iter().map(|root| self.size[root]).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

/// Every index pair `(i, j)` with `i < j`, closest first. Ties keep index order.
pub fn closest_pairs(points: &[Point]) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(i64, usize, usize)> = Vec::with_capacity(points.len() * points.len().saturating_sub(1) / 2);
    for i in 0..points.len() {
        for j in i + 1..points.len() {
            pairs.push((points[i].distance_squared(&points[j]), i, j));
        }
    }
    pairs.sort_unstable();
    pairs.into_iter().map(|(_, i, j)| (i, j)).collect()
}

/// Wire the `connections` closest pairs (joined or not) and multiply the
/// sizes of the three largest circuits.
pub fn largest_circuits_product(points: &[Point], connections: usize) -> u64 {
    let mut circuits = UnionFind::new(points.len());
    for (i, j) in closest_pairs(points).into_iter().take(connections) {
        circuits.union(i, j);
    }
    let sizes = circuits.component_sizes();
    if sizes.is_empty() {
        return 0;
    }
    sizes.iter().take(3).map(|&s| s as u64).product()
}

/// The pair whose wiring first leaves a single circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalConnection {
    pub first: Point,
    pub second: Point,
    pub x_product: i64,
}

/// Keep wiring closest pairs until every point shares one circuit.
///
/// `None` when there are fewer than two points.
pub fn final_connection(points: &[Point]) -> Option<FinalConnection> {
    let mut circuits = UnionFind::new(points.len());
    for (i, j) in closest_pairs(points) {
        if circuits.union(i, j) && circuits.component_count() == 1 {
            return Some(FinalConnection {
                first: points[i],
                second: points[j],
                x_product: points[i].x * points[j].x,
            });
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircuitsReport {
    pub points: usize,
    pub connections: usize,
    pub largest_product: u64,
    pub final_connection: Option<FinalConnection>,
}

pub fn analyze(points: &[Point], connections: usize) -> CircuitsReport {
    CircuitsReport {
        points: points.len(),
        connections,
        largest_product: largest_circuits_product(points, connections),
        final_connection: final_connection(points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JUNCTIONS: &str = "\
162,817,812
57,618,57
906,360,560
592,479,940
352,342,300
466,668,158
542,29,236
431,825,988
739,650,466
52,470,668
216,146,977
819,987,18
117,168,530
805,96,715
346,949,466
970,615,88
941,993,340
862,61,35
984,92,344
425,690,689";

    fn create_points() -> Vec<Point> {
        parse_points(JUNCTIONS).unwrap()
    }

    #[test]
    fn test_example_product() {
        assert_eq!(largest_circuits_product(&create_points(), 10), 40);
    }

    #[test]
    fn test_example_final_connection() {
        let last = final_connection(&create_points()).unwrap();
        assert_eq!(last.x_product, 25272);
        assert_eq!(last.first, Point::new(216, 146, 977));
        assert_eq!(last.second, Point::new(117, 168, 530));
    }

    #[test]
    fn test_closest_pair_first() {
        let pairs = closest_pairs(&create_points());
        assert_eq!(pairs.len(), 190);
        assert_eq!(pairs[0], (0, 19));
    }

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(1, 2));
        assert!(!uf.union(0, 2));
        assert_eq!(uf.component_count(), 3);
        assert_eq!(uf.find(2), uf.find(0));
        assert_eq!(uf.component_sizes(), vec![3, 1, 1]);
    }

    #[test]
    fn test_few_circuits() {
        let points = vec![Point::new(0, 0, 0), Point::new(1, 0, 0)];
        assert_eq!(largest_circuits_product(&points, 0), 1);
        assert_eq!(largest_circuits_product(&points, 1), 2);
        assert_eq!(largest_circuits_product(&[], 5), 0);
        assert_eq!(final_connection(&points[..1]), None);
    }

    #[test]
    fn test_report() {
        let report = analyze(&create_points(), 10);
        assert_eq!(report.points, 20);
        assert_eq!(report.largest_product, 40);
        assert_eq!(report.final_connection.map(|f| f.x_product), Some(25272));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_points(""), Err(ParseError::Empty));
        assert!(matches!(parse_points("1,2"), Err(ParseError::Malformed { line: 1, .. })));
        assert!(matches!(
            parse_points("1,2,3\n4,x,6"),
            Err(ParseError::InvalidNumber { line: 2, .. })
        ));
    }
}
