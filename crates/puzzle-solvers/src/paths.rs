//! Counting simple paths through a directed device graph.
//!
//! Input lines look like `you: bbb ccc`. A node that never appears before
//! a colon has no outgoing edges and is a dead end.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{ParseError, PathError};

/// Largest required-node set tracked in the visit bitmask.
pub const MAX_REQUIRED: usize = 64;

/// Directed graph over interned node names.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
    successors: Vec<SmallVec<[usize; 4]>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, adding it if unseen.
    fn intern(&mut self, name: &str) -> usize {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.successors.push(SmallVec::new());
        id
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.intern(from);
        let to = self.intern(to);
        self.successors[from].push(to);
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Vec<&'a str>)>) -> Self {
        let mut graph = Self::new();
        for (node, successors) in pairs {
            graph.intern(node);
            for successor in successors {
                graph.add_edge(node, successor);
            }
        }
        graph
    }

    /// Parse `name: succ succ ...` lines. Blank lines are skipped.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut graph = Self::new();
        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (node, rest) = line
                .split_once(':')
                .ok_or_else(|| ParseError::malformed(idx + 1, "expected `name: successors`"))?;
            let node = node.trim();
            if node.is_empty() {
                return Err(ParseError::malformed(idx + 1, "missing node name"));
            }
            graph.intern(node);
            for successor in rest.split_whitespace() {
                graph.add_edge(node, successor);
            }
        }
        if graph.names.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(graph)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(|s| s.len()).sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn successors(&self, name: &str) -> Vec<&str> {
        self.index
            .get(name)
            .map(|&id| {
                self.successors[id]
                    .iter()
                    .map(|&s| self.names[s].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether no cycle is reachable from `start`. Unknown nodes are acyclic.
    pub fn is_acyclic_from(&self, start: &str) -> bool {
        match self.index.get(start) {
            Some(&id) => {
                let mut marks = vec![Mark::Unseen; self.names.len()];
                self.acyclic(id, &mut marks)
            }
            None => true,
        }
    }

    fn acyclic(&self, node: usize, marks: &mut [Mark]) -> bool {
        marks[node] = Mark::Open;
        for &next in &self.successors[node] {
            match marks[next] {
                Mark::Open => return false,
                Mark::Unseen => {
                    if !self.acyclic(next, marks) {
                        return false;
                    }
                }
                Mark::Done => {}
            }
        }
        marks[node] = Mark::Done;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unseen,
    Open,
    Done,
}

/// Number of simple paths from `start` to `end`. Unknown endpoints give 0.
pub fn count_paths(graph: &Graph, start: &str, end: &str) -> Result<u64, PathError> {
    let (Some(&start), Some(&end)) = (graph.index.get(start), graph.index.get(end)) else {
        return Ok(0);
    };
    let mut visited = vec![false; graph.node_count()];
    visited[start] = true;
    simple_paths(graph, start, end, &mut visited)
}

fn add_paths(total: u64, count: u64) -> Result<u64, PathError> {
    total.checked_add(count).ok_or(PathError::Overflow)
}

fn simple_paths(graph: &Graph, node: usize, end: usize, visited: &mut [bool]) -> Result<u64, PathError> {
    if node == end {
        return Ok(1);
    }
    let mut total = 0;
    for &next in &graph.successors[node] {
        if !visited[next] {
            visited[next] = true;
            let count = simple_paths(graph, next, end, visited);
            visited[next] = false;
            total = add_paths(total, count?)?;
        }
    }
    Ok(total)
}

/// Required nodes resolved to bit positions.
struct Requirements {
    bits: FxHashMap<usize, u64>,
    full: u64,
}

impl Requirements {
    fn bit(&self, node: usize) -> u64 {
        self.bits.get(&node).copied().unwrap_or(0)
    }
}

/// Number of simple paths from `start` to `end` visiting every node in
/// `required`.
///
/// When the graph reachable from `start` is acyclic, counts are memoized
/// on (node, required nodes seen so far). Otherwise the search backtracks
/// over a visited set.
pub fn count_paths_through(
    graph: &Graph,
    start: &str,
    end: &str,
    required: &[&str],
) -> Result<u64, PathError> {
    let mut names: Vec<&str> = required.to_vec();
    names.sort_unstable();
    names.dedup();
    if names.len() > MAX_REQUIRED {
        return Err(PathError::TooManyRequired(names.len()));
    }

    let (Some(&start_id), Some(&end_id)) = (graph.index.get(start), graph.index.get(end)) else {
        return Ok(0);
    };

    let mut bits = FxHashMap::default();
    for (bit, name) in names.iter().enumerate() {
        match graph.index.get(*name) {
            Some(&id) => {
                bits.insert(id, 1u64 << bit);
            }
            // A node the graph never mentions cannot be visited
            None => return Ok(0),
        }
    }
    let full = if names.len() == MAX_REQUIRED {
        u64::MAX
    } else {
        (1u64 << names.len()) - 1
    };
    let requirements = Requirements { bits, full };
    let mask = requirements.bit(start_id);

    if graph.is_acyclic_from(start) {
        let mut memo = FxHashMap::default();
        memoized_paths(graph, start_id, end_id, mask, &requirements, &mut memo)
    } else {
        let mut visited = vec![false; graph.node_count()];
        visited[start_id] = true;
        backtracked_paths(graph, start_id, end_id, mask, &requirements, &mut visited)
    }
}

fn memoized_paths(
    graph: &Graph,
    node: usize,
    end: usize,
    mask: u64,
    requirements: &Requirements,
    memo: &mut FxHashMap<(usize, u64), u64>,
) -> Result<u64, PathError> {
    if node == end {
        return Ok(u64::from(mask == requirements.full));
    }
    if let Some(&count) = memo.get(&(node, mask)) {
        return Ok(count);
    }
    let mut total = 0;
    for &next in &graph.successors[node] {
        let count = memoized_paths(graph, next, end, mask | requirements.bit(next), requirements, memo)?;
        total = add_paths(total, count)?;
    }
    memo.insert((node, mask), total);
    Ok(total)
}

fn backtracked_paths(
    graph: &Graph,
    node: usize,
    end: usize,
    mask: u64,
    requirements: &Requirements,
    visited: &mut [bool],
) -> Result<u64, PathError> {
    if node == end {
        return Ok(u64::from(mask == requirements.full));
    }
    let mut total = 0;
    for &next in &graph.successors[node] {
        if !visited[next] {
            visited[next] = true;
            let count = backtracked_paths(graph, next, end, mask | requirements.bit(next), requirements, visited);
            visited[next] = false;
            total = add_paths(total, count?)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REACTOR: &str = "\
aaa: you hhh
you: bbb ccc
bbb: ddd eee
ccc: ddd eee fff
ddd: ggg
eee: out
fff: out
ggg: out
hhh: ccc fff iii
iii: out";

    const SERVER_RACK: &str = "\
svr: aaa bbb
aaa: fft
fft: ccc
bbb: tty
tty: ccc
ccc: ddd eee
ddd: hub
hub: fff
eee: dac
dac: fff
fff: ggg hhh
ggg: out
hhh: out";

    /// `s`, then `layers` ranks of two nodes each fully wired to the next
    /// rank, then `out`: 2^layers paths.
    fn create_layers(layers: usize) -> Graph {
        let mut graph = Graph::new();
        for side in ["a", "b"] {
            graph.add_edge("s", &format!("{}0", side));
            graph.add_edge(&format!("{}{}", side, layers - 1), "out");
        }
        for rank in 0..layers - 1 {
            for from in ["a", "b"] {
                for to in ["a", "b"] {
                    graph.add_edge(&format!("{}{}", from, rank), &format!("{}{}", to, rank + 1));
                }
            }
        }
        graph
    }

    fn create_cycle() -> Graph {
        Graph::from_pairs([("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["b", "out"])])
    }

    #[test]
    fn test_example_paths() {
        let graph = Graph::parse(REACTOR).unwrap();
        assert_eq!(count_paths(&graph, "you", "out"), Ok(5));
        assert_eq!(graph.node_count(), 11);
        assert_eq!(graph.successors("ccc"), vec!["ddd", "eee", "fff"]);
        assert!(graph.successors("out").is_empty());
    }

    #[test]
    fn test_example_required_nodes() {
        let graph = Graph::parse(SERVER_RACK).unwrap();
        assert_eq!(count_paths(&graph, "svr", "out"), Ok(8));
        assert_eq!(count_paths_through(&graph, "svr", "out", &["dac", "fft"]), Ok(2));
        assert_eq!(count_paths_through(&graph, "svr", "out", &["fft"]), Ok(4));
    }

    #[test]
    fn test_unreachable_required_node() {
        let graph = Graph::parse(REACTOR).unwrap();
        // aaa only leads into the subgraph, never out of `you`
        assert_eq!(count_paths_through(&graph, "you", "out", &["aaa"]), Ok(0));
        assert_eq!(count_paths_through(&graph, "you", "out", &["ccc", "zzz"]), Ok(0));
        assert_eq!(count_paths_through(&graph, "you", "out", &["ccc"]), Ok(3));
    }

    #[test]
    fn test_no_requirements_matches_plain_count() {
        let graph = Graph::parse(REACTOR).unwrap();
        assert_eq!(count_paths_through(&graph, "you", "out", &[]), count_paths(&graph, "you", "out"));
        assert_eq!(count_paths_through(&graph, "aaa", "out", &[]), count_paths(&graph, "aaa", "out"));
    }

    #[test]
    fn test_required_start_counts_as_visited() {
        let graph = Graph::parse(REACTOR).unwrap();
        assert_eq!(count_paths_through(&graph, "you", "out", &["you"]), Ok(5));
    }

    #[test]
    fn test_cycle_terminates() {
        let graph = create_cycle();
        assert!(!graph.is_acyclic_from("a"));
        assert_eq!(count_paths(&graph, "a", "out"), Ok(1));
        assert_eq!(count_paths_through(&graph, "a", "out", &["b", "c"]), Ok(1));
        assert_eq!(count_paths_through(&graph, "a", "out", &["d"]), Ok(0));
    }

    #[test]
    fn test_dead_ends_and_unknown_nodes() {
        let graph = Graph::from_pairs([("a", vec!["b", "c"]), ("b", vec!["d"])]);
        assert!(graph.is_acyclic_from("a"));
        assert_eq!(count_paths(&graph, "a", "c"), Ok(1));
        assert_eq!(count_paths(&graph, "a", "d"), Ok(1));
        assert_eq!(count_paths(&graph, "c", "d"), Ok(0));
        assert_eq!(count_paths(&graph, "x", "d"), Ok(0));
        assert_eq!(count_paths(&graph, "a", "x"), Ok(0));
        assert_eq!(count_paths(&graph, "a", "a"), Ok(1));
    }

    #[test]
    fn test_too_many_required() {
        let graph = Graph::parse(REACTOR).unwrap();
        let names: Vec<String> = (0..65).map(|i| format!("n{}", i)).collect();
        let required: Vec<&str> = names.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            count_paths_through(&graph, "you", "out", &required),
            Err(PathError::TooManyRequired(65))
        );
        // Duplicates collapse before the limit is checked
        assert_eq!(count_paths_through(&graph, "you", "out", &["ccc"; 70]), Ok(3));
    }

    #[test]
    fn test_layered_counts() {
        let graph = create_layers(10);
        assert_eq!(count_paths(&graph, "s", "out"), Ok(1024));
        assert_eq!(count_paths_through(&graph, "s", "out", &["a5"]), Ok(512));
        assert_eq!(count_paths_through(&graph, "s", "out", &["a5", "b5"]), Ok(0));
    }

    #[test]
    fn test_count_overflow_is_an_error() {
        let graph = create_layers(70);
        assert!(graph.is_acyclic_from("s"));
        assert_eq!(count_paths_through(&graph, "s", "out", &["a5"]), Err(PathError::Overflow));
        assert_eq!(count_paths_through(&graph, "s", "out", &[]), Err(PathError::Overflow));
        // 2^63 still fits
        assert_eq!(count_paths_through(&create_layers(63), "s", "out", &[]), Ok(1 << 63));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Graph::parse("\n \n").unwrap_err(), ParseError::Empty);
        assert!(matches!(
            Graph::parse("aaa: bbb\nccc ddd"),
            Err(ParseError::Malformed { line: 2, .. })
        ));
        assert!(matches!(Graph::parse(": bbb"), Err(ParseError::Malformed { line: 1, .. })));
    }

    #[test]
    fn test_parse_counts_edges() {
        let graph = Graph::parse("a: b c\nb:\nc: b").unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.contains("b"));
        assert!(!graph.contains("z"));
    }
}
