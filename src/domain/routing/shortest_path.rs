use crate::domain::network::graph::Graph;
use crate::domain::utils::id::VertexId;
use crate::error::Result;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Nominal probe size used to weigh links: 60 bytes.
///
/// Ping and traceroute use the same size, so routes are chosen by the delay a probe actually sees.
pub const PACKET_SIZE_BYTES: usize = 60;
pub const PACKET_SIZE_BITS: f64 = (PACKET_SIZE_BYTES * 8) as f64;

/// A vertex on a path together with the delay accumulated up to it (seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct PathHop {
    pub vertex: VertexId,
    pub cost: f64,
}

/// Result of a shortest path query.
///
/// Starts at the source with cost `0` and ends at the target with the total cost.
/// An empty path means the target is unreachable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathResult {
    pub hops: Vec<PathHop>,
}

impl PathResult {
    pub fn unreachable() -> Self {
        Self { hops: Vec::new() }
    }

    pub fn is_unreachable(&self) -> bool {
        self.hops.is_empty()
    }

    /// Total delay in seconds, `+inf` if unreachable.
    pub fn total_cost(&self) -> f64 {
        self.hops.last().map(|hop| hop.cost).unwrap_or(f64::INFINITY)
    }

    /// The vertex right after the source, if the path has one.
    pub fn next_hop(&self) -> Option<&VertexId> {
        self.hops.get(1).map(|hop| &hop.vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &VertexId> {
        self.hops.iter().map(|hop| &hop.vertex)
    }
}

/// Frontier entry.
///
/// Ordered by cost, then by the sequence number it was pushed with, both reversed so the
/// max-heap pops the cheapest and oldest entry first. The vertex itself never takes part in
/// the comparison: sequence numbers are unique, which makes ties resolve in discovery order.
#[derive(Debug)]
struct FrontierEntry {
    cost: OrderedFloat<f64>,
    seq: u64,
    vertex: VertexId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Distances and predecessors found by one run of the search from `source`.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<'g> {
    graph: &'g Graph,
    source: VertexId,
    dist: HashMap<VertexId, f64>,
    prev: HashMap<VertexId, VertexId>,
}

impl<'g> ShortestPathTree<'g> {
    pub fn source(&self) -> &VertexId {
        &self.source
    }

    /// Distance to `target` found by the search in seconds, `+inf` if it was never reached.
    pub fn distance_to(&self, target: &VertexId) -> f64 {
        self.dist.get(target).copied().unwrap_or(f64::INFINITY)
    }

    /// Rebuilds the path to `target`.
    ///
    /// Walks predecessors back to the source, then replays the path forward and sums the
    /// delay of each traversed link.
    pub fn path_to(&self, target: &VertexId) -> Result<PathResult> {
        self.graph.contains_or_err(target)?;

        if self.distance_to(target).is_infinite() {
            return Ok(PathResult::unreachable());
        }

        let mut vertices = vec![target.clone()];
        let mut current = target;
        while let Some(previous) = self.prev.get(current) {
            vertices.push(previous.clone());
            current = previous;
        }
        vertices.reverse();

        let mut hops = Vec::with_capacity(vertices.len());
        let mut accumulated = 0.0;
        hops.push(PathHop { vertex: vertices[0].clone(), cost: accumulated });

        for pair in vertices.windows(2) {
            let Some(link) = self.graph.link_between(&pair[0], &pair[1]) else {
                log::error!("InconsistentPath: {} and {} are consecutive on a path but not linked.", pair[0], pair[1]);
                return Ok(PathResult::unreachable());
            };
            accumulated += link.delay(PACKET_SIZE_BITS);
            hops.push(PathHop { vertex: pair[1].clone(), cost: accumulated });
        }

        Ok(PathResult { hops })
    }
}

/// Runs the search from `source`. With a `target` the search stops as soon as the target is
/// settled; every cost still on the frontier is at least as large at that point.
fn search<'g>(graph: &'g Graph, source: &VertexId, target: Option<&VertexId>) -> Result<ShortestPathTree<'g>> {
    graph.contains_or_err(source)?;
    if let Some(target) = target {
        graph.contains_or_err(target)?;
    }

    let mut dist: HashMap<VertexId, f64> = HashMap::with_capacity(graph.vertex_count());
    let mut prev: HashMap<VertexId, VertexId> = HashMap::new();
    let mut visited: HashSet<VertexId> = HashSet::with_capacity(graph.vertex_count());
    let mut frontier = BinaryHeap::new();
    let mut seq: u64 = 0;

    dist.insert(source.clone(), 0.0);
    frontier.push(FrontierEntry { cost: OrderedFloat(0.0), seq, vertex: source.clone() });

    while let Some(FrontierEntry { cost, vertex, .. }) = frontier.pop() {
        if !visited.insert(vertex.clone()) {
            continue;
        }

        if target == Some(&vertex) {
            break;
        }

        for adjacency in graph.neighbors(&vertex)? {
            let new_cost = cost.0 + adjacency.link.delay(PACKET_SIZE_BITS);
            let known = dist.get(&adjacency.neighbor).copied().unwrap_or(f64::INFINITY);

            if new_cost < known {
                dist.insert(adjacency.neighbor.clone(), new_cost);
                prev.insert(adjacency.neighbor.clone(), vertex.clone());
                seq += 1;
                frontier.push(FrontierEntry { cost: OrderedFloat(new_cost), seq, vertex: adjacency.neighbor.clone() });
            }
        }
    }

    Ok(ShortestPathTree { graph, source: source.clone(), dist, prev })
}

/// Minimum-delay path from `source` to `target`.
pub fn shortest_path(graph: &Graph, source: &VertexId, target: &VertexId) -> Result<PathResult> {
    let tree = search(graph, source, Some(target))?;
    let path = tree.path_to(target)?;

    if path.is_unreachable() {
        log::debug!("NoPathFound: {} => {}", source, target);
    }

    Ok(path)
}

/// Minimum-delay paths from `source` to every vertex of the graph.
pub fn shortest_path_tree<'g>(graph: &'g Graph, source: &VertexId) -> Result<ShortestPathTree<'g>> {
    search(graph, source, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::network::graph::EdgeSpec;
    use crate::error::Error;
    use crate::domain::network::link::Link;

    fn v(name: &str) -> VertexId {
        VertexId::new(name)
    }

    fn line(names: &[&str], distance: f64, rate: f64) -> Graph {
        Graph::build(names.windows(2).map(|w| EdgeSpec::new(w[0], w[1], distance, rate))).unwrap()
    }

    /// Sums link delays along the path independently of the search.
    fn recompute_cost(graph: &Graph, path: &PathResult) -> f64 {
        path.hops.windows(2).map(|w| graph.link_between(&w[0].vertex, &w[1].vertex).unwrap().delay(PACKET_SIZE_BITS)).sum()
    }

    #[test]
    fn test_line_passes_through_middle() {
        let graph = line(&["A", "B", "C"], 0.0, 1e9);
        let path = shortest_path(&graph, &v("A"), &v("C")).unwrap();

        let names: Vec<&str> = path.vertices().map(VertexId::as_str).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(path.next_hop(), Some(&v("B")));

        let link = Link::new(0.0, 1e9).unwrap();
        let expected = link.delay(PACKET_SIZE_BITS) * 2.0;
        assert!((path.total_cost() - expected).abs() < 1e-12);
        assert_eq!(path.hops[0].cost, 0.0);
    }

    #[test]
    fn test_path_to_self_costs_nothing() {
        let graph = line(&["A", "B"], 10.0, 1e6);
        let path = shortest_path(&graph, &v("A"), &v("A")).unwrap();

        assert_eq!(path.hops, vec![PathHop { vertex: v("A"), cost: 0.0 }]);
        assert_eq!(path.total_cost(), 0.0);
        assert_eq!(path.next_hop(), None);
    }

    #[test]
    fn test_unreachable_target_yields_empty_path() {
        let mut graph = line(&["A", "B"], 10.0, 1e6);
        graph.add_vertex(&v("D"));

        let path = shortest_path(&graph, &v("A"), &v("D")).unwrap();
        assert!(path.is_unreachable());
        assert!(path.total_cost().is_infinite());
    }

    #[test]
    fn test_unknown_vertices_are_errors() {
        let graph = line(&["A", "B"], 10.0, 1e6);
        assert!(matches!(shortest_path(&graph, &v("X"), &v("A")), Err(Error::UnknownVertex(_))));
        assert!(matches!(shortest_path(&graph, &v("A"), &v("X")), Err(Error::UnknownVertex(_))));
    }

    #[test]
    fn test_prefers_lower_delay_over_fewer_hops() {
        let graph = Graph::build(vec![
            EdgeSpec::new("S", "T", 700_000.0, 1e6),
            EdgeSpec::new("S", "M1", 10.0, 1e9),
            EdgeSpec::new("M1", "M2", 10.0, 1e9),
            EdgeSpec::new("M2", "T", 10.0, 1e9),
        ])
        .unwrap();

        let path = shortest_path(&graph, &v("S"), &v("T")).unwrap();
        assert_eq!(path.hops.len(), 4);
        assert_eq!(path.next_hop(), Some(&v("M1")));
    }

    #[test]
    fn test_equal_cost_ties_follow_insertion_order() {
        // A-B-D and A-C-D cost exactly the same.
        let diamond = |first: &str, second: &str| {
            Graph::build(vec![
                EdgeSpec::new("A", first, 100.0, 1e9),
                EdgeSpec::new("A", second, 100.0, 1e9),
                EdgeSpec::new(first, "D", 100.0, 1e9),
                EdgeSpec::new(second, "D", 100.0, 1e9),
            ])
            .unwrap()
        };

        let graph = diamond("B", "C");
        for _ in 0..10 {
            assert_eq!(shortest_path(&graph, &v("A"), &v("D")).unwrap().next_hop(), Some(&v("B")));
        }

        let graph = diamond("C", "B");
        assert_eq!(shortest_path(&graph, &v("A"), &v("D")).unwrap().next_hop(), Some(&v("C")));
    }

    #[test]
    fn test_paths_are_simple_and_costs_consistent() {
        let graph = Graph::build(vec![
            EdgeSpec::new("A", "B", 1_000.0, 1e8),
            EdgeSpec::new("A", "C", 50_000.0, 1e9),
            EdgeSpec::new("B", "C", 2_000.0, 1e7),
            EdgeSpec::new("B", "D", 30_000.0, 5e8),
            EdgeSpec::new("C", "D", 500.0, 0.0),
            EdgeSpec::new("D", "E", 0.0, 1e6),
            EdgeSpec::new("C", "E", 90_000.0, 1e9),
        ])
        .unwrap();

        for source in graph.vertices() {
            let tree = shortest_path_tree(&graph, source).unwrap();
            for target in graph.vertices() {
                let path = tree.path_to(target).unwrap();
                let single = shortest_path(&graph, source, target).unwrap();
                assert_eq!(path, single);

                let unique: HashSet<&VertexId> = path.vertices().collect();
                assert_eq!(unique.len(), path.hops.len(), "path {:?} repeats a vertex", path);

                assert!(path.total_cost() >= 0.0);
                assert_eq!(path.total_cost() == 0.0, source == target);
                assert!((recompute_cost(&graph, &path) - path.total_cost()).abs() < 1e-9);
                assert!((tree.distance_to(target) - path.total_cost()).abs() < 1e-9);
            }
        }
    }
}
