use crate::domain::network::graph::Graph;
use crate::domain::routing::shortest_path::shortest_path_tree;
use crate::domain::utils::id::VertexId;
use crate::error::{Error, Result};
use rayon::prelude::*;
use std::collections::HashMap;

/// Where a vertex forwards packets for one destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    /// Adjacent vertex to forward to. `None` for the owner itself and for unreachable destinations.
    pub next_hop: Option<VertexId>,

    /// Total delay to the destination in seconds (`+inf` if unreachable).
    pub cost: f64,

    /// Delay of the link to `next_hop` in seconds (`+inf` if unreachable).
    pub hop_cost: f64,
}

impl RouteEntry {
    pub fn local() -> Self {
        Self { next_hop: None, cost: 0.0, hop_cost: 0.0 }
    }

    pub fn unreachable() -> Self {
        Self { next_hop: None, cost: f64::INFINITY, hop_cost: f64::INFINITY }
    }

    pub fn via(next_hop: VertexId, cost: f64, hop_cost: f64) -> Self {
        Self { next_hop: Some(next_hop), cost, hop_cost }
    }

    pub fn is_reachable(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Forwarding state of a single vertex: destination -> [`RouteEntry`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingTable {
    owner: VertexId,
    entries: HashMap<VertexId, RouteEntry>,
}

impl RoutingTable {
    /// Computes the table of `owner` with one single-source search.
    pub fn compute(graph: &Graph, owner: &VertexId) -> Result<Self> {
        let tree = shortest_path_tree(graph, owner)?;
        let mut entries = HashMap::with_capacity(graph.vertex_count());

        for destination in graph.vertices() {
            let path = tree.path_to(destination)?;

            let entry = match path.hops.as_slice() {
                [] => {
                    log::debug!("NoPathFound: {} => {}", owner, destination);
                    RouteEntry::unreachable()
                }
                [_] => RouteEntry::local(),
                [_, first, ..] => RouteEntry::via(first.vertex.clone(), path.total_cost(), first.cost),
            };

            entries.insert(destination.clone(), entry);
        }

        Ok(Self { owner: tree.source().clone(), entries })
    }

    /// Assembles a table from precomputed entries. The owner always routes to itself locally.
    pub fn from_entries(owner: VertexId, entries: impl IntoIterator<Item = (VertexId, RouteEntry)>) -> Self {
        let mut entries: HashMap<VertexId, RouteEntry> = entries.into_iter().collect();
        entries.insert(owner.clone(), RouteEntry::local());
        Self { owner, entries }
    }

    pub fn owner(&self) -> &VertexId {
        &self.owner
    }

    /// Raw entry for `destination`, including unreachable ones.
    pub fn entry(&self, destination: &VertexId) -> Result<&RouteEntry> {
        self.entries.get(destination).ok_or_else(|| Error::UnknownVertex(destination.clone()))
    }

    /// Entry for a destination that must be reachable.
    pub fn lookup(&self, destination: &VertexId) -> Result<&RouteEntry> {
        let entry = self.entry(destination)?;

        if !entry.is_reachable() {
            return Err(Error::RouteUnavailable { from: self.owner.clone(), to: destination.clone() });
        }

        Ok(entry)
    }

    /// Next hop towards `destination`.
    ///
    /// Fails with `RouteUnavailable` when there is nothing to forward to, which includes asking
    /// the owner for a route to itself.
    pub fn next_hop(&self, destination: &VertexId) -> Result<&VertexId> {
        self.lookup(destination)?
            .next_hop
            .as_ref()
            .ok_or_else(|| Error::RouteUnavailable { from: self.owner.clone(), to: destination.clone() })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VertexId, &RouteEntry)> {
        self.entries.iter()
    }
}

/// Routing tables of every vertex of a graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoutingTables {
    tables: HashMap<VertexId, RoutingTable>,
}

impl RoutingTables {
    /// Builds every table one vertex after the other.
    pub fn build(graph: &Graph) -> Result<Self> {
        let tables = graph
            .vertices()
            .iter()
            .map(|vertex| -> Result<(VertexId, RoutingTable)> { Ok((vertex.clone(), RoutingTable::compute(graph, vertex)?)) })
            .collect::<Result<HashMap<_, _>>>()?;

        log::info!("Routing tables built for {} vertices.", tables.len());
        Ok(Self { tables })
    }

    /// Builds every table on the rayon thread pool.
    ///
    /// Each worker only writes the table of its own vertex. The call returns once all of them
    /// are done, so the result is never observed half-built.
    pub fn build_parallel(graph: &Graph) -> Result<Self> {
        let tables = graph
            .vertices()
            .par_iter()
            .map(|vertex| -> Result<(VertexId, RoutingTable)> { Ok((vertex.clone(), RoutingTable::compute(graph, vertex)?)) })
            .collect::<Result<HashMap<_, _>>>()?;

        log::info!("Routing tables built in parallel for {} vertices.", tables.len());
        Ok(Self { tables })
    }

    pub fn from_tables(tables: impl IntoIterator<Item = RoutingTable>) -> Self {
        Self { tables: tables.into_iter().map(|table| (table.owner.clone(), table)).collect() }
    }

    pub fn table(&self, vertex: &VertexId) -> Result<&RoutingTable> {
        self.tables.get(vertex).ok_or_else(|| Error::UnknownVertex(vertex.clone()))
    }

    pub fn contains(&self, vertex: &VertexId) -> bool {
        self.tables.contains_key(vertex)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
