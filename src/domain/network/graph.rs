use crate::domain::network::link::Link;
use crate::domain::utils::id::VertexId;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// One end of an undirected edge, as seen from the vertex that stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    pub neighbor: VertexId,
    pub link: Link,
}

/// An edge description handed to [`Graph::build`] by a topology source.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub a: VertexId,
    pub b: VertexId,
    pub distance: f64,
    pub transmission_rate: f64,
}

impl EdgeSpec {
    pub fn new(a: impl Into<String>, b: impl Into<String>, distance: f64, transmission_rate: f64) -> Self {
        Self { a: VertexId::new(a), b: VertexId::new(b), distance, transmission_rate }
    }
}

/// Undirected network graph.
///
/// * Every edge is stored in the adjacency lists of both endpoints.
/// * At most one edge exists between any unordered pair; relinking is rejected.
/// * Vertices and adjacency lists keep insertion order. The shortest path search
///   relies on that order to resolve equal-cost alternatives reproducibly.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All vertices in the order they were first seen.
    vertices: Vec<VertexId>,

    /// Adjacency list per vertex.
    adjacency: HashMap<VertexId, Vec<Adjacency>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from edge triples, failing on the first malformed or duplicate edge.
    pub fn build(edges: impl IntoIterator<Item = EdgeSpec>) -> Result<Self> {
        let mut graph = Graph::new();

        for edge in edges {
            let link = Link::new(edge.distance, edge.transmission_rate)?;
            graph.link_vertices(&edge.a, &edge.b, link)?;
        }

        log::debug!("Graph built: {} vertices, {} links.", graph.vertex_count(), graph.link_count());
        Ok(graph)
    }

    /// Registers a vertex. Adding an existing vertex changes nothing.
    pub fn add_vertex(&mut self, vertex: &VertexId) {
        if !self.adjacency.contains_key(vertex) {
            self.vertices.push(vertex.clone());
            self.adjacency.insert(vertex.clone(), Vec::new());
        }
    }

    /// Connects two vertices in both directions, registering them if needed.
    pub fn link_vertices(&mut self, a: &VertexId, b: &VertexId, link: Link) -> Result<()> {
        if a == b {
            return Err(Error::InvalidLink(format!("vertex {} cannot be linked to itself", a)));
        }

        if self.is_linked(a, b) {
            return Err(Error::DuplicateLink(a.clone(), b.clone()));
        }

        self.add_vertex(a);
        self.add_vertex(b);

        self.push_adjacency(a, Adjacency { neighbor: b.clone(), link });
        self.push_adjacency(b, Adjacency { neighbor: a.clone(), link });

        Ok(())
    }

    /// Removes the edge between `a` and `b`. Returns `false` if they were not linked.
    pub fn unlink_vertices(&mut self, a: &VertexId, b: &VertexId) -> Result<bool> {
        self.contains_or_err(a)?;
        self.contains_or_err(b)?;

        if !self.is_linked(a, b) {
            return Ok(false);
        }

        if let Some(list) = self.adjacency.get_mut(a) {
            list.retain(|adj| &adj.neighbor != b);
        }
        if let Some(list) = self.adjacency.get_mut(b) {
            list.retain(|adj| &adj.neighbor != a);
        }

        Ok(true)
    }

    pub fn neighbors(&self, vertex: &VertexId) -> Result<&[Adjacency]> {
        self.adjacency.get(vertex).map(Vec::as_slice).ok_or_else(|| Error::UnknownVertex(vertex.clone()))
    }

    pub fn is_linked(&self, a: &VertexId, b: &VertexId) -> bool {
        self.link_between(a, b).is_some()
    }

    pub fn link_between(&self, a: &VertexId, b: &VertexId) -> Option<Link> {
        self.adjacency.get(a)?.iter().find(|adj| &adj.neighbor == b).map(|adj| adj.link)
    }

    pub fn contains(&self, vertex: &VertexId) -> bool {
        self.adjacency.contains_key(vertex)
    }

    pub fn contains_or_err(&self, vertex: &VertexId) -> Result<()> {
        if self.contains(vertex) { Ok(()) } else { Err(Error::UnknownVertex(vertex.clone())) }
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    fn push_adjacency(&mut self, vertex: &VertexId, adjacency: Adjacency) {
        self.adjacency.entry(vertex.clone()).or_default().push(adjacency);
    }
}
