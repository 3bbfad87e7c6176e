use crate::domain::network::graph::Graph;
use crate::domain::routing::routing_table::RoutingTables;
use crate::domain::routing::shortest_path::{PathResult, shortest_path};
use crate::domain::utils::id::VertexId;
use crate::error::Result;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// How the routing tables of a topology are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    Sequential,
    #[default]
    Parallel,
}

/// A graph together with the routing tables computed from it.
///
/// Immutable once built. Probes only ever read from a `RoutedTopology`.
#[derive(Debug)]
pub struct RoutedTopology {
    graph: Graph,
    tables: RoutingTables,
}

impl RoutedTopology {
    pub fn build(graph: Graph, mode: BuildMode) -> Result<Self> {
        let tables = match mode {
            BuildMode::Sequential => RoutingTables::build(&graph)?,
            BuildMode::Parallel => RoutingTables::build_parallel(&graph)?,
        };

        Ok(Self { graph, tables })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn tables(&self) -> &RoutingTables {
        &self.tables
    }

    pub fn shortest_path(&self, source: &VertexId, target: &VertexId) -> Result<PathResult> {
        shortest_path(&self.graph, source, target)
    }
}

/// Holds the current [`RoutedTopology`] and swaps in a new one on every topology change.
///
/// Readers clone an `Arc` snapshot and keep using it for the whole probe, even if a rebuild
/// happens meanwhile. A rebuild works on a copy of the graph and only takes the write lock for
/// the pointer swap, after every table is complete. Rebuilds are serialized, so each one starts
/// from the result of the previous one.
#[derive(Debug)]
pub struct NetworkSession {
    current: RwLock<Arc<RoutedTopology>>,
    /// Held for a whole rebuild, from copying the graph to swapping the snapshot.
    rebuild_lock: Mutex<()>,
    mode: BuildMode,
}

impl NetworkSession {
    pub fn new(graph: Graph, mode: BuildMode) -> Result<Self> {
        let routed = RoutedTopology::build(graph, mode)?;
        Ok(Self { current: RwLock::new(Arc::new(routed)), rebuild_lock: Mutex::new(()), mode })
    }

    pub fn snapshot(&self) -> Arc<RoutedTopology> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Applies `change` to a copy of the graph and rebuilds every routing table.
    ///
    /// If `change` or the rebuild fails, the current snapshot stays in place.
    pub fn rebuild<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Graph) -> Result<()>,
    {
        let _guard = self.rebuild_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut graph = self.snapshot().graph().clone();
        change(&mut graph)?;

        let routed = RoutedTopology::build(graph, self.mode)?;
        log::info!("Topology rebuilt: {} vertices, {} links.", routed.graph.vertex_count(), routed.graph.link_count());

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(routed);
        Ok(())
    }
}
