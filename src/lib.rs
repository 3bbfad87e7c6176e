use std::path::Path;

use crate::domain::network::graph::Graph;
use crate::domain::routing::session::{BuildMode, NetworkSession};
use crate::error::Result;
use crate::loader::parser::{load_topology_file, load_topology_str};

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod terminal;

/// The campus network the simulator starts with when no topology file is given.
pub const DEFAULT_TOPOLOGY: &str = include_str!("../data/campus_topology.json");

pub fn load_graph(topology: Option<&Path>) -> Result<Graph> {
    match topology {
        Some(path) => load_topology_file(path),
        None => {
            log::info!("Loading the built-in campus topology.");
            load_topology_str(DEFAULT_TOPOLOGY)
        }
    }
}

pub fn generate_network_session(topology: Option<&Path>, mode: BuildMode) -> Result<NetworkSession> {
    let graph = load_graph(topology)?;
    log::info!("Topology parsed: {} vertices, {} links.", graph.vertex_count(), graph.link_count());

    let session = NetworkSession::new(graph, mode)?;
    log::info!("Routing tables computed ({:?} build).", mode);

    Ok(session)
}
