use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::api::topology_dto::TopologyDto;
use crate::domain::network::graph::Graph;
use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    parse_json_str(&data)
}

pub fn parse_json_str<T: DeserializeOwned>(data: &str) -> Result<T> {
    Ok(serde_json::from_str(data)?)
}

/// Reads a topology file and builds the graph it describes.
pub fn load_topology_file(file_path: impl AsRef<Path>) -> Result<Graph> {
    let path = file_path.as_ref();
    log::info!("Loading topology from '{}'...", path.display());

    let dto: TopologyDto = parse_json_file(path)?;
    Graph::try_from(dto)
}

/// Builds the graph described by an in-memory topology document.
pub fn load_topology_str(data: &str) -> Result<Graph> {
    let dto: TopologyDto = parse_json_str(data)?;
    Graph::try_from(dto)
}
