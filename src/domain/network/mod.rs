pub mod graph;
pub mod link;
pub mod topology;
