pub mod routing_table;
pub mod session;
pub mod shortest_path;
