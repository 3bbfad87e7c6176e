pub mod network;
pub mod probe;
pub mod routing;
pub mod utils;
