pub mod loader;
pub mod models;

pub use loader::{RoutingTableError, load_routing_table, load_server_config};
pub use models::*;
