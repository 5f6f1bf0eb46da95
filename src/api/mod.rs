// src/api/mod.rs
pub mod routes;
pub mod handlers;
pub mod state;

pub use routes::{configure_routes, configure_routes_with_limit};
pub use state::AppState;
