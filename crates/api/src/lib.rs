//! HTTP API layer for the portfolio server.

pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::{router, router_with_static};
pub use state::AppState;
