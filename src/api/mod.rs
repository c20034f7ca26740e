pub mod envelope;
pub mod extract;
pub mod params;
mod routes;
mod state;

pub use routes::{cors_layer, create_router};
pub use state::AppState;
