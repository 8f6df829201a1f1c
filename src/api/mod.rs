//! HTTP front end
//!
//! Exposes image analysis, ingredient lookup and recipe generation over
//! JSON routes, plus polling for background analyses.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use extract::{JsonBody, QueryParams};
pub use router::router;
pub use server::serve;
pub use state::AppState;
