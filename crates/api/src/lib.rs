//! AML Oracle admin HTTP API
//!
//! Routes:
//! - `GET  /health`
//! - `GET  /oracle-pubkey`
//! - `GET  /oracle-data`
//! - `POST /oracle-data`
//! - `POST /delete-oracle-entry`

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
