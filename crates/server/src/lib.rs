//! HTTP surface for the Bragi workflows.
//!
//! Exposes the three task routes and a health route under `/api/ai`, each
//! task run bounded by a request deadline. The engine is injected through
//! [`AppState`], so tests can drive the [`router`] with a stub generator.

pub mod error;
pub mod http;
pub mod routes;

pub use error::RouteError;
pub use http::{BragiHttpServer, RunningBragiHttpServer};
pub use routes::{AppState, DEFAULT_REQUEST_TIMEOUT, router};
