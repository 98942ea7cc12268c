//! HTTP boundary for the Wink short-link engine.
//!
//! Exposes the create, resolve, redirect and delete operations over axum,
//! plus the command line configuration and log setup used by the `wink`
//! binary.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
