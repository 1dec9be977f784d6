// src/app/mod.rs
//! Application state and the headless snapshot runner.

pub mod snapshot;
pub mod state;

pub use snapshot::{render_snapshot, run_snapshot};
pub use state::App;
