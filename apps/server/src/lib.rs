pub mod api;
pub mod config;
pub mod error;
pub mod events;
mod drive;
mod main_lib;
mod navigator;

pub use main_lib::{build_state, init_tracing, AppState};
