pub mod config;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
