pub mod config;
pub mod dtos;
pub mod handlers;
pub mod schema;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
