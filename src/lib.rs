pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod schema;
pub mod server;
pub mod state;

pub use server::app;
pub use state::{AppState, Pagination};
