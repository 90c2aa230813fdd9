pub mod app;
pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod state;

pub use app::app;
pub use state::AppState;
