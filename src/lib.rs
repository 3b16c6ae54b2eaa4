pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod images;
pub mod pipeline;
pub mod run_log;
