pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod playlist;
pub mod services;
pub mod sources;
pub mod utils;
