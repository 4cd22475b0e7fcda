pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod sync;
