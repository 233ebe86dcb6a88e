pub mod auth;
pub mod cache;
pub mod configuration;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
