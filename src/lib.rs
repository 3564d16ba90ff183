pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod models;
pub mod query;
pub mod routes;
pub mod store;
pub mod validate;
