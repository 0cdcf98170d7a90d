pub mod config;
pub mod error;
pub mod model;
pub mod pricing;
pub mod routes;
