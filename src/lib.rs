// Library exports for Strands
// This allows integration tests and the binary to share the same modules

pub mod actions;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod pagination;
pub mod revalidate;
pub mod routes;
pub mod state;
pub mod threads;
pub mod users;
pub mod validation;
