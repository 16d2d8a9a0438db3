// Graph Keepalive - Library root for testing

pub mod auth;
pub mod config;
pub mod error;
pub mod http_client;
pub mod job;
pub mod probe;
