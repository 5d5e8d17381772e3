//! http-stubs library — HTTP stub server, stub DSL and REST assertion client.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod dsl;
pub mod server;
