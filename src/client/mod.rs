//! HTTP clients for a running stub server: the admin API and plain REST calls.

pub mod admin;
pub mod rest;

pub use admin::AdminClient;
pub use rest::{ApiResponse, RequestSpec, RestClient, given};
