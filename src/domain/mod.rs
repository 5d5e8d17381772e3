pub mod error;
pub mod json_path;
pub mod mapping;
pub mod matcher;
pub mod ports;
pub mod registry;
pub mod request;
