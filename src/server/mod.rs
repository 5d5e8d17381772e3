pub mod handle;
pub mod http;

pub use handle::MockServer;
