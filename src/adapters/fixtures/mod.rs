//! Built-in canned fixture sets.

pub mod reqres;

pub use reqres::ReqResFixtures;
