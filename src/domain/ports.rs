use crate::domain::mapping::StubMapping;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Stub mapping source port (implemented by Infrastructure)
pub trait MappingSource {
    fn load(&self) -> Result<Vec<StubMapping>>;

    /// Where the mappings came from, for logs.
    fn describe(&self) -> String;
}

/// Time source used for request journaling and time-stamped fixtures.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
