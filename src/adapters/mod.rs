pub mod clock;
pub mod fixtures;
pub mod fs;
