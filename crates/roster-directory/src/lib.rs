mod directory;
pub mod lorem;

pub use directory::*;
