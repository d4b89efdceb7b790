mod formatters;
mod table;

pub use formatters::*;
