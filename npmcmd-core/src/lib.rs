pub mod args;
pub mod error;

pub use args::{ArgSource, FlagMap, FlagValue};
pub use error::{NpmError, Result};
