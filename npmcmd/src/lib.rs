//! Fluent builder over the npm CLI, in blocking and async forms.
//!
//! Blocking operations return `Option<String>` (captured stdout, or `None`
//! on failure); async operations return `Result<String>` whose error carries
//! no diagnostics. See [`Npm`] for the chaining API.

pub mod builder;
pub mod process;

pub use builder::{InstallOptions, Npm};
pub use npmcmd_core::{ArgSource, FlagMap, FlagValue, NpmError, Result};
pub use process::{npm_available, CommandRunner, ExecOptions, ShellRunner};
