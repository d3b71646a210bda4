use thiserror::Error;

/// The single error kind this library reports.
///
/// Non-zero exit, spawn failure and a missing `npm` executable all collapse
/// into `CommandFailed`, and the variant carries no payload. Exit code and
/// stderr are logged by the process layer but never surfaced through the
/// public API; that information loss is part of the contract, not an
/// accident. Do not add diagnostic fields here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpmError {
    #[error("npm command failed")]
    CommandFailed,
}

pub type Result<T> = std::result::Result<T, NpmError>;
